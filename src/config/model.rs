use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use crate::{
    foundation::core::{NodeId, Resolution, ViewpointId},
    foundation::error::{CaptureError, CaptureResult},
    persist::assets::ImportSettings,
    post::gamma::DEFAULT_GAMMA,
    scene::memory::MemoryScene,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Everything a capture run reads. Owned by the host; the orchestrator never mutates it.
pub struct CaptureConfig {
    /// Viewpoint used for every map's primary image.
    pub capture_camera: Option<ViewpointId>,
    /// Maps to capture, in order.
    pub maps: Vec<MapDescriptor>,
    /// Nodes hidden for the duration of the run.
    pub objects_to_hide: Vec<Option<NodeId>>,
    /// Output folder, relative to the asset root.
    pub folder_location: String,
    /// Render target width in pixels.
    pub resolution_width: u32,
    /// Render target height in pixels.
    pub resolution_height: u32,
    /// Gamma undone on every capture (`c^(1/gamma)`).
    pub gamma: f32,
    /// Simulated time particle emitters are advanced before capture.
    pub particle_step_secs: f32,
    /// Import settings handed to the host asset pipeline per image.
    pub import: ImportSettings,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            capture_camera: None,
            maps: Vec::new(),
            objects_to_hide: Vec::new(),
            folder_location: "CapturedMaps".to_string(),
            resolution_width: 1920,
            resolution_height: 1080,
            gamma: DEFAULT_GAMMA,
            particle_step_secs: 1.0 / 60.0,
            import: ImportSettings::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One capturable map.
pub struct MapDescriptor {
    /// Root node of the map. `None` or an id missing from the scene skips the entry.
    #[serde(default)]
    pub map: Option<NodeId>,
    /// Extra viewpoints captured after the default one.
    #[serde(default)]
    pub additional_cameras: Vec<CameraBinding>,
    /// File stem for the default-camera image; empty means `Map_{i}`.
    #[serde(default)]
    pub custom_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// An additional viewpoint for one map.
pub struct CameraBinding {
    /// Viewpoint to render. `None` or an unknown viewpoint skips the binding.
    #[serde(default)]
    pub camera: Option<ViewpointId>,
    /// File stem for this image; empty means `Map_{i}_{j}`.
    #[serde(default)]
    pub custom_image_name: Option<String>,
}

impl MapDescriptor {
    /// Descriptor for `map` with default naming and no extra cameras.
    pub fn new(map: impl Into<String>) -> Self {
        Self {
            map: Some(NodeId::new(map)),
            ..Self::default()
        }
    }

    /// Set the custom name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    /// Append an extra camera binding.
    pub fn with_camera(mut self, binding: CameraBinding) -> Self {
        self.additional_cameras.push(binding);
        self
    }

    /// The custom name, treating an empty string as unset.
    pub fn custom_name(&self) -> Option<&str> {
        non_empty(self.custom_name.as_deref())
    }
}

impl CameraBinding {
    /// Binding for `camera` with default naming.
    pub fn new(camera: impl Into<String>) -> Self {
        Self {
            camera: Some(ViewpointId::new(camera)),
            custom_image_name: None,
        }
    }

    /// Set the custom image name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.custom_image_name = Some(name.into());
        self
    }

    /// The custom image name, treating an empty string as unset.
    pub fn custom_image_name(&self) -> Option<&str> {
        non_empty(self.custom_image_name.as_deref())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

impl CaptureConfig {
    /// Parse a config from JSON.
    pub fn from_reader(r: impl Read) -> CaptureResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CaptureError::serde(format!("parse capture config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CaptureResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CaptureError::validation(format!("open capture config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Target resolution, validated.
    pub fn resolution(&self) -> CaptureResult<Resolution> {
        Resolution::new(self.resolution_width, self.resolution_height)
    }

    /// Absolute output directory for a given asset root.
    pub fn output_dir(&self, asset_root: &Path) -> CaptureResult<PathBuf> {
        let rel = normalize_rel_dir(&self.folder_location)?;
        Ok(rel.split('/').fold(asset_root.to_path_buf(), |p, part| p.join(part)))
    }

    /// Check every field that can be checked without a scene.
    pub fn validate(&self) -> CaptureResult<()> {
        self.resolution()?;
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(CaptureError::validation("gamma must be finite and > 0"));
        }
        if !self.particle_step_secs.is_finite() || self.particle_step_secs < 0.0 {
            return Err(CaptureError::validation(
                "particle_step_secs must be finite and >= 0",
            ));
        }
        normalize_rel_dir(&self.folder_location)?;
        self.import.validate()?;

        for (pos, element) in self.maps.iter().enumerate() {
            if let Some(name) = element.custom_name() {
                validate_file_stem(name, &format!("maps[{pos}].custom_name"))?;
            }
            for (cam_pos, binding) in element.additional_cameras.iter().enumerate() {
                if let Some(name) = binding.custom_image_name() {
                    validate_file_stem(
                        name,
                        &format!("maps[{pos}].additional_cameras[{cam_pos}].custom_image_name"),
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Normalize a relative directory: forward slashes, no empty or `.` parts, no `..`.
pub fn normalize_rel_dir(source: &str) -> CaptureResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') || has_drive_prefix(&s) {
        return Err(CaptureError::validation(
            "folder_location must be a relative path",
        ));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CaptureError::validation(
                "folder_location must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CaptureError::validation("folder_location must be non-empty"));
    }
    Ok(out.join("/"))
}

fn has_drive_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 2 && b[0].is_ascii_alphabetic() && b[1] == b':'
}

fn validate_file_stem(name: &str, field: &str) -> CaptureResult<()> {
    if name.contains('/') || name.contains('\\') {
        return Err(CaptureError::validation(format!(
            "{field} must not contain path separators"
        )));
    }
    if name == "." || name == ".." {
        return Err(CaptureError::validation(format!(
            "{field} must be a file name"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, serde::Deserialize)]
/// A scene plus the capture config that runs against it; the CLI's input file.
pub struct CaptureProject {
    /// Scene to capture from.
    pub scene: MemoryScene,
    /// Capture settings.
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl CaptureProject {
    /// Parse a project from JSON.
    pub fn from_reader(r: impl Read) -> CaptureResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CaptureError::serde(format!("parse capture project JSON: {e}")))
    }

    /// Parse a project from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CaptureResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CaptureError::validation(format!("open capture project '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
