use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    capture::naming::{camera_image_name, map_image_name},
    capture::session::CaptureSession,
    config::model::CaptureConfig,
    foundation::core::{NodeId, Resolution, ViewpointId},
    foundation::error::{CaptureError, CaptureResult},
    persist::assets::{AssetPostProcessor, asset_path},
    persist::png::encode_and_write,
    post::gamma::apply_gamma,
    render::backend::Renderer,
    scene::context::SceneContext,
};

/// One image a run will produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedImage {
    /// Viewpoint to render.
    pub viewpoint: ViewpointId,
    /// 1-based index among the map's captured additional cameras; `None` for the default camera.
    pub camera_index: Option<usize>,
    /// Output file name.
    pub file_name: String,
}

/// One map a run will capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedMap {
    /// Position of the descriptor in [`CaptureConfig::maps`].
    pub position: usize,
    /// Map root node.
    pub map: NodeId,
    /// 1-based index over captured maps, used for default names.
    pub map_index: usize,
    /// Images in capture order, default camera first.
    pub images: Vec<PlannedImage>,
}

/// A camera binding that did not resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedCamera {
    /// Position of the map descriptor.
    pub map_position: usize,
    /// Position of the binding inside the descriptor.
    pub binding_position: usize,
}

/// Everything a run will do, derived from the config and scene without side effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturePlan {
    /// Maps to capture, in order.
    pub maps: Vec<PlannedMap>,
    /// Positions of descriptors whose map did not resolve.
    pub skipped_maps: Vec<usize>,
    /// Camera bindings that did not resolve.
    pub skipped_cameras: Vec<SkippedCamera>,
}

impl CapturePlan {
    /// Number of images the plan produces.
    pub fn image_count(&self) -> usize {
        self.maps.iter().map(|m| m.images.len()).sum()
    }
}

/// An image that was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedImage {
    /// 1-based map index.
    pub map_index: usize,
    /// Additional camera index, `None` for the default camera.
    pub camera_index: Option<usize>,
    /// Output file name.
    pub file_name: String,
    /// Full output path.
    pub path: PathBuf,
}

/// An image that could not be rendered, post-processed, written or registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFailure {
    /// Output file name.
    pub file_name: String,
    /// Full output path.
    pub path: PathBuf,
    /// Rendered error message.
    pub error: String,
}

/// Outcome of [`capture_maps`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureReport {
    /// Images written, in capture order.
    pub images: Vec<CapturedImage>,
    /// Positions of descriptors whose map did not resolve.
    pub skipped_maps: Vec<usize>,
    /// Camera bindings that did not resolve.
    pub skipped_cameras: Vec<SkippedCamera>,
    /// Per-image failures; the run continued past each.
    pub failures: Vec<ImageFailure>,
    /// Output names written more than once (compared case-insensitively), one entry per repeat.
    pub name_collisions: Vec<String>,
    /// Map reactivated at the end of the run.
    pub restored_map: Option<NodeId>,
}

impl CaptureReport {
    /// Whether every planned image was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn check_preconditions<S: SceneContext + ?Sized>(
    config: &CaptureConfig,
    scene: &S,
) -> CaptureResult<(ViewpointId, Resolution)> {
    config.validate()?;
    let camera = config
        .capture_camera
        .as_ref()
        .filter(|cam| scene.has_viewpoint(cam))
        .ok_or(CaptureError::NoDefaultCamera)?;
    if config.maps.is_empty() {
        return Err(CaptureError::NoMapsConfigured);
    }
    Ok((camera.clone(), config.resolution()?))
}

fn build_plan<S: SceneContext + ?Sized>(
    config: &CaptureConfig,
    scene: &S,
    default_camera: &ViewpointId,
) -> CapturePlan {
    let mut plan = CapturePlan::default();
    let mut map_index = 0usize;

    for (position, element) in config.maps.iter().enumerate() {
        let Some(map) = element.map.as_ref().filter(|m| scene.contains_node(m)) else {
            plan.skipped_maps.push(position);
            continue;
        };
        map_index += 1;

        let mut images = vec![PlannedImage {
            viewpoint: default_camera.clone(),
            camera_index: None,
            file_name: map_image_name(map_index, element.custom_name()),
        }];

        let mut camera_index = 0usize;
        for (binding_position, binding) in element.additional_cameras.iter().enumerate() {
            let Some(camera) = binding.camera.as_ref().filter(|c| scene.has_viewpoint(c)) else {
                plan.skipped_cameras.push(SkippedCamera {
                    map_position: position,
                    binding_position,
                });
                continue;
            };
            camera_index += 1;
            images.push(PlannedImage {
                viewpoint: camera.clone(),
                camera_index: Some(camera_index),
                file_name: camera_image_name(
                    map_index,
                    camera_index,
                    binding.custom_image_name(),
                ),
            });
        }

        plan.maps.push(PlannedMap {
            position,
            map: map.clone(),
            map_index,
            images,
        });
    }

    plan
}

/// Resolve names and skips for a run without touching the scene or the filesystem.
///
/// Fails with the same configuration errors as [`capture_maps`].
pub fn plan_captures<S: SceneContext + ?Sized>(
    config: &CaptureConfig,
    scene: &S,
) -> CaptureResult<CapturePlan> {
    let (camera, _) = check_preconditions(config, scene)?;
    Ok(build_plan(config, scene, &camera))
}

/// Capture every configured map.
///
/// Configuration errors are returned before anything is touched. Once the run starts, per-image
/// failures are collected into the report and the scene is always restored: the previously active
/// map is reactivated and hidden objects get their own active flags back.
#[tracing::instrument(skip_all, fields(maps = config.maps.len(), root = %asset_root.display()))]
pub fn capture_maps<S, R>(
    config: &CaptureConfig,
    scene: &mut S,
    renderer: &mut R,
    assets: &mut dyn AssetPostProcessor,
    asset_root: &Path,
) -> CaptureResult<CaptureReport>
where
    S: SceneContext + ?Sized,
    R: Renderer<S> + ?Sized,
{
    let (camera, resolution) = check_preconditions(config, scene)?;
    let plan = build_plan(config, scene, &camera);
    for position in &plan.skipped_maps {
        tracing::debug!(position, "map not assigned or not found, skipping");
    }
    for skip in &plan.skipped_cameras {
        tracing::debug!(
            map_position = skip.map_position,
            binding_position = skip.binding_position,
            "camera not assigned or not found, skipping"
        );
    }

    let out_dir = config.output_dir(asset_root)?;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

    let session = CaptureSession::begin(config, scene);
    let mut report = CaptureReport {
        skipped_maps: plan.skipped_maps.clone(),
        skipped_cameras: plan.skipped_cameras.clone(),
        restored_map: session.previously_active_map().cloned(),
        ..CaptureReport::default()
    };
    let mut seen = HashSet::<String>::new();

    for planned in &plan.maps {
        tracing::debug!(map = %planned.map, index = planned.map_index, "capturing map");
        scene.set_active(&planned.map, true);

        let emitters = scene.find_particle_emitters(&planned.map);
        for emitter in &emitters {
            scene.play_emitter(emitter);
            scene.simulate_emitter(emitter, config.particle_step_secs);
        }

        for image in &planned.images {
            // Case-insensitive filesystems collide on case alone.
            if !seen.insert(image.file_name.to_lowercase()) {
                tracing::warn!(file = %image.file_name, "output name used twice, overwriting");
                report.name_collisions.push(image.file_name.clone());
            }
            let path = out_dir.join(&image.file_name);
            let shot = ShotTarget {
                viewpoint: &image.viewpoint,
                resolution,
                path: &path,
                asset_root,
            };
            match capture_one(config, scene, renderer, assets, shot) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "captured");
                    report.images.push(CapturedImage {
                        map_index: planned.map_index,
                        camera_index: image.camera_index,
                        file_name: image.file_name.clone(),
                        path,
                    });
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "capture failed");
                    report.failures.push(ImageFailure {
                        file_name: image.file_name.clone(),
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        for emitter in &emitters {
            scene.stop_emitter(emitter);
        }
        scene.set_active(&planned.map, false);
    }

    session.restore(scene);

    tracing::info!(
        images = report.images.len(),
        failures = report.failures.len(),
        skipped_maps = report.skipped_maps.len(),
        skipped_cameras = report.skipped_cameras.len(),
        "all maps captured; previously active map and hidden objects restored"
    );
    Ok(report)
}

struct ShotTarget<'a> {
    viewpoint: &'a ViewpointId,
    resolution: Resolution,
    path: &'a Path,
    asset_root: &'a Path,
}

fn capture_one<S, R>(
    config: &CaptureConfig,
    scene: &mut S,
    renderer: &mut R,
    assets: &mut dyn AssetPostProcessor,
    shot: ShotTarget<'_>,
) -> CaptureResult<()>
where
    S: SceneContext + ?Sized,
    R: Renderer<S> + ?Sized,
{
    scene.refresh_lighting();

    let mut buffer = renderer.render(scene, shot.viewpoint, shot.resolution)?;
    if buffer.width != shot.resolution.width || buffer.height != shot.resolution.height {
        return Err(CaptureError::render(format!(
            "renderer returned {}x{}, expected {}x{}",
            buffer.width, buffer.height, shot.resolution.width, shot.resolution.height
        )));
    }

    apply_gamma(&mut buffer, config.gamma)?;
    encode_and_write(&buffer, shot.path)?;

    let key = asset_path(shot.asset_root, shot.path)?;
    assets.register_asset(&key)?;
    if assets.supports_import() {
        assets.configure_import(&key, &config.import)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/capture/orchestrator.rs"]
mod tests;
