use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::{CaptureError, CaptureResult};

/// Texture compression mode requested from a host asset pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextureCompression {
    /// Store raw pixels.
    Uncompressed,
    /// Platform default compressed format.
    #[default]
    Compressed,
    /// Higher quality compressed format.
    CompressedHq,
    /// Lower quality compressed format.
    CompressedLq,
}

/// Per-image import settings applied after a capture is written.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Largest texture dimension the host keeps after import.
    pub max_size: u32,
    /// Compression mode.
    pub compression: TextureCompression,
    /// Whether crunched (lossy, post-compressed) storage is used.
    pub crunched: bool,
    /// Compression quality, `0..=100`.
    pub quality: u8,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_size: 1024,
            compression: TextureCompression::Compressed,
            crunched: true,
            quality: 30,
        }
    }
}

impl ImportSettings {
    /// Validate ranges.
    pub fn validate(&self) -> CaptureResult<()> {
        if self.max_size == 0 {
            return Err(CaptureError::validation("import max_size must be > 0"));
        }
        if self.quality > 100 {
            return Err(CaptureError::validation("import quality must be <= 100"));
        }
        Ok(())
    }
}

/// Host asset-pipeline hooks invoked after every written capture.
///
/// Hosts without an asset database use [`NoAssetPipeline`]. `configure_import` is only called when
/// [`AssetPostProcessor::supports_import`] returns true.
pub trait AssetPostProcessor {
    /// Whether this host applies per-asset import settings.
    fn supports_import(&self) -> bool {
        false
    }

    /// Make the host aware of a newly written asset (index refresh).
    fn register_asset(&mut self, asset_path: &str) -> CaptureResult<()>;

    /// Apply import settings to a registered asset and reimport it.
    fn configure_import(&mut self, asset_path: &str, settings: &ImportSettings) -> CaptureResult<()> {
        let _ = (asset_path, settings);
        Ok(())
    }
}

/// Asset pipeline that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssetPipeline;

impl AssetPostProcessor for NoAssetPipeline {
    fn register_asset(&mut self, _asset_path: &str) -> CaptureResult<()> {
        Ok(())
    }
}

/// One entry of a [`JsonAssetIndex`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetEntry {
    /// Import settings last applied to the asset, if any.
    #[serde(default)]
    pub import: Option<ImportSettings>,
}

/// File-backed asset index stored at `{asset_root}/.mapshot/assets.json`.
///
/// The index is rewritten on every registration and import change so it always mirrors what is on
/// disk.
#[derive(Debug)]
pub struct JsonAssetIndex {
    path: PathBuf,
    entries: BTreeMap<String, AssetEntry>,
}

impl JsonAssetIndex {
    /// Relative location of the index file under an asset root.
    pub const INDEX_PATH: &'static str = ".mapshot/assets.json";

    /// Open the index under `asset_root`, loading existing entries if the file exists.
    pub fn open(asset_root: impl AsRef<Path>) -> CaptureResult<Self> {
        let path = asset_root.as_ref().join(Self::INDEX_PATH);
        let entries = if path.exists() {
            let f = File::open(&path)
                .with_context(|| format!("open asset index '{}'", path.display()))?;
            serde_json::from_reader(BufReader::new(f)).map_err(|e| {
                CaptureError::serde(format!("parse asset index '{}': {e}", path.display()))
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Location of the index file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up an entry by asset path.
    pub fn get(&self, asset_path: &str) -> Option<&AssetEntry> {
        self.entries.get(asset_path)
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no assets are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> CaptureResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create asset index dir '{}'", parent.display()))?;
        }
        let f = File::create(&self.path)
            .with_context(|| format!("create asset index '{}'", self.path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, &self.entries)
            .map_err(|e| CaptureError::serde(format!("write asset index: {e}")))?;
        w.write_all(b"\n")
            .and_then(|_| w.flush())
            .with_context(|| format!("flush asset index '{}'", self.path.display()))?;
        Ok(())
    }
}

impl AssetPostProcessor for JsonAssetIndex {
    fn supports_import(&self) -> bool {
        true
    }

    fn register_asset(&mut self, asset_path: &str) -> CaptureResult<()> {
        self.entries.entry(asset_path.to_string()).or_default();
        self.save()
    }

    fn configure_import(&mut self, asset_path: &str, settings: &ImportSettings) -> CaptureResult<()> {
        let entry = self.entries.get_mut(asset_path).ok_or_else(|| {
            CaptureError::validation(format!("asset '{asset_path}' is not registered"))
        })?;
        entry.import = Some(settings.clone());
        self.save()
    }
}

/// Host asset key for a file under `asset_root`: `Assets/<relative path>` with forward slashes.
pub fn asset_path(asset_root: &Path, path: &Path) -> CaptureResult<String> {
    let rel = path.strip_prefix(asset_root).map_err(|_| {
        CaptureError::validation(format!(
            "'{}' is not under asset root '{}'",
            path.display(),
            asset_root.display()
        ))
    })?;

    let mut out = String::from("Assets");
    for part in rel.to_string_lossy().replace('\\', "/").split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        out.push('/');
        out.push_str(part);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/persist/assets.rs"]
mod tests;
