//! Mapshot captures top-down screenshots of every map in a scene graph.
//!
//! A run is driven by a [`CaptureConfig`]:
//!
//! - Check the config against a [`SceneContext`] and build a [`CapturePlan`]
//! - Hide the configured objects and isolate each map in turn
//! - Render every viewpoint through a [`Renderer`], undo gamma, write a PNG
//! - Register each file with an [`AssetPostProcessor`]
//! - Restore the scene
//!
//! [`MemoryScene`] and [`FlatRenderer`] are the bundled in-memory scene and CPU renderer used by
//! the `mapshot` CLI.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Capture runs.
pub mod capture;
/// Capture configuration.
pub mod config;
/// Output persistence.
pub mod persist;
/// Post-processing of rendered buffers.
pub mod post;
/// Renderer interface and the CPU renderer.
pub mod render;
/// Scene graph interface and the in-memory scene.
pub mod scene;

pub use crate::foundation::core::{NodeId, Resolution, Rgb, ViewpointId};
pub use crate::foundation::error::{CaptureError, CaptureResult};

pub use crate::capture::naming::{IMAGE_EXTENSION, camera_image_name, map_image_name};
pub use crate::capture::orchestrator::{
    CapturePlan, CaptureReport, CapturedImage, ImageFailure, PlannedImage, PlannedMap,
    SkippedCamera, capture_maps, plan_captures,
};
pub use crate::capture::session::CaptureSession;
pub use crate::config::model::{CameraBinding, CaptureConfig, CaptureProject, MapDescriptor};
pub use crate::persist::assets::{
    AssetEntry, AssetPostProcessor, ImportSettings, JsonAssetIndex, NoAssetPipeline,
    TextureCompression, asset_path,
};
pub use crate::persist::png::encode_and_write;
pub use crate::post::gamma::{DEFAULT_GAMMA, apply_gamma};
pub use crate::render::backend::{PixelBuffer, Renderer};
pub use crate::render::cpu::FlatRenderer;
pub use crate::scene::context::SceneContext;
pub use crate::scene::memory::{
    CameraDef, EmitterDef, LightDef, MemoryScene, NodeDef, SceneBuilder, SceneDef, ShapeDef,
};
