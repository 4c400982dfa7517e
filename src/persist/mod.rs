//! Writing captures to disk and notifying the host asset pipeline.

/// Host asset-pipeline hooks and the JSON asset index.
pub mod assets;
/// PNG encoding.
pub mod png;
