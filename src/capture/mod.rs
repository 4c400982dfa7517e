//! The capture run: planning, scene save/restore and the per-image pipeline.

/// Output file naming.
pub mod naming;
/// Plan building and the capture loop.
pub mod orchestrator;
/// Scene state saved and restored around a run.
pub mod session;
