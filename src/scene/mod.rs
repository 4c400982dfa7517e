//! Scene graph access.
//!
//! The orchestrator only talks to [`context::SceneContext`]; [`memory::MemoryScene`] is the
//! bundled in-memory implementation used by the CLI and tests.

/// The injected scene graph interface.
pub mod context;
/// In-memory scene graph.
pub mod memory;
