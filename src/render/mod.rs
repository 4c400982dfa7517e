/// Pixel buffers and the renderer interface.
pub mod backend;
/// CPU reference renderer for [`crate::MemoryScene`].
pub mod cpu;
