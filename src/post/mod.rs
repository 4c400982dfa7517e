/// Inverse-gamma correction applied to rendered buffers before encoding.
pub mod gamma;
