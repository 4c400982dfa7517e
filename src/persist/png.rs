use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::core::unit_to_u8,
    foundation::error::CaptureResult,
    render::backend::PixelBuffer,
};

/// Quantize a buffer to 8-bit RGB, clamping channels to `[0, 1]`.
pub fn to_rgb8(buffer: &PixelBuffer) -> CaptureResult<Vec<u8>> {
    buffer.validate()?;
    Ok(buffer.data.iter().copied().map(unit_to_u8).collect())
}

/// Encode a buffer as a 24-bit RGB PNG and write it to `path`, replacing any existing file.
pub fn encode_and_write(buffer: &PixelBuffer, path: &Path) -> CaptureResult<()> {
    let bytes = to_rgb8(buffer)?;
    image::save_buffer_with_format(
        path,
        &bytes,
        buffer.width,
        buffer.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/persist/png.rs"]
mod tests;
