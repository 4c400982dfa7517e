use rayon::prelude::*;

use crate::{
    foundation::error::{CaptureError, CaptureResult},
    render::backend::PixelBuffer,
};

/// Gamma used for captures unless configured otherwise.
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Raise every RGB channel to `1 / gamma`, in place.
///
/// Negative channels clamp to zero first; values above one are kept (HDR input). Rows are
/// processed in parallel since pixels are independent.
pub fn apply_gamma(buffer: &mut PixelBuffer, gamma: f32) -> CaptureResult<()> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(CaptureError::validation("gamma must be finite and > 0"));
    }
    buffer.validate()?;

    let inv = 1.0 / gamma;
    let row_len = (buffer.width as usize) * 3;
    buffer.data.par_chunks_mut(row_len).for_each(|row| {
        for c in row.iter_mut() {
            *c = c.max(0.0).powf(inv);
        }
    });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/post/gamma.rs"]
mod tests;
