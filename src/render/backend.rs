use crate::{
    foundation::core::{Resolution, Rgb, ViewpointId},
    foundation::error::{CaptureError, CaptureResult},
    scene::context::SceneContext,
};

/// A rendered image read back into CPU memory.
///
/// Pixels are linear RGB, three `f32` channels per pixel, row-major and tightly packed. Values
/// above `1.0` are allowed so renderers can hand back high-dynamic-range results.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB channels, `width * height * 3` values.
    pub data: Vec<f32>,
}

impl PixelBuffer {
    /// A buffer of the given size filled with one color.
    pub fn filled(resolution: Resolution, color: Rgb) -> Self {
        let mut data = Vec::with_capacity(resolution.pixel_count() * 3);
        for _ in 0..resolution.pixel_count() {
            data.extend_from_slice(&color.0);
        }
        Self {
            width: resolution.width,
            height: resolution.height,
            data,
        }
    }

    /// Number of `f32` values a buffer of this size must hold.
    pub fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 3
    }

    /// Check that `data` matches the declared dimensions.
    pub fn validate(&self) -> CaptureResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptureError::validation(
                "pixel buffer width/height must be > 0",
            ));
        }
        if self.data.len() != self.expected_len() {
            return Err(CaptureError::validation(format!(
                "pixel buffer holds {} values, expected {} ({}x{}x3)",
                self.data.len(),
                self.expected_len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Channels of pixel `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        self.data.get(i..i + 3).map(|c| [c[0], c[1], c[2]])
    }
}

/// Renders one viewpoint of a scene into an offscreen buffer and reads it back.
///
/// Implementations allocate a fresh render target sized exactly to `resolution` for every call and
/// release it before returning; nothing is reused across images. Lighting is refreshed by the
/// caller through [`SceneContext::refresh_lighting`] before each call.
pub trait Renderer<S: SceneContext + ?Sized> {
    /// Render `viewpoint` and return the read-back pixels.
    fn render(
        &mut self,
        scene: &S,
        viewpoint: &ViewpointId,
        resolution: Resolution,
    ) -> CaptureResult<PixelBuffer>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
