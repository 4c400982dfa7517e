use std::fmt;

use crate::foundation::error::{CaptureError, CaptureResult};

/// Stable identifier of a node in a scene graph.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Build a node id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a viewpoint (camera) in a scene graph.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ViewpointId(pub String);

impl ViewpointId {
    /// Build a viewpoint id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render target dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a validated resolution with both dimensions > 0.
    pub fn new(width: u32, height: u32) -> CaptureResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptureError::validation(
                "resolution width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Total pixel count.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Linear RGB color, channels nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    /// Opaque black.
    pub const BLACK: Rgb = Rgb([0.0, 0.0, 0.0]);

    /// Multiply every channel by `k`.
    pub fn scale(self, k: f32) -> Self {
        let [r, g, b] = self.0;
        Self([r * k, g * k, b * k])
    }

    /// Quantize to 8-bit channels, clamping to `[0, 1]` first.
    pub fn to_rgb8(self) -> [u8; 3] {
        self.0.map(unit_to_u8)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Map a normalized channel to `0..=255` with rounding.
pub fn unit_to_u8(c: f32) -> u8 {
    if !c.is_finite() {
        return if c > 0.0 { 255 } else { 0 };
    }
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
