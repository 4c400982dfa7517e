/// Convenience result type used across mapshot.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Top-level error taxonomy used by capture APIs.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    /// The default capture viewpoint is unset or does not resolve in the scene.
    #[error("no default capture camera assigned")]
    NoDefaultCamera,

    /// The capture configuration lists no maps.
    #[error("no maps assigned")]
    NoMapsConfigured,

    /// Invalid user-provided configuration or buffer data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised by a renderer while producing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptureError {
    /// Build a [`CaptureError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptureError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CaptureError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this condition only warrants a warning (the run is a no-op, not a failure).
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoMapsConfigured)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
