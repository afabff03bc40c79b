use crate::color::Channel;

/// Result alias that carries the custom [`FractalError`] type.
pub type Result<T> = std::result::Result<T, FractalError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum FractalError {
    /// Raw settings were rejected during normalization. The store is left
    /// untouched and the engine never runs.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// An interpolated color channel left `0..=255` while a pass was running.
    #[error("{channel} channel reached {value}, outside 0..=255")]
    ColorComponentOutOfRange { channel: Channel, value: i32 },
    /// A branch end point fell outside the `i32` pixel grid. Like a color
    /// overflow, it aborts the pass.
    #[error("branch end point ({x}, {y}) does not fit in pixel coordinates")]
    CoordinateOutOfRange { x: f64, y: f64 },
    /// Free-form message for failures outside the generation pipeline.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON configuration.
    #[error("configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl FractalError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid<T: Into<String>>(reason: T) -> Self {
        Self::InvalidSettings(reason.into())
    }
}
