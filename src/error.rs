//! Error types for the year-progress engine and its surfaces

use thiserror::Error;

/// Result type alias for engine and renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or rendering a year-progress view
#[derive(Error, Debug)]
pub enum Error {
    /// The reference date could not be parsed into a calendar date
    #[error("Invalid date input: {0}")]
    InvalidDateInput(String),

    /// Width or height is non-positive, non-finite or above the allowed maximum
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvasSize { width: f64, height: f64 },

    /// A request parameter was present but malformed
    #[error("Invalid value for parameter `{name}`: {value:?}")]
    InvalidParameter { name: String, value: String },

    /// Failed to turn a render model into drawing output
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode the final image bytes
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    /// I/O failure while writing output or serving requests
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error was caused by caller input rather than an internal failure.
    ///
    /// HTTP surfaces map these to `400 Bad Request`.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidDateInput(_)
                | Error::InvalidCanvasSize { .. }
                | Error::InvalidParameter { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::EncodeError(err.to_string())
    }
}
