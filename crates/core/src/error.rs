/// Result alias that carries the custom [`SortAnimError`] type.
pub type Result<T> = std::result::Result<T, SortAnimError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SortAnimError {
    /// Configuration or input values that cannot drive the pipeline.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Wrapper around standard IO errors (directory creation, frame writes).
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// PNG or GIF encoding/decoding failure.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    /// Malformed configuration file.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl SortAnimError {
    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidInput(msg.into())
    }
}
