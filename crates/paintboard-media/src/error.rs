use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to open file: {0}")]
    OpenFailed(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("decoder error: {0}")]
    DecodeFailed(String),

    #[error("encoder error: {0}")]
    EncodeFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MediaError>;
