use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CoreError::InvalidParameter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
