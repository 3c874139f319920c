use crate::upload::UploadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("record source failed: {0}")]
    Source(String),
}

impl From<serde_json::Error> for ConsoleError {
    fn from(e: serde_json::Error) -> Self {
        ConsoleError::Invalid(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
