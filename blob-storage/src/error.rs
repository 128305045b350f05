use thiserror::Error;
use uuid::Uuid;

pub type BlobResult<T> = Result<T, BlobError>;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    SecurityViolation(String),

    #[error("Not found: {0}")]
    NotFound(Uuid),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
