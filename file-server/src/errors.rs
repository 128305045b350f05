use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use blob_store::BlobError;
use serde_json::json;
use thiserror::Error;


#[derive(Debug, Error)]
pub enum FileServerErr {
    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error("Failed to read multipart upload: {0}")]
    Multipart(String),

    #[error("Upload has no `file` part")]
    MissingFile,

    #[error("Upload exceeds the limit of {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Invalid file id")]
    InvalidId(#[from] uuid::Error),

    #[error("Storage task was cancelled")]
    Blocking(#[from] BlockingError),
}

impl ResponseError for FileServerErr {
    fn status_code(&self) -> StatusCode {
        match self {
            FileServerErr::Blob(BlobError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            FileServerErr::Blob(BlobError::SecurityViolation(_)) => StatusCode::FORBIDDEN,
            FileServerErr::Blob(BlobError::NotFound(_)) => StatusCode::NOT_FOUND,
            FileServerErr::Blob(BlobError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            FileServerErr::Multipart(_) => StatusCode::BAD_REQUEST,
            FileServerErr::MissingFile => StatusCode::BAD_REQUEST,
            FileServerErr::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            FileServerErr::InvalidId(_) => StatusCode::BAD_REQUEST,
            FileServerErr::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
