use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Why a log could not be turned into a filename
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Second line not found in log")]
    MissingSecondLine,
    #[error("Unexpected log format (fewer than 10 fields, got {fields})")]
    MalformedLogLine { fields: usize },
    #[error("Unsupported file extension {extension:?}")]
    InvalidExtension { extension: String },
}

/// Everything the upload endpoint can fail with
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file received")]
    NoFile,
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Failed to store upload: {0}")]
    Store(#[source] std::io::Error),
    #[error("Failed to read file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Failed to rename file: {0}")]
    Rename(#[source] std::io::Error),
    #[error(transparent)]
    Name(#[from] NameError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoFile | AppError::Name(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::Store(_) | AppError::Read(_) | AppError::Rename(_) => {
                tracing::error!(error = %self, "upload failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Client-facing text for I/O failures stays generic
        let message = match &self {
            AppError::Multipart(e) => e.body_text(),
            AppError::Store(_) => "Failed to store upload".to_string(),
            AppError::Read(_) => "Failed to read file".to_string(),
            AppError::Rename(_) => "Failed to rename file".to_string(),
            AppError::Name(NameError::MalformedLogLine { .. }) => {
                "Unexpected log format (fewer than 10 fields)".to_string()
            }
            other => other.to_string(),
        };

        (status, message).into_response()
    }
}
