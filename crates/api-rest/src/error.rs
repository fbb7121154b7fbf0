//! API error taxonomy and response mapping.

use axum::extract::multipart::MultipartError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use gateway_storage::StorageError;
use thiserror::Error as ThisError;

/// Errors surfaced by the REST handlers.
///
/// Each request fails independently; none of these are fatal to the server
/// process.
#[derive(ThisError, Debug)]
pub enum ApiError {
    /// Upload request carried no `file` part
    #[error("No files were uploaded.")]
    NoFileUploaded,

    /// Download/delete request carried no `filePath` query parameter
    #[error("File path is missing")]
    MissingFilePath,

    /// Upload failed storage validation or persistence
    #[error("upload failed: {0}")]
    Upload(#[source] StorageError),

    /// Download failed
    #[error("download failed: {0}")]
    Download(#[source] StorageError),

    /// Delete failed
    #[error("delete failed: {0}")]
    Delete(#[source] StorageError),

    /// Multipart body could not be decoded
    #[error("multipart decode failed: {0}")]
    Multipart(#[from] MultipartError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFileUploaded | ApiError::MissingFilePath | ApiError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Upload(e) => match e {
                StorageError::TooLarge { .. }
                | StorageError::DisallowedType
                | StorageError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Download(e) | ApiError::Delete(e) => match e {
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                StorageError::OutsideRoot(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message sent to the client.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NoFileUploaded => "No files were uploaded.".to_string(),
            ApiError::MissingFilePath => "File path is missing".to_string(),
            ApiError::Upload(e) => match e {
                StorageError::TooLarge { .. }
                | StorageError::DisallowedType
                | StorageError::InvalidFileName(_) => format!("File upload error: {e}"),
                _ => format!("Internal server error: {e}"),
            },
            ApiError::Download(e) => match e {
                StorageError::NotFound(_) => "File not found".to_string(),
                StorageError::OutsideRoot(_) => "Invalid file path".to_string(),
                _ => format!("Internal server error: {e}"),
            },
            ApiError::Delete(e) => match e {
                StorageError::NotFound(_) => "File not found".to_string(),
                StorageError::OutsideRoot(_) => "Invalid file path".to_string(),
                _ => "Error deleting the file".to_string(),
            },
            ApiError::Multipart(e) => format!("File upload error: {e}"),
            ApiError::Internal(e) => format!("Internal server error: {e}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(self.user_message())).into_response()
    }
}
