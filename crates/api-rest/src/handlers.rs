//! Request handlers for the file gateway HTTP surface.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Multipart, Path as AxumPath, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::ToSchema;

/// Response body for a successful upload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Fixed success message
    pub message: String,
    /// Original filename as supplied by the client
    pub file_name: String,
    /// Absolute resolved storage path on the server's filesystem
    pub full_path: String,
    /// Visitor identifier, echoed back when the route supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,
}

/// Query parameters for download and delete.
#[derive(Debug, Deserialize)]
pub struct FilePathQuery {
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is running", body = String)
    )
)]
/// Liveness check.
#[axum::debug_handler]
pub async fn health() -> Json<&'static str> {
    Json("Server is running")
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Single file part named `file`"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file part, or validation failure"),
        (status = 500, description = "Internal server error")
    )
)]
/// Stores an uploaded file without a visitor identifier.
#[axum::debug_handler]
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    store_upload(state, None, multipart).await
}

#[utoipa::path(
    post,
    path = "/upload/{visitorId}",
    params(
        ("visitorId" = String, Path, description = "Visitor identifier embedded in the stored filename")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Single file part named `file`"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file part, or validation failure"),
        (status = 500, description = "Internal server error")
    )
)]
/// Stores an uploaded file, prefixing the stored name with the visitor id.
#[axum::debug_handler]
pub async fn upload_for_visitor(
    State(state): State<AppState>,
    AxumPath(visitor_id): AxumPath<String>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    store_upload(state, Some(visitor_id), multipart).await
}

/// Shared upload path: finds the `file` part and hands it to the store.
///
/// Parts other than `file` are ignored, matching the single-file contract.
async fn store_upload(
    state: AppState,
    visitor_id: Option<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            return Err(ApiError::NoFileUploaded);
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await?;

        let stored = state
            .store
            .store(&file_name, &content_type, visitor_id.as_deref(), &bytes)
            .map_err(ApiError::Upload)?;

        tracing::info!(
            file = %stored.relative_path,
            size = stored.size_bytes,
            visitor = ?stored.visitor_id,
            "stored upload"
        );

        return Ok(Json(UploadResponse {
            message: "File uploaded successfully.".to_string(),
            file_name: stored.file_name,
            full_path: stored.full_path.display().to_string(),
            visitor_id: stored.visitor_id,
        }));
    }

    Err(ApiError::NoFileUploaded)
}

#[utoipa::path(
    get,
    path = "/download",
    params(
        ("filePath" = String, Query, description = "Path returned by a prior upload")
    ),
    responses(
        (status = 200, description = "File bytes with attachment disposition"),
        (status = 400, description = "Missing or invalid file path"),
        (status = 404, description = "File not found")
    )
)]
/// Streams a stored file back as an attachment.
#[axum::debug_handler]
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<FilePathQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let file_path = query.file_path.ok_or(ApiError::MissingFilePath)?;
    let bytes = state.store.read(&file_path).map_err(ApiError::Download)?;

    let basename = Path::new(&file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_path.as_str())
        .to_string();

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={basename}"),
            ),
        ],
        bytes,
    ))
}

#[utoipa::path(
    delete,
    path = "/delete",
    params(
        ("filePath" = String, Query, description = "Path returned by a prior upload")
    ),
    responses(
        (status = 200, description = "File deleted", body = String),
        (status = 400, description = "Missing or invalid file path"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Removal failed")
    )
)]
/// Permanently removes a stored file.
#[axum::debug_handler]
pub async fn delete_file(
    State(state): State<AppState>,
    Query(query): Query<FilePathQuery>,
) -> Result<Json<&'static str>, ApiError> {
    let file_path = query.file_path.ok_or(ApiError::MissingFilePath)?;
    state.store.remove(&file_path).map_err(ApiError::Delete)?;

    tracing::info!(file = %file_path, "deleted file");
    Ok(Json("File deleted successfully"))
}
