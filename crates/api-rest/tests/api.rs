//! End-to-end tests for the gateway HTTP surface.

use api_rest::{build_router, AppState};
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use gateway_storage::UploadStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Spins up a test server over a store rooted in `temp`.
fn test_server(temp: &TempDir) -> (TestServer, PathBuf) {
    let root = temp.path().join("uploads");
    let store = UploadStore::new(&root).expect("store should initialise");
    let app = build_router(AppState {
        store: Arc::new(store),
    });
    (TestServer::new(app).expect("test server"), root)
}

fn jpeg_form(file_name: &str, bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes).file_name(file_name).mime_type("image/jpeg"),
    )
}

/// Counts regular files anywhere under the uploads root.
fn stored_file_count(root: &Path) -> usize {
    fn walk(dir: &Path, count: &mut usize) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, count);
            } else {
                *count += 1;
            }
        }
    }
    let mut count = 0;
    walk(root, &mut count);
    count
}

#[tokio::test]
async fn health_check_responds() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);

    let response = server.get("/").await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<String>(), "Server is running");
}

#[tokio::test]
async fn upload_with_visitor_id_stores_prefixed_file() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);

    let response = server
        .post("/upload/visitor42")
        .multipart(jpeg_form("photo.jpg", b"jpeg bytes".to_vec()))
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["message"], "File uploaded successfully.");
    assert_eq!(body["fileName"], "photo.jpg");
    assert_eq!(body["visitorId"], "visitor42");

    let full_path = body["fullPath"].as_str().unwrap();
    assert!(full_path.ends_with("visitor42-photo.jpg"));
    assert!(full_path.contains("/uploads/"));
    assert_eq!(fs::read(full_path).unwrap(), b"jpeg bytes");
}

#[tokio::test]
async fn upload_without_visitor_id_keeps_original_name() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);

    let response = server
        .post("/upload")
        .multipart(jpeg_form("photo.jpg", b"x".to_vec()))
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.json::<serde_json::Value>();
    assert!(body["fullPath"].as_str().unwrap().ends_with("/photo.jpg"));
    assert!(body.get("visitorId").is_none());
}

#[tokio::test]
async fn upload_without_file_part_is_rejected() {
    let temp = TempDir::new().unwrap();
    let (server, root) = test_server(&temp);

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<String>(), "No files were uploaded.");
    assert_eq!(stored_file_count(&root), 0);
}

#[tokio::test]
async fn upload_disallowed_type_is_rejected_and_not_written() {
    let temp = TempDir::new().unwrap();
    let (server, root) = test_server(&temp);

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"MZ".to_vec())
            .file_name("report.exe")
            .mime_type("application/octet-stream"),
    );
    let response = server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let message = response.json::<String>();
    assert!(message.starts_with("File upload error: "));
    assert_eq!(stored_file_count(&root), 0);
}

#[tokio::test]
async fn upload_malformed_multipart_is_rejected() {
    let temp = TempDir::new().unwrap();
    let (server, root) = test_server(&temp);

    // Field headers with no terminating boundary: the body ends mid-stream
    let body = axum::body::Bytes::from_static(
        b"--XBOUNDARY\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo.jpg\"\r\n",
    );
    let response = server
        .post("/upload")
        .content_type("multipart/form-data; boundary=XBOUNDARY")
        .bytes(body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<String>().starts_with("File upload error: "));
    assert_eq!(stored_file_count(&root), 0);
}

#[tokio::test]
async fn upload_oversize_file_is_rejected_and_not_written() {
    let temp = TempDir::new().unwrap();
    let (server, root) = test_server(&temp);

    let oversized = vec![0u8; 2 * 1024 * 1024 + 1];
    let response = server
        .post("/upload")
        .multipart(jpeg_form("big.jpg", oversized))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<String>().starts_with("File upload error: "));
    assert_eq!(stored_file_count(&root), 0);
}

#[tokio::test]
async fn download_returns_bytes_with_attachment_disposition() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);

    let upload = server
        .post("/upload/visitor42")
        .multipart(jpeg_form("photo.jpg", b"original bytes".to_vec()))
        .await;
    upload.assert_status(StatusCode::OK);
    let full_path = upload.json::<serde_json::Value>()["fullPath"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .get("/download")
        .add_query_param("filePath", &full_path)
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.as_bytes().to_vec(), b"original bytes".to_vec());
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(disposition, "attachment; filename=visitor42-photo.jpg");
}

#[tokio::test]
async fn download_without_file_path_is_400() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);

    let response = server.get("/download").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<String>(), "File path is missing");
}

#[tokio::test]
async fn download_missing_file_is_404() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);

    let response = server
        .get("/download")
        .add_query_param("filePath", "uploads/2024/03/05/missing.jpg")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<String>(), "File not found");
}

#[tokio::test]
async fn download_traversal_path_is_rejected() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);
    fs::write(temp.path().join("secret.txt"), b"secret").unwrap();

    let response = server
        .get("/download")
        .add_query_param("filePath", "uploads/../secret.txt")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<String>(), "Invalid file path");
}

#[tokio::test]
async fn delete_removes_file_then_download_is_404() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);

    let upload = server
        .post("/upload/visitor42")
        .multipart(jpeg_form("photo.jpg", b"bytes".to_vec()))
        .await;
    let full_path = upload.json::<serde_json::Value>()["fullPath"]
        .as_str()
        .unwrap()
        .to_string();

    let deleted = server
        .delete("/delete")
        .add_query_param("filePath", &full_path)
        .await;
    deleted.assert_status(StatusCode::OK);
    assert_eq!(deleted.json::<String>(), "File deleted successfully");
    assert!(!Path::new(&full_path).exists());

    let download = server
        .get("/download")
        .add_query_param("filePath", &full_path)
        .await;
    download.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_without_file_path_is_400() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);

    let response = server.delete("/delete").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<String>(), "File path is missing");
}

#[tokio::test]
async fn delete_missing_file_is_404() {
    let temp = TempDir::new().unwrap();
    let (server, _root) = test_server(&temp);

    let response = server
        .delete("/delete")
        .add_query_param("filePath", "uploads/2024/03/05/missing.jpg")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<String>(), "File not found");
}
