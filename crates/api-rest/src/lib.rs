//! File gateway REST API.
//!
//! Exposes the four-endpoint HTTP surface over [`gateway_storage`]:
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | GET | `/` | liveness |
//! | POST | `/upload`, `/upload/:visitorId` | store a file |
//! | GET | `/download?filePath=…` | retrieve a file |
//! | DELETE | `/delete?filePath=…` | remove a file |
//!
//! Cross-origin requests are permitted from any origin. OpenAPI documentation
//! is served through Swagger UI at `/swagger-ui`.

pub mod config;
pub mod error;
pub mod handlers;

pub use config::GatewayConfig;
pub use error::ApiError;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use gateway_storage::{UploadStore, MAX_UPLOAD_BYTES};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Request body cap for the router.
///
/// Kept above the 2 MiB upload limit (plus multipart framing overhead) so the
/// storage validator, not the transport, produces the oversize rejection.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES as usize + 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UploadStore>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::upload,
        handlers::upload_for_visitor,
        handlers::download,
        handlers::delete_file,
    ),
    components(schemas(handlers::UploadResponse))
)]
pub struct ApiDoc;

/// Builds the gateway router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/upload/:visitor_id", post(handlers::upload_for_visitor))
        .route("/download", get(handlers::download))
        .route("/delete", delete(handlers::delete_file))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Opens the upload store and serves the gateway until the process exits.
///
/// # Errors
///
/// Returns an error if the uploads root cannot be prepared, the address
/// cannot be bound, or the HTTP server fails while running.
pub async fn serve(config: &GatewayConfig) -> anyhow::Result<()> {
    let store = UploadStore::new(config.uploads_root())?;
    tracing::info!(root = %store.root().display(), "upload store ready");

    let app = build_router(AppState {
        store: Arc::new(store),
    });

    let addr = config.bind_addr();
    tracing::info!("-- File gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
