//! File gateway entry point.
//!
//! Loads `.env`, initialises tracing, resolves configuration, and serves the
//! REST API until the process exits.

use api_rest::GatewayConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the file gateway.
///
/// # Environment Variables
/// - `PORT`: listening port (default: 3000)
/// - `UPLOADS_DIR`: uploads root directory (default: "uploads")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the uploads root cannot be prepared,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("file_gateway=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        port = config.port(),
        uploads_root = %config.uploads_root().display(),
        "starting file gateway"
    );

    api_rest::serve(&config).await
}
