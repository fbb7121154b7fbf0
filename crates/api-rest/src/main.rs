//! Standalone REST API server binary.
//!
//! Runs the gateway REST server on its own, useful for development and
//! debugging. The workspace's main `file-gateway` binary is the deployment
//! entry point.

use api_rest::GatewayConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Starts the REST server with configuration taken from the environment.
///
/// # Environment Variables
/// - `PORT`: listening port (default: 3000)
/// - `UPLOADS_DIR`: uploads root directory (default: "uploads")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;
    api_rest::serve(&config).await
}
