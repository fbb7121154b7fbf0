//! Gateway runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the
//! server's construction. Handlers never read environment variables, which
//! keeps behaviour consistent across threads and test harnesses.

use gateway_storage::DEFAULT_UPLOADS_DIR_NAME;
use std::path::{Path, PathBuf};

/// Listening port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

/// Gateway configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    port: u16,
    uploads_root: PathBuf,
}

impl GatewayConfig {
    /// Create a new `GatewayConfig`.
    pub fn new(port: u16, uploads_root: PathBuf) -> Self {
        Self { port, uploads_root }
    }

    /// Resolve configuration from the environment.
    ///
    /// - `PORT`: listening port, default 3000
    /// - `UPLOADS_DIR`: uploads root directory, default `uploads`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPort` if `PORT` is set but not a valid
    /// port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            Err(_) => DEFAULT_PORT,
        };

        let uploads_root = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOADS_DIR_NAME));

        Ok(Self { port, uploads_root })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn uploads_root(&self) -> &Path {
        &self.uploads_root
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, PathBuf::from(DEFAULT_UPLOADS_DIR_NAME))
    }
}
