//! HTTP service exposing part lookups to browser front-ends
//!
//! Serves `GET /bilibili-parts?url=...` with origin-restricted CORS.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::upstream::PartsProvider;

pub mod handlers;
pub mod server;

/// API server for part lookups
pub struct ApiServer {
    provider: Arc<dyn PartsProvider>,
    config: Arc<Config>,
    port: u16,
}

impl ApiServer {
    pub fn new(provider: Arc<dyn PartsProvider>, config: Arc<Config>) -> Self {
        let port = config.server.port;
        Self {
            provider,
            config,
            port,
        }
    }

    /// Serve until the listener fails
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on port {}", self.port);
        server::start_http_server(self.provider, self.config, self.port).await
    }
}
