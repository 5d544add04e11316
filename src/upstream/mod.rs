//! Metadata providers
//!
//! The session only sees [`PartsProvider`]; where the part list actually
//! comes from is decided once at startup by [`create_provider`].

pub mod backend;
pub mod bilibili;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::parts::Part;

pub use backend::BackendClient;
pub use bilibili::BilibiliClient;

/// Fetches the ordered part list for a normalized identifier
#[async_trait]
pub trait PartsProvider: Send + Sync {
    async fn fetch_parts(&self, bvid: &str) -> Result<Vec<Part>>;

    /// Short label for logs
    fn name(&self) -> &'static str;
}

/// Create the provider selected by configuration
pub fn create_provider(config: &Config) -> anyhow::Result<Arc<dyn PartsProvider>> {
    match &config.upstream.backend_url {
        Some(base) => Ok(Arc::new(BackendClient::new(base, &config.upstream)?)),
        None => Ok(Arc::new(BilibiliClient::new(&config.upstream)?)),
    }
}
