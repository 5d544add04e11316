/// Client for a deployed `/bilibili-parts` service
///
/// Lets the CLI run against the HTTP service instead of calling the platform
/// directly, e.g. when the platform blocks the client's network.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use super::bilibili::{excerpt, transport_error};
use super::PartsProvider;
use crate::config::UpstreamConfig;
use crate::error::{DomainError, Result, UpstreamError};
use crate::parts::{Part, PartsEnvelope};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, input: &str) -> String {
        format!(
            "{}/bilibili-parts?url={}",
            self.base_url,
            urlencoding::encode(input)
        )
    }
}

/// Error bodies are either `{"error": "..."}` or plain text
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => excerpt(body.trim()),
    }
}

/// Interpret a `/bilibili-parts` reply
pub fn parse_backend_reply(bvid: &str, status: StatusCode, body: &str) -> Result<Vec<Part>> {
    match status {
        StatusCode::OK => {
            let envelope: PartsEnvelope = serde_json::from_str(body)
                .map_err(|e| UpstreamError::Decode(e.to_string()))?;
            if envelope.parts.is_empty() {
                return Err(DomainError::EmptyResult {
                    bvid: Some(bvid.to_string()),
                });
            }
            Ok(envelope.parts)
        }
        StatusCode::NOT_FOUND => Err(DomainError::EmptyResult {
            bvid: Some(bvid.to_string()),
        }),
        StatusCode::BAD_REQUEST => Err(DomainError::Validation(error_message(body))),
        other => {
            warn!("Backend returned status {} for {}", other, bvid);
            Err(UpstreamError::Status {
                status: other.as_u16(),
                message: error_message(body),
            }
            .into())
        }
    }
}

#[async_trait]
impl PartsProvider for BackendClient {
    async fn fetch_parts(&self, bvid: &str) -> Result<Vec<Part>> {
        let url = self.endpoint(bvid);
        info!("📡 Calling backend: {}", url);

        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        let parts = parse_backend_reply(bvid, status, &body)?;
        info!("✅ Backend returned {} parts for {}", parts.len(), bvid);
        Ok(parts)
    }

    fn name(&self) -> &'static str {
        "backend"
    }
}
