/// Direct client for the platform's pagelist API
use async_trait::async_trait;
use reqwest::header::REFERER;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::PartsProvider;
use crate::config::UpstreamConfig;
use crate::error::{DomainError, Result, UpstreamError};
use crate::parts::{PageListResponse, Part};

/// Longest body excerpt carried in an error message
const BODY_EXCERPT_LEN: usize = 200;

#[derive(Clone)]
pub struct BilibiliClient {
    client: Client,
    api_base: String,
    referer_base: String,
    debug_bodies: bool,
}

impl BilibiliClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            referer_base: config.referer_base.clone(),
            debug_bodies: config.debug_bodies,
        })
    }

    pub fn pagelist_url(&self, bvid: &str) -> String {
        format!(
            "{}/x/player/pagelist?bvid={}",
            self.api_base,
            urlencoding::encode(bvid)
        )
    }

    fn referer(&self, bvid: &str) -> String {
        format!("{}{}", self.referer_base, bvid)
    }
}

pub(crate) fn excerpt(body: &str) -> String {
    let mut text: String = body.chars().take(BODY_EXCERPT_LEN).collect();
    if body.chars().count() > BODY_EXCERPT_LEN {
        text.push('…');
    }
    text
}

/// Interpret a pagelist reply
pub fn parse_pagelist(bvid: &str, status: StatusCode, body: &str) -> Result<Vec<Part>> {
    if status != StatusCode::OK {
        warn!("Platform API returned status {} for {}: {}", status, bvid, excerpt(body));
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            message: excerpt(body),
        }
        .into());
    }

    let response: PageListResponse = serde_json::from_str(body).map_err(|e| {
        warn!("Failed to decode pagelist for {}: {}", bvid, e);
        UpstreamError::Decode(e.to_string())
    })?;

    if response.code != 0 {
        warn!(
            "Platform API error for {}: {} (code: {})",
            bvid, response.message, response.code
        );
        return Err(UpstreamError::Api {
            code: response.code,
            message: response.message,
        }
        .into());
    }

    let parts: Vec<Part> = response
        .data
        .unwrap_or_default()
        .into_iter()
        .map(Part::from)
        .collect();

    if parts.is_empty() {
        info!("No parts found for {}", bvid);
        return Err(DomainError::EmptyResult {
            bvid: Some(bvid.to_string()),
        });
    }

    Ok(parts)
}

pub(crate) fn transport_error(e: reqwest::Error) -> DomainError {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    };
    UpstreamError::Transport(message).into()
}

#[async_trait]
impl PartsProvider for BilibiliClient {
    async fn fetch_parts(&self, bvid: &str) -> Result<Vec<Part>> {
        let url = self.pagelist_url(bvid);
        info!("📡 Fetching part list: {}", url);

        let response = self
            .client
            .get(&url)
            .header(REFERER, self.referer(bvid))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!("Platform API responded with status {}", status);

        let body = response.text().await.map_err(transport_error)?;
        if self.debug_bodies {
            debug!("Platform API raw response body: {}", body);
        }

        let parts = parse_pagelist(bvid, status, &body)?;
        info!("✅ Fetched {} parts for {}", parts.len(), bvid);
        Ok(parts)
    }

    fn name(&self) -> &'static str {
        "bilibili"
    }
}
