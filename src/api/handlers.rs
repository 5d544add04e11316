//! API request handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::server::AppState;
use crate::error::{DomainError, UpstreamError};
use crate::identifier::require_identifier;
use crate::parts::PartsEnvelope;

#[derive(Debug, Deserialize)]
pub struct PartsQuery {
    pub url: Option<String>,
}

/// HTTP status for each failure kind
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::EmptyResult { .. } => StatusCode::NOT_FOUND,
        DomainError::Upstream(UpstreamError::Transport(_)) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Upstream(UpstreamError::Status { .. })
        | DomainError::Upstream(UpstreamError::Api { .. }) => StatusCode::BAD_GATEWAY,
        DomainError::Upstream(UpstreamError::Decode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::SearchInFlight => StatusCode::TOO_MANY_REQUESTS,
        DomainError::RangeConstraint(_) | DomainError::UnknownPart { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn error_response(error: &DomainError) -> Response {
    (status_for(error), Json(json!({ "error": error.to_string() }))).into_response()
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "bili-duration",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// `GET /bilibili-parts?url=<identifier or link>`
pub async fn parts_handler(
    State(state): State<AppState>,
    Query(query): Query<PartsQuery>,
) -> Response {
    let Some(input) = query.url.filter(|u| !u.is_empty()) else {
        warn!("Missing 'url' parameter");
        return error_response(&DomainError::Validation("missing 'url' parameter".to_string()));
    };

    let bvid = match require_identifier(&input) {
        Ok(bvid) => bvid,
        Err(e) => {
            warn!("Invalid identifier in input: {}", input);
            return error_response(&e);
        }
    };

    info!("Handling part lookup for {}", bvid);
    match state.provider.fetch_parts(&bvid).await {
        Ok(parts) => {
            info!("Returning {} parts for {}", parts.len(), bvid);
            (StatusCode::OK, Json(PartsEnvelope { parts })).into_response()
        }
        Err(e) => error_response(&e),
    }
}
