//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::handlers;
use crate::config::Config;
use crate::upstream::PartsProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn PartsProvider>,
}

/// Only configured origins get CORS headers; `*` opens it to all
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid allowed origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn router(provider: Arc<dyn PartsProvider>, config: &Config) -> Router {
    let app_state = AppState { provider };

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/bilibili-parts", get(handlers::parts_handler))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.server.allowed_origins)),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(
    provider: Arc<dyn PartsProvider>,
    config: Arc<Config>,
    port: u16,
) -> Result<()> {
    let app = router(provider, &config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);
    info!("🔗 Allowed origins: {}", config.server.allowed_origins.join(", "));

    axum::serve(listener, app).await?;

    Ok(())
}
