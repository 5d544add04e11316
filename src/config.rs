use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for the duration calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Metadata provider settings
    pub upstream: UpstreamConfig,

    /// HTTP service settings
    pub server: ServerConfig,

    /// Interactive session timings
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the platform API
    pub api_base: String,

    /// Base URL of a deployed `/bilibili-parts` service, used instead of
    /// calling the platform directly when set
    pub backend_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// User-Agent sent to the platform
    pub user_agent: String,

    /// Referer prefix; the identifier is appended
    pub referer_base: String,

    /// Log raw response bodies
    pub debug_bodies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    pub port: u16,

    /// CORS origins; `*` allows any
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a transient message stays visible
    pub toast_millis: u64,

    /// Delay before a blurred field drops focus, so an in-flight list click
    /// still lands against the previous focus
    pub blur_grace_millis: u64,
}

impl Config {
    /// Load configuration from the first file found, falling back to the environment
    pub fn load() -> Result<Self> {
        let config_paths = ["bili-duration.toml", "config/bili-duration.toml"];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `PORT`, `API_TIMEOUT`, `USER_AGENT`, `ALLOWED_ORIGINS`, `DEBUG`
    /// and `BACKEND_API_URL` from `lookup`; unparsable values keep defaults
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT: {}", port),
            }
        }

        if let Some(timeout) = get("API_TIMEOUT") {
            match timeout.trim().parse() {
                Ok(secs) => self.upstream.timeout_seconds = secs,
                Err(_) => tracing::warn!("Ignoring invalid API_TIMEOUT: {}", timeout),
            }
        }

        if let Some(user_agent) = get("USER_AGENT") {
            self.upstream.user_agent = user_agent;
        }

        if let Some(origins) = get("ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Some(debug) = get("DEBUG") {
            self.upstream.debug_bodies = debug.trim() == "true";
        }

        if let Some(backend) = get("BACKEND_API_URL") {
            self.upstream.backend_url = Some(backend.trim().to_string());
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.upstream.timeout_seconds == 0 {
            return Err(anyhow!("upstream.timeout_seconds must be greater than 0"));
        }

        url::Url::parse(&self.upstream.api_base)
            .map_err(|e| anyhow!("upstream.api_base is not a valid URL: {}", e))?;

        if let Some(backend) = &self.upstream.backend_url {
            url::Url::parse(backend)
                .map_err(|e| anyhow!("upstream.backend_url is not a valid URL: {}", e))?;
        }

        if self.server.allowed_origins.is_empty() {
            return Err(anyhow!("server.allowed_origins must not be empty"));
        }

        if self.session.toast_millis == 0 {
            return Err(anyhow!("session.toast_millis must be greater than 0"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Duration Calculator Configuration:\n\
            - Upstream: {}\n\
            - Backend: {}\n\
            - Timeout: {}s\n\
            - Port: {}\n\
            - Allowed Origins: {}\n\
            - Toast: {}ms, Blur Grace: {}ms",
            self.upstream.api_base,
            self.upstream.backend_url.as_deref().unwrap_or("none"),
            self.upstream.timeout_seconds,
            self.server.port,
            self.server.allowed_origins.join(", "),
            self.session.toast_millis,
            self.session.blur_grace_millis,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig {
                api_base: "https://api.bilibili.com".to_string(),
                backend_url: None,
                timeout_seconds: 10,
                user_agent: DEFAULT_USER_AGENT.to_string(),
                referer_base: "https://www.bilibili.com/video/".to_string(),
                debug_bodies: false,
            },
            server: ServerConfig {
                port: 2323,
                allowed_origins: vec!["http://localhost:2233".to_string()],
            },
            session: SessionConfig {
                toast_millis: 3000,
                blur_grace_millis: 150,
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.config.upstream.api_base = api_base.into();
        self
    }

    pub fn with_backend_url(mut self, backend_url: impl Into<String>) -> Self {
        self.config.upstream.backend_url = Some(backend_url.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.upstream.timeout_seconds = seconds;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.config.server.allowed_origins = origins;
        self
    }

    pub fn with_toast_millis(mut self, millis: u64) -> Self {
        self.config.session.toast_millis = millis;
        self
    }

    pub fn with_blur_grace_millis(mut self, millis: u64) -> Self {
        self.config.session.blur_grace_millis = millis;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
