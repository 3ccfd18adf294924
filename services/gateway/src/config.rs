//! Configuration for the API Gateway

use anyhow::Result;
use serde::{Deserialize, Serialize};

use services_common::{BINANCE_FUTURES_BASE_URL, DEFAULT_RECV_WINDOW_MS, USER_TRADES_PATH};

/// API Gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Upstream exchange configuration
    pub exchange: ExchangeConfig,
    /// CORS configuration
    pub cors: CorsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Exchange endpoint and signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// REST base URL, without trailing slash
    pub base_url: String,
    /// Account trade list path
    pub trades_path: String,
    /// Signed request validity window in milliseconds
    pub recv_window_ms: u64,
    /// Outbound request timeout in seconds
    pub request_timeout_seconds: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins, `*` for any
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Allow credentials; ignored when any origin is allowed
    pub allow_credentials: bool,
    /// Max age for preflight requests
    pub max_age_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            timeout_seconds: 60,
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: BINANCE_FUTURES_BASE_URL.to_string(),
            trades_path: USER_TRADES_PATH.to_string(),
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string()],
            allow_credentials: false,
            max_age_seconds: 86400, // 24 hours
        }
    }
}

impl ExchangeConfig {
    /// Full URL of the trade list endpoint, without query string
    #[must_use]
    pub fn trades_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.trades_path)
    }
}

impl GatewayConfig {
    /// Load configuration from file, with `GATEWAY__SECTION__KEY` environment overrides
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or a value has the wrong type
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("GATEWAY").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Get server address
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
