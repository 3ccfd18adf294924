//! Signed proxy for the exchange's account trade list
//!
//! One inbound request produces at most one outbound call. The API secret
//! never leaves this process: callers only ever see the exchange's response
//! or an [`ErrorBody`](services_common::ErrorBody).

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

use auth_service::{BinanceAuth, Credentials, ExchangeAuth, RequestSigner, current_timestamp_ms};
use reporting::{TradeAggregator, TradeReport};
use services_common::{
    API_KEY_HEADER, Fill, ProxyError, TradeParams, TradeQuery, json_kind, parse_fills,
};

use crate::config::ExchangeConfig;

/// Status and raw body text of an upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

/// Outbound HTTP seam between the proxy and the exchange
#[async_trait]
pub trait ExchangeTransport: Send + Sync {
    /// Issue one GET to `url` with the API key header set
    ///
    /// # Errors
    /// Returns [`ProxyError::Transport`] if no response could be obtained
    async fn get(&self, url: &str, api_key: &str) -> Result<UpstreamResponse, ProxyError>;
}

/// `reqwest` backed transport with a pooled client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ExchangeTransport for ReqwestTransport {
    async fn get(&self, url: &str, api_key: &str) -> Result<UpstreamResponse, ProxyError> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| ProxyError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProxyError::Transport(e.without_url().to_string()))?;

        Ok(UpstreamResponse { status, body })
    }
}

/// Platform-neutral response of [`TradeFetchProxy::handle`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

impl ProxyResponse {
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    #[must_use]
    pub fn from_error(err: &ProxyError) -> Self {
        Self {
            status: err.status(),
            body: serde_json::to_value(err.to_body()).unwrap_or(Value::Null),
        }
    }
}

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Signs trade history queries and forwards them to the exchange
#[derive(Clone)]
pub struct TradeFetchProxy {
    auth: Option<Arc<dyn ExchangeAuth>>,
    transport: Arc<dyn ExchangeTransport>,
    trades_url: String,
    clock: Clock,
}

impl fmt::Debug for TradeFetchProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TradeFetchProxy")
            .field("credentials_configured", &self.auth.is_some())
            .field("trades_url", &self.trades_url)
            .finish_non_exhaustive()
    }
}

impl TradeFetchProxy {
    /// Create a proxy. Without `auth` every fetch fails with a configuration error.
    #[must_use]
    pub fn new(
        config: &ExchangeConfig,
        auth: Option<Arc<dyn ExchangeAuth>>,
        transport: Arc<dyn ExchangeTransport>,
    ) -> Self {
        Self {
            auth,
            transport,
            trades_url: config.trades_url(),
            clock: Arc::new(current_timestamp_ms),
        }
    }

    /// Build a proxy from process environment credentials and a `reqwest` transport
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built. Missing credentials
    /// are not an error here; they surface on each fetch instead.
    pub fn from_env(config: &ExchangeConfig) -> Result<Self> {
        let auth = match Credentials::from_env() {
            Ok(credentials) => Some(Arc::new(BinanceAuth::new(
                credentials,
                RequestSigner::new(config.recv_window_ms),
            )) as Arc<dyn ExchangeAuth>),
            Err(e) => {
                warn!("Starting without exchange credentials: {}", e);
                None
            }
        };
        let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_seconds))?;
        Ok(Self::new(config, auth, Arc::new(transport)))
    }

    /// Replace the wall clock used for request timestamps
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    #[must_use]
    pub const fn credentials_configured(&self) -> bool {
        self.auth.is_some()
    }

    /// Fetch the raw fill array exactly as the exchange returned it
    ///
    /// # Errors
    /// See [`ProxyError`] for the failure classes
    pub async fn fetch_raw(&self, query: &TradeQuery) -> Result<Value, ProxyError> {
        let Some(auth) = self.auth.as_deref() else {
            error!("API credentials not configured in environment");
            return Err(ProxyError::Configuration("API credentials missing.".to_string()));
        };

        let signed = auth
            .sign_query(query, (self.clock)())
            .map_err(|e| ProxyError::Transport(e.to_string()))?;
        let url = format!("{}?{}", self.trades_url, signed.query_string());

        info!(
            symbol = query.symbol().unwrap_or("*"),
            limit = query.limit(),
            start_time = ?query.start_time(),
            end_time = ?query.end_time(),
            "Fetching account trades"
        );

        let response = self.transport.get(&url, auth.api_key()).await.map_err(|e| {
            error!("Error contacting exchange: {}", e);
            e
        })?;

        let data: Value = serde_json::from_str(&response.body).map_err(|e| {
            error!(status = response.status, "Exchange response is not JSON: {}", e);
            ProxyError::Transport(format!("invalid JSON in exchange response: {e}"))
        })?;

        if !(200..300).contains(&response.status) {
            let rejection = upstream_rejection(response.status, &data);
            error!(status = response.status, "Exchange API error: {}", data);
            return Err(rejection);
        }

        if !data.is_array() {
            warn!(kind = json_kind(&data), "Exchange returned a non-array payload");
            return Err(ProxyError::ContractViolation(format!(
                "expected a JSON array of fills, got {}",
                json_kind(&data)
            )));
        }

        debug!(
            count = data.as_array().map_or(0, Vec::len),
            "Fetched account trades"
        );
        Ok(data)
    }

    /// Fetch and parse fills
    ///
    /// # Errors
    /// As [`Self::fetch_raw`], plus [`ProxyError::ContractViolation`] for a malformed fill
    pub async fn fetch_trades(&self, query: &TradeQuery) -> Result<Vec<Fill>, ProxyError> {
        let data = self.fetch_raw(query).await?;
        parse_fills(&data)
    }

    /// Fetch fills and aggregate them into a report
    ///
    /// # Errors
    /// As [`Self::fetch_trades`]
    pub async fn report(&self, query: &TradeQuery) -> Result<TradeReport, ProxyError> {
        let fills = self.fetch_trades(query).await?;
        Ok(TradeAggregator::aggregate(&fills))
    }

    /// Serve one proxy request: raw parameters in, status and JSON body out
    pub async fn handle(&self, params: &TradeParams) -> ProxyResponse {
        let result = match TradeQuery::from_params(params) {
            Ok(query) => self.fetch_raw(&query).await,
            Err(e) => {
                warn!("Rejected trade query: {}", e);
                Err(e)
            }
        };

        match result {
            Ok(data) => ProxyResponse::ok(data),
            Err(e) => ProxyResponse::from_error(&e),
        }
    }
}

fn upstream_rejection(status: u16, data: &Value) -> ProxyError {
    let message = data
        .get("msg")
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
        .map_or_else(
            || {
                let reason = StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or_default();
                format!("Binance API Error: {reason}")
            },
            str::to_string,
        );
    let code = data
        .get("code")
        .and_then(Value::as_i64)
        .filter(|code| *code != 0)
        .unwrap_or_else(|| i64::from(status));

    ProxyError::UpstreamRejection {
        status,
        message,
        code: code.into(),
    }
}
