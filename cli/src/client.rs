//! HTTP client for the trade history proxy

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use services_common::{Fill, PROXY_TRADES_PATH, TradeParams, parse_fills};

/// Errors shown to the viewer's user
#[derive(Debug, Error)]
pub enum ClientError {
    /// The proxy answered with an error status
    #[error("{message}{}", code_suffix(.code))]
    Rejected {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// Success status but the body is not a list of fills
    #[error("Received unexpected data format from server.")]
    UnexpectedFormat,

    /// The proxy could not be reached or its body could not be read
    #[error("{0}")]
    Http(String),

    /// Flag values that cannot form a query
    #[error("{0}")]
    InvalidInput(String),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref()
        .map(|code| format!(" (Code: {code})"))
        .unwrap_or_default()
}

/// Client for the proxy's trade list endpoint
#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: String,
    http: reqwest::Client,
}

impl ProxyClient {
    /// # Errors
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Fetch fills for `params`, in the order the exchange returned them
    ///
    /// # Errors
    /// See [`ClientError`]
    pub async fn fetch_trades(&self, params: &TradeParams) -> Result<Vec<Fill>, ClientError> {
        let url = format!("{}{}", self.base_url, PROXY_TRADES_PATH);
        debug!(url = %url, "Requesting trades from proxy");

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let status = response.status();
        let data: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        if !status.is_success() {
            let rejection = rejection(status.as_u16(), &data);
            error!("Error fetching trades: {}", rejection);
            return Err(rejection);
        }

        if !data.is_array() {
            return Err(ClientError::UnexpectedFormat);
        }
        parse_fills(&data).map_err(|e| {
            error!("Malformed fill from proxy: {}", e);
            ClientError::UnexpectedFormat
        })
    }
}

fn rejection(status: u16, data: &Value) -> ClientError {
    let message = data
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map_or_else(
            || format!("Request failed with status: {status}"),
            str::to_string,
        );
    let code = data.get("code").and_then(|code| match code {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_i64() != Some(0) => Some(n.to_string()),
        _ => None,
    });

    ClientError::Rejected {
        status,
        message,
        code,
    }
}
