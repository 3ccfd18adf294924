//! Binance request signing for the account trade list endpoint

use anyhow::{Result, anyhow};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use tracing::debug;

use services_common::{DEFAULT_RECV_WINDOW_MS, TradeQuery};

use super::ExchangeAuth;
use crate::config::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// Current wall-clock time in epoch milliseconds
#[must_use]
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// HMAC-SHA256 of `payload` keyed by `secret`, lowercase hex
///
/// # Errors
/// Returns an error if the HMAC key cannot be initialised
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow!("HMAC key error: {}", e))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// A signed trade history request.
///
/// Holds secret-derived material: it is created per call, dropped once the
/// outbound request completes and its `Debug` output hides the signature.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    canonical_query: String,
    timestamp: i64,
    recv_window: u64,
    signature: String,
}

impl SignedRequest {
    /// The exact parameter string the signature covers
    #[must_use]
    pub fn canonical_query(&self) -> &str {
        &self.canonical_query
    }

    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[must_use]
    pub const fn recv_window(&self) -> u64 {
        self.recv_window
    }

    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Outbound query string: canonical parameters followed by the signature
    #[must_use]
    pub fn query_string(&self) -> String {
        format!("{}&signature={}", self.canonical_query, self.signature)
    }
}

impl fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRequest")
            .field("canonical_query", &self.canonical_query)
            .field("timestamp", &self.timestamp)
            .field("recv_window", &self.recv_window)
            .field("signature", &"<redacted>")
            .finish()
    }
}

/// Builds canonical query strings and signs them.
///
/// The parameter order is fixed: `timestamp`, `recvWindow`, `limit`, then the
/// optional `symbol`, `startTime` and `endTime`. The exchange recomputes the
/// signature over the string it receives, so the order must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSigner {
    recv_window: u64,
}

impl RequestSigner {
    #[must_use]
    pub const fn new(recv_window: u64) -> Self {
        Self { recv_window }
    }

    #[must_use]
    pub const fn recv_window(&self) -> u64 {
        self.recv_window
    }

    /// Canonical parameter string for `query` at time `now_ms`
    #[must_use]
    pub fn canonical_query(&self, query: &TradeQuery, now_ms: i64) -> String {
        let mut params = format!(
            "timestamp={now_ms}&recvWindow={}&limit={}",
            self.recv_window,
            query.limit()
        );
        if let Some(symbol) = query.symbol() {
            params.push_str(&format!("&symbol={}", symbol.to_uppercase()));
        }
        if let Some(start_time) = query.start_time() {
            params.push_str(&format!("&startTime={start_time}"));
        }
        if let Some(end_time) = query.end_time() {
            params.push_str(&format!("&endTime={end_time}"));
        }
        params
    }

    /// Build and sign the request for `query`
    ///
    /// # Errors
    /// Returns an error if HMAC signing fails
    pub fn sign(&self, query: &TradeQuery, secret: &str, now_ms: i64) -> Result<SignedRequest> {
        let canonical_query = self.canonical_query(query, now_ms);
        let signature = hmac_sha256_hex(secret, &canonical_query)?;
        debug!(
            timestamp = now_ms,
            recv_window = self.recv_window,
            "Signed trade history request"
        );

        Ok(SignedRequest {
            canonical_query,
            timestamp: now_ms,
            recv_window: self.recv_window,
            signature,
        })
    }
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new(DEFAULT_RECV_WINDOW_MS)
    }
}

/// Binance authentication handler: credentials plus signer
#[derive(Debug, Clone)]
pub struct BinanceAuth {
    credentials: Credentials,
    signer: RequestSigner,
}

impl BinanceAuth {
    #[must_use]
    pub const fn new(credentials: Credentials, signer: RequestSigner) -> Self {
        Self {
            credentials,
            signer,
        }
    }

    #[must_use]
    pub const fn signer(&self) -> &RequestSigner {
        &self.signer
    }
}

impl ExchangeAuth for BinanceAuth {
    fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    fn sign_query(&self, query: &TradeQuery, now_ms: i64) -> Result<SignedRequest> {
        self.signer
            .sign(query, self.credentials.api_secret(), now_ms)
    }
}
