//! Exchange-specific authentication providers

pub mod binance;

use anyhow::Result;
use services_common::TradeQuery;

use binance::SignedRequest;

/// Common trait for exchange authentication
pub trait ExchangeAuth: Send + Sync {
    /// API key sent alongside every signed request
    fn api_key(&self) -> &str;

    /// Build and sign the request for `query` at wall-clock time `now_ms`
    fn sign_query(&self, query: &TradeQuery, now_ms: i64) -> Result<SignedRequest>;
}
