//! Request authentication for the exchange's signed endpoints
//!
//! Builds the canonical query string of a trade history request, signs it
//! with HMAC-SHA256 and holds the API credentials it is signed with.

pub mod config;
pub mod providers;

pub use config::Credentials;
pub use providers::ExchangeAuth;
pub use providers::binance::{BinanceAuth, RequestSigner, SignedRequest, current_timestamp_ms};
