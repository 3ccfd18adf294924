//! Trade history API gateway
//!
//! Holds the exchange credentials server-side and exposes the account trade
//! list over plain HTTP:
//! - `GET /api/get-binance-trades` signs and forwards the query, returning the
//!   exchange's fill array untouched
//! - `GET /api/v1/trades/report` returns the same fills aggregated
//! - `GET /health` reports liveness and whether credentials are configured

use anyhow::Result;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod proxy;
pub mod server;

pub use config::{CorsConfig, ExchangeConfig, GatewayConfig, ServerConfig};
pub use proxy::{ExchangeTransport, ProxyResponse, ReqwestTransport, TradeFetchProxy, UpstreamResponse};
pub use server::ApiGatewayServer;

/// Start the API Gateway server with credentials from the environment
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or the server fails
pub async fn start_server(config: GatewayConfig) -> Result<()> {
    let proxy = TradeFetchProxy::from_env(&config.exchange)?;
    ApiGatewayServer::new(config, proxy).start().await
}
