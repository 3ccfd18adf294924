//! Shared fixtures for gateway tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;
use wiremock::MockServer;

use api_gateway::{ExchangeConfig, ExchangeTransport, ReqwestTransport, TradeFetchProxy, UpstreamResponse};
use auth_service::{BinanceAuth, Credentials, ExchangeAuth, RequestSigner};
use services_common::{ProxyError, TradeQuery};

pub const API_KEY: &str = "test-api-key";
pub const API_SECRET: &str = "test-api-secret";
pub const NOW: i64 = 1_700_000_000_000;

pub fn exchange_config(server: &MockServer) -> ExchangeConfig {
    ExchangeConfig {
        base_url: server.uri(),
        request_timeout_seconds: 5,
        ..ExchangeConfig::default()
    }
}

pub fn test_auth() -> Arc<dyn ExchangeAuth> {
    Arc::new(BinanceAuth::new(
        Credentials::new(API_KEY, API_SECRET),
        RequestSigner::default(),
    ))
}

/// Proxy signing with the test credentials at a fixed time
pub fn proxy_for(server: &MockServer) -> TradeFetchProxy {
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    TradeFetchProxy::new(&exchange_config(server), Some(test_auth()), Arc::new(transport))
        .with_clock(|| NOW)
}

/// Signature the proxy is expected to send for `query`
pub fn expected_signature(query: &TradeQuery) -> String {
    RequestSigner::default()
        .sign(query, API_SECRET, NOW)
        .unwrap()
        .signature()
        .to_string()
}

pub fn sample_fills() -> Value {
    json!([
        {
            "buyer": true,
            "commission": "0.0012",
            "commissionAsset": "USDT",
            "id": 1001,
            "maker": true,
            "orderId": 5001,
            "price": "27000.456",
            "qty": "0.010",
            "quoteQty": "270.00456",
            "realizedPnl": "10.5",
            "side": "BUY",
            "positionSide": "BOTH",
            "symbol": "BTCUSDT",
            "time": 1_699_999_990_000_i64
        },
        {
            "buyer": false,
            "commission": "0.00002",
            "commissionAsset": "BNB",
            "id": 1002,
            "maker": false,
            "orderId": 5002,
            "price": "27100",
            "qty": "0.005",
            "quoteQty": "135.5",
            "realizedPnl": "-1.25",
            "side": "SELL",
            "positionSide": "BOTH",
            "symbol": "BTCUSDT",
            "time": 1_699_999_995_000_i64
        }
    ])
}

/// Transport that records calls and never touches the network
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: AtomicUsize,
}

impl RecordingTransport {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeTransport for RecordingTransport {
    async fn get(&self, _url: &str, _api_key: &str) -> Result<UpstreamResponse, ProxyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(UpstreamResponse {
            status: 200,
            body: "[]".to_string(),
        })
    }
}
