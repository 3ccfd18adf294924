//! Trade fetch proxy against a mocked exchange

mod common;

use pretty_assertions::assert_eq;
use rstest::*;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use api_gateway::{ExchangeConfig, ReqwestTransport, TradeFetchProxy};
use services_common::{ErrorCode, ProxyError, TradeParams, TradeQuery};

use common::*;

fn params(pairs: &[(&str, &str)]) -> TradeParams {
    let mut params = TradeParams::default();
    for (key, value) in pairs {
        let value = Some((*value).to_string());
        match *key {
            "limit" => params.limit = value,
            "symbol" => params.symbol = value,
            "startTime" => params.start_time = value,
            "endTime" => params.end_time = value,
            other => panic!("unknown parameter {other}"),
        }
    }
    params
}

#[tokio::test]
async fn test_signed_request_reaches_exchange() {
    let server = MockServer::start().await;
    let query = TradeQuery::new(10).with_symbol("btcusdt");

    Mock::given(method("GET"))
        .and(path("/fapi/v1/userTrades"))
        .and(header("X-MBX-APIKEY", API_KEY))
        .and(query_param("timestamp", NOW.to_string()))
        .and(query_param("recvWindow", "6000"))
        .and(query_param("limit", "10"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("signature", expected_signature(&query)))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_fills()))
        .expect(1)
        .mount(&server)
        .await;

    let response = proxy_for(&server)
        .handle(&params(&[("symbol", "btcusdt"), ("limit", "10")]))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body, sample_fills());
}

#[tokio::test]
async fn test_outbound_query_keeps_canonical_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let query = TradeQuery::new(50)
        .with_end_time(1_700_000_100_000)
        .with_start_time(1_699_000_000_000)
        .with_symbol("ethusdt");
    proxy_for(&server).fetch_raw(&query).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let expected = format!(
        "timestamp={NOW}&recvWindow=6000&limit=50&symbol=ETHUSDT&startTime=1699000000000&endTime=1700000100000&signature={}",
        expected_signature(&query)
    );
    assert_eq!(requests[0].url.query(), Some(expected.as_str()));
}

#[tokio::test]
async fn test_default_limit_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let response = proxy_for(&server).handle(&TradeParams::default()).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_missing_credentials_never_call_exchange() {
    let transport = Arc::new(RecordingTransport::default());
    let proxy = TradeFetchProxy::new(&ExchangeConfig::default(), None, transport.clone());

    for _ in 0..3 {
        let response = proxy.handle(&TradeParams::default()).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.body["code"], json!("CONFIG_ERROR"));
        assert_eq!(
            response.body["error"],
            json!("Server configuration error: API credentials missing.")
        );
    }
    let err = proxy.fetch_trades(&TradeQuery::default()).await.unwrap_err();
    assert!(matches!(err, ProxyError::Configuration(_)));
    assert_eq!(transport.calls(), 0);
}

#[rstest]
#[case("btcusdt&limit=1")]
#[case("BTCUSDT#frag")]
#[tokio::test]
async fn test_symbol_with_query_characters_never_signed(#[case] symbol: &str) {
    let transport = Arc::new(RecordingTransport::default());
    let proxy = TradeFetchProxy::new(&ExchangeConfig::default(), Some(test_auth()), transport.clone());

    let response = proxy.handle(&params(&[("symbol", symbol)])).await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body["code"], json!("INVALID_REQUEST"));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_exchange_rejection_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = proxy_for(&server).handle(&params(&[("symbol", "NOPE")])).await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"error": "Invalid symbol.", "code": -1121}));
}

#[rstest]
#[case(401, "Binance API Error: Unauthorized")]
#[case(418, "Binance API Error: I'm a teapot")]
#[case(503, "Binance API Error: Service Unavailable")]
#[tokio::test]
async fn test_rejection_without_message_uses_status(#[case] status: u16, #[case] expected: &str) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = proxy_for(&server)
        .fetch_raw(&TradeQuery::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ProxyError::UpstreamRejection {
            status,
            message: expected.to_string(),
            code: ErrorCode::Numeric(i64::from(status)),
        }
    );
}

#[rstest]
#[case(200)]
#[case(502)]
#[tokio::test]
async fn test_unparseable_body_is_function_error(#[case] status: u16) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let response = proxy_for(&server).handle(&TradeParams::default()).await;
    assert_eq!(response.status, 500);
    assert_eq!(response.body["code"], json!("FUNCTION_ERROR"));
    assert_eq!(
        response.body["error"],
        json!("Internal server error while fetching trades.")
    );
    assert!(response.body["details"].is_string());
}

#[tokio::test]
async fn test_unreachable_exchange_is_function_error() {
    let config = ExchangeConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..ExchangeConfig::default()
    };
    let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
    let proxy = TradeFetchProxy::new(&config, Some(test_auth()), Arc::new(transport));

    let response = proxy.handle(&TradeParams::default()).await;
    assert_eq!(response.status, 500);
    assert_eq!(response.body["code"], json!("FUNCTION_ERROR"));
    let details = response.body["details"].as_str().unwrap();
    assert!(!details.contains("signature="));
}

#[tokio::test]
async fn test_non_array_payload_is_contract_violation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
        .mount(&server)
        .await;

    let response = proxy_for(&server).handle(&TradeParams::default()).await;
    assert_eq!(response.status, 502);
    assert_eq!(response.body["code"], json!("UNEXPECTED_PAYLOAD"));
}

#[tokio::test]
async fn test_invalid_limit_rejected_before_fetch() {
    let transport = Arc::new(RecordingTransport::default());
    let proxy = TradeFetchProxy::new(&ExchangeConfig::default(), Some(test_auth()), transport.clone());

    let response = proxy.handle(&params(&[("limit", "lots")])).await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body["code"], json!("INVALID_REQUEST"));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_report_aggregates_fetched_fills() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_fills()))
        .mount(&server)
        .await;

    let report = proxy_for(&server).report(&TradeQuery::default()).await.unwrap();
    assert_eq!(report.summary.trade_count, 2);
    assert_eq!(report.summary.total_pnl, dec!(9.25));
    assert_eq!(report.summary.total_commission, dec!(0.0012));
    assert!(report.summary.mixed_assets_detected);
    assert_eq!(report.fills[0].display_price, "27000.46");
}

#[tokio::test]
async fn test_malformed_fill_is_contract_violation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"symbol": "BTCUSDT"}])))
        .mount(&server)
        .await;

    let proxy = proxy_for(&server);
    assert!(proxy.fetch_raw(&TradeQuery::default()).await.is_ok());
    let err = proxy.fetch_trades(&TradeQuery::default()).await.unwrap_err();
    assert!(matches!(err, ProxyError::ContractViolation(_)));
}
