//! Trade history handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

use services_common::{ProxyError, TradeParams, TradeQuery};

use crate::proxy::{ProxyResponse, TradeFetchProxy};

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

/// Trade history handlers
#[derive(Debug, Clone)]
pub struct TradeHandlers {
    proxy: Arc<TradeFetchProxy>,
}

impl TradeHandlers {
    pub const fn new(proxy: Arc<TradeFetchProxy>) -> Self {
        Self { proxy }
    }

    /// Raw fill array, passed through from the exchange
    pub async fn get_trades(
        State(handlers): State<Self>,
        Query(params): Query<TradeParams>,
    ) -> ProxyResponse {
        info!("Trade history request");
        handlers.proxy.handle(&params).await
    }

    /// Aggregated report over the same query
    pub async fn get_report(
        State(handlers): State<Self>,
        Query(params): Query<TradeParams>,
    ) -> Response {
        info!("Trade report request");
        let result = match TradeQuery::from_params(&params) {
            Ok(query) => handlers.proxy.report(&query).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(report) => {
                info!(
                    trades = report.summary.trade_count,
                    mixed_assets = report.summary.mixed_assets_detected,
                    "Trade report built"
                );
                Json(report).into_response()
            }
            Err(e) => {
                warn!("Trade report failed: {}", e);
                error_response(&e)
            }
        }
    }
}

fn error_response(err: &ProxyError) -> Response {
    ProxyResponse::from_error(err).into_response()
}
