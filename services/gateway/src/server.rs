//! API Gateway server implementation

use anyhow::Result;
use axum::{
    Router,
    extract::{Query, State},
    middleware,
    response::{Json, Response},
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration, time::Instant};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use services_common::{PROXY_REPORT_PATH, PROXY_TRADES_PATH, TradeParams};

use crate::{
    config::GatewayConfig,
    handlers::{HealthHandlers, TradeHandlers},
    middleware::{create_cors_layer, logging_middleware},
    models::HealthCheckResponse,
    proxy::{ProxyResponse, TradeFetchProxy},
};

/// Health endpoint path
pub const HEALTH_PATH: &str = "/health";

/// Unified application state containing all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub trade_handlers: TradeHandlers,
    pub health_handlers: HealthHandlers,
}

/// API Gateway server
#[derive(Debug)]
pub struct ApiGatewayServer {
    config: GatewayConfig,
    proxy: Arc<TradeFetchProxy>,
    start_time: Instant,
}

impl ApiGatewayServer {
    /// Create a server around an already configured proxy
    #[must_use]
    pub fn new(config: GatewayConfig, proxy: TradeFetchProxy) -> Self {
        info!(
            credentials_configured = proxy.credentials_configured(),
            "Initializing API Gateway server"
        );
        Self {
            config,
            proxy: Arc::new(proxy),
            start_time: Instant::now(),
        }
    }

    /// Start the server
    ///
    /// # Errors
    /// Returns an error if the address is invalid, cannot be bound, or serving fails
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = match self.config.server_address().parse() {
            Ok(addr) => addr,
            Err(e) => {
                error!(
                    "Invalid server address '{}': {}",
                    self.config.server_address(),
                    e
                );
                return Err(anyhow::anyhow!("Invalid server address: {}", e));
            }
        };

        let app = self.router();
        info!("Starting API Gateway server on {}", addr);

        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind TCP listener to {}: {}", addr, e);
                return Err(anyhow::anyhow!("Failed to bind to address {}: {}", addr, e));
            }
        };

        if let Err(e) = axum::serve(listener, app).await {
            error!("Server encountered a fatal error: {}", e);
            return Err(anyhow::anyhow!("Server error: {}", e));
        }

        Ok(())
    }

    /// Build the Axum application with all routes and middleware
    pub fn router(&self) -> Router {
        let app_state = AppState {
            trade_handlers: TradeHandlers::new(Arc::clone(&self.proxy)),
            health_handlers: HealthHandlers::new(
                self.proxy.credentials_configured(),
                self.start_time,
            ),
        };

        let mut app = Router::new()
            .route(HEALTH_PATH, get(health_check))
            .route(PROXY_TRADES_PATH, get(get_trades))
            .route(PROXY_REPORT_PATH, get(get_report))
            .with_state(app_state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.server.timeout_seconds,
            )))
            .layer(middleware::from_fn(logging_middleware))
            .layer(TraceLayer::new_for_http());

        if self.config.cors.enabled {
            app = app.layer(create_cors_layer(&self.config.cors));
        }

        info!("API Gateway routes configured successfully");
        app
    }
}

// Handler wrapper functions to work with unified state
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    HealthHandlers::health_check(State(state.health_handlers)).await
}

async fn get_trades(
    State(state): State<AppState>,
    params: Query<TradeParams>,
) -> ProxyResponse {
    TradeHandlers::get_trades(State(state.trade_handlers), params).await
}

async fn get_report(State(state): State<AppState>, params: Query<TradeParams>) -> Response {
    TradeHandlers::get_report(State(state.trade_handlers), params).await
}

/// Print available routes
pub fn print_routes() {
    println!("Available API Routes:");
    println!("=====================");
    println!();
    println!("Health:");
    println!("  GET  {HEALTH_PATH}");
    println!();
    println!("Trades:");
    println!("  GET  {PROXY_TRADES_PATH}?symbol=&startTime=&endTime=&limit=");
    println!("  GET  {PROXY_REPORT_PATH}?symbol=&startTime=&endTime=&limit=");
}
