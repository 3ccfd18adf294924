//! Health check handler

use axum::{extract::State, response::Json};
use std::time::Instant;
use tracing::info;

use crate::models::HealthCheckResponse;

/// Health check handlers
#[derive(Debug, Clone)]
pub struct HealthHandlers {
    credentials_configured: bool,
    start_time: Instant,
}

impl HealthHandlers {
    pub const fn new(credentials_configured: bool, start_time: Instant) -> Self {
        Self {
            credentials_configured,
            start_time,
        }
    }

    /// Liveness plus whether the proxy can sign requests
    pub async fn health_check(State(handlers): State<Self>) -> Json<HealthCheckResponse> {
        info!("Health check request");

        let status = if handlers.credentials_configured {
            "healthy"
        } else {
            "degraded"
        };

        Json(HealthCheckResponse {
            status: status.to_string(),
            credentials_configured: handlers.credentials_configured,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: handlers.start_time.elapsed().as_secs(),
        })
    }
}
