//! Response models for the gateway's own endpoints

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// `healthy`, or `degraded` when credentials are missing
    pub status: String,
    /// Whether exchange credentials were found at startup
    pub credentials_configured: bool,
    /// Service version
    pub version: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
}
