//! Request logging and CORS

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::CorsConfig;

/// Request logging middleware. Query strings are not logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = forwarded_client(request.headers()).unwrap_or("-").to_string();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        status = %status,
        duration_ms = duration.as_millis(),
        client = %client,
        "Request processed"
    );

    response
}

/// CORS layer factory
#[must_use]
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let any_origin = config.allowed_origins.iter().any(|origin| origin == "*");

    let mut cors = CorsLayer::new().max_age(Duration::from_secs(config.max_age_seconds));

    if any_origin {
        if config.allow_credentials {
            warn!("CORS credentials cannot be combined with a wildcard origin; ignoring allow_credentials");
        }
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        cors = cors
            .allow_origin(origins)
            .allow_credentials(config.allow_credentials);
    }

    let methods: Result<Vec<Method>, _> = config
        .allowed_methods
        .iter()
        .map(|method| method.parse())
        .collect();
    match methods {
        Ok(methods) => cors = cors.allow_methods(methods),
        Err(e) => warn!("Ignoring invalid CORS method list: {}", e),
    }

    let headers: Result<Vec<HeaderName>, _> = config
        .allowed_headers
        .iter()
        .map(|header| header.parse())
        .collect();
    match headers {
        Ok(headers) => cors = cors.allow_headers(headers),
        Err(e) => warn!("Ignoring invalid CORS header list: {}", e),
    }

    cors
}

/// Originating client as reported by a fronting proxy, if any
fn forwarded_client(headers: &HeaderMap) -> Option<&str> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|list| list.split(',').next());
    forwarded
        .or_else(|| headers.get("x-real-ip").and_then(|value| value.to_str().ok()))
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
}
