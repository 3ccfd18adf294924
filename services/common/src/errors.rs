//! Common error types for services

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable code for missing credentials
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
/// Stable code for transport failures and unreadable upstream bodies
pub const FUNCTION_ERROR: &str = "FUNCTION_ERROR";
/// Stable code for a success status carrying a payload of the wrong shape
pub const UNEXPECTED_PAYLOAD: &str = "UNEXPECTED_PAYLOAD";
/// Stable code for query parameters that cannot be interpreted
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

const TRANSPORT_MESSAGE: &str = "Internal server error while fetching trades.";
const CONTRACT_MESSAGE: &str = "Received unexpected data format from upstream.";

/// Error code carried in an error body.
///
/// Either one of the stable string codes above or the numeric code the
/// exchange returned (e.g. `-1121` for an invalid symbol).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// Exchange error code or forwarded HTTP status
    Numeric(i64),
    /// Stable code produced by this system
    Text(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(code) => write!(f, "{code}"),
            Self::Text(code) => f.write_str(code),
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        Self::Text(code.to_string())
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        Self::Numeric(code)
    }
}

/// JSON body returned to callers of the proxy on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable message
    pub error: String,
    /// Machine readable code
    pub code: ErrorCode,
    /// Auxiliary detail, never the sole signal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Proxy error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Required credentials are missing from the environment
    #[error("Server configuration error: {0}")]
    Configuration(String),

    /// The exchange answered with a non-success status
    #[error("Upstream rejected request with status {status}: {message}")]
    UpstreamRejection {
        /// HTTP status returned by the exchange
        status: u16,
        /// Exchange message, or a generic one when the body had none
        message: String,
        /// Exchange error code, or the HTTP status when the body had none
        code: ErrorCode,
    },

    /// Network failure or a response body that could not be read as JSON
    #[error("Transport error: {0}")]
    Transport(String),

    /// Success status with a payload that is not a list of fills
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Caller supplied parameters that cannot form a query
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ProxyError {
    /// HTTP status this error is reported with
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Configuration(_) | Self::Transport(_) => 500,
            Self::UpstreamRejection { status, .. } => *status,
            Self::ContractViolation(_) => 502,
            Self::InvalidRequest(_) => 400,
        }
    }

    /// Convert into the JSON error body sent to callers
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        match self {
            Self::Configuration(_) => ErrorBody {
                error: self.to_string(),
                code: CONFIG_ERROR.into(),
                details: None,
            },
            Self::UpstreamRejection { message, code, .. } => ErrorBody {
                error: message.clone(),
                code: code.clone(),
                details: None,
            },
            Self::Transport(message) => ErrorBody {
                error: TRANSPORT_MESSAGE.to_string(),
                code: FUNCTION_ERROR.into(),
                details: Some(message.clone()),
            },
            Self::ContractViolation(message) => ErrorBody {
                error: CONTRACT_MESSAGE.to_string(),
                code: UNEXPECTED_PAYLOAD.into(),
                details: Some(message.clone()),
            },
            Self::InvalidRequest(message) => ErrorBody {
                error: message.clone(),
                code: INVALID_REQUEST.into(),
                details: None,
            },
        }
    }
}
