//! Trade history query types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TRADE_LIMIT, MAX_TRADE_LIMIT, MIN_TRADE_LIMIT};
use crate::errors::ProxyError;

/// Filter for one trade history request.
///
/// Built fresh per request and never mutated afterwards. The symbol is
/// stored trimmed and uppercased; the limit always lies in `1..=1000`.
/// Deserialization goes through [`TradeParams`] so the same rules apply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "TradeParams")]
pub struct TradeQuery {
    symbol: Option<String>,
    start_time: Option<i64>,
    end_time: Option<i64>,
    limit: u16,
}

impl TradeQuery {
    /// Create a query with the given limit, clamped into the accepted range
    #[must_use]
    pub fn new(limit: u16) -> Self {
        Self {
            symbol: None,
            start_time: None,
            end_time: None,
            limit: limit.clamp(MIN_TRADE_LIMIT, MAX_TRADE_LIMIT),
        }
    }

    /// Restrict to one instrument. Blank symbols leave the query unrestricted.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl AsRef<str>) -> Self {
        let symbol = symbol.as_ref().trim();
        self.symbol = (!symbol.is_empty()).then(|| symbol.to_uppercase());
        self
    }

    /// Inclusive lower bound, epoch milliseconds
    #[must_use]
    pub const fn with_start_time(mut self, start_time: i64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Inclusive upper bound, epoch milliseconds
    #[must_use]
    pub const fn with_end_time(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    #[must_use]
    pub const fn start_time(&self) -> Option<i64> {
        self.start_time
    }

    #[must_use]
    pub const fn end_time(&self) -> Option<i64> {
        self.end_time
    }

    #[must_use]
    pub const fn limit(&self) -> u16 {
        self.limit
    }

    /// Interpret raw endpoint parameters.
    ///
    /// # Errors
    /// Returns [`ProxyError::InvalidRequest`] when `limit`, `startTime` or
    /// `endTime` is present but not an integer, or when the symbol holds
    /// anything other than letters, digits and `_`.
    pub fn from_params(params: &TradeParams) -> Result<Self, ProxyError> {
        let limit = match non_blank(params.limit.as_deref()) {
            Some(raw) => parse_limit(raw)?,
            None => DEFAULT_TRADE_LIMIT,
        };

        let mut query = Self::new(limit);
        if let Some(symbol) = non_blank(params.symbol.as_deref()) {
            query = query.with_symbol(validate_symbol(symbol)?);
        }
        if let Some(raw) = non_blank(params.start_time.as_deref()) {
            query = query.with_start_time(parse_millis("startTime", raw)?);
        }
        if let Some(raw) = non_blank(params.end_time.as_deref()) {
            query = query.with_end_time(parse_millis("endTime", raw)?);
        }
        Ok(query)
    }
}

impl TryFrom<TradeParams> for TradeQuery {
    type Error = ProxyError;

    fn try_from(params: TradeParams) -> Result<Self, Self::Error> {
        Self::from_params(&params)
    }
}

impl Default for TradeQuery {
    fn default() -> Self {
        Self::new(DEFAULT_TRADE_LIMIT)
    }
}

/// Raw query parameters of the proxy endpoint, as strings.
///
/// Field order matches the order the client sends them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl From<&TradeQuery> for TradeParams {
    fn from(query: &TradeQuery) -> Self {
        Self {
            limit: Some(query.limit().to_string()),
            symbol: query.symbol().map(str::to_string),
            start_time: query.start_time().map(|t| t.to_string()),
            end_time: query.end_time().map(|t| t.to_string()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_symbol(raw: &str) -> Result<&str, ProxyError> {
    if raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(raw)
    } else {
        Err(ProxyError::InvalidRequest(format!(
            "symbol may only contain letters, digits and '_', got '{raw}'"
        )))
    }
}

fn parse_limit(raw: &str) -> Result<u16, ProxyError> {
    let parsed: i64 = raw
        .parse()
        .map_err(|_| ProxyError::InvalidRequest(format!("limit must be an integer, got '{raw}'")))?;
    let clamped = parsed.clamp(i64::from(MIN_TRADE_LIMIT), i64::from(MAX_TRADE_LIMIT));
    u16::try_from(clamped)
        .map_err(|_| ProxyError::InvalidRequest(format!("limit out of range: {parsed}")))
}

fn parse_millis(name: &str, raw: &str) -> Result<i64, ProxyError> {
    raw.parse().map_err(|_| {
        ProxyError::InvalidRequest(format!(
            "{name} must be epoch milliseconds, got '{raw}'"
        ))
    })
}
