//! Fill records as returned by the exchange's account trade list

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::ProxyError;

/// Order side of a fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        })
    }
}

/// One executed trade leg.
///
/// Amounts arrive as decimal strings and are kept as [`Decimal`] so the
/// scale the exchange sent is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    /// Execution time, epoch milliseconds
    pub time: i64,
    pub symbol: String,
    pub side: Side,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub qty: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quote_qty: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub realized_pnl: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub commission: Decimal,
    pub commission_asset: String,
    pub buyer: bool,
    pub maker: bool,
    pub order_id: i64,
    /// Exchange trade id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_asset: Option<String>,
}

/// Interpret an upstream payload as an ordered list of fills.
///
/// # Errors
/// Returns [`ProxyError::ContractViolation`] if the payload is not an array
/// or any element is not a well-formed fill.
pub fn parse_fills(payload: &Value) -> Result<Vec<Fill>, ProxyError> {
    let items = payload.as_array().ok_or_else(|| {
        ProxyError::ContractViolation(format!(
            "expected a JSON array of fills, got {}",
            json_kind(payload)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Fill::deserialize(item).map_err(|e| {
                ProxyError::ContractViolation(format!("fill at index {index} is malformed: {e}"))
            })
        })
        .collect()
}

/// Short name of a JSON value's type, for error messages
#[must_use]
pub const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
