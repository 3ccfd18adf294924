//! Command-line input to proxy query parameters

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use services_common::TradeParams;

use crate::client::ClientError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse a time as epoch milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`; times without
/// an offset are taken as UTC.
///
/// # Errors
/// Returns [`ClientError::InvalidInput`] for any other format
pub fn parse_time_ms(raw: &str) -> Result<i64, ClientError> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.timestamp_millis());
    }
    for format in NAIVE_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(at.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc().timestamp_millis())
        .ok_or_else(|| ClientError::InvalidInput(format!("unrecognised date/time '{raw}'")))
}

/// Build the proxy parameters for one fetch.
///
/// The symbol is trimmed and uppercased; a blank symbol means all symbols.
/// The limit is passed through as typed and validated by the proxy.
///
/// # Errors
/// Returns [`ClientError::InvalidInput`] if a start or end time cannot be parsed
pub fn build_params(
    symbol: Option<&str>,
    limit: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<TradeParams, ClientError> {
    let symbol = symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty());
    let time = |raw: Option<&str>| -> Result<Option<String>, ClientError> {
        raw.filter(|r| !r.trim().is_empty())
            .map(|r| parse_time_ms(r).map(|ms| ms.to_string()))
            .transpose()
    };

    Ok(TradeParams {
        limit: Some(limit.trim().to_string()),
        symbol,
        start_time: time(start)?,
        end_time: time(end)?,
    })
}
