//! Shared data model and error taxonomy for the trade history services

pub mod constants;
pub mod errors;
pub mod query;
pub mod trade;

pub use constants::*;
pub use errors::*;
pub use query::{TradeParams, TradeQuery};
pub use trade::{Fill, Side, json_kind, parse_fills};
