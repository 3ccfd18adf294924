//! Trade reporting
//!
//! Turns an ordered list of exchange fills into display-ready rows and a
//! summary of realized PnL and commission.
//!
//! The aggregation is pure: the same fills always produce the same report,
//! and every call recomputes the summary from scratch.

pub mod aggregator;
pub mod display;

pub use aggregator::{
    AggregatedFill, Direction, Party, PnlSign, Role, Summary, TradeAggregator, TradeReport,
};
pub use display::{fixed, fractional_digits, price_decimals, signed_fixed, trimmed};
