//! Trade aggregation: per-fill display rows plus PnL and commission totals

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use services_common::{Fill, Side};

use crate::display::{fixed, fractional_digits, price_decimals, signed_fixed, trimmed};

/// Position direction implied by the order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl From<Side> for Direction {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => Self::Long,
            Side::Sell => Self::Short,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
        })
    }
}

/// Liquidity role of the account in a fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Maker,
    Taker,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Maker => "Maker",
            Self::Taker => "Taker",
        })
    }
}

/// Whether the account was the buyer or the seller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Party {
    Buyer,
    Seller,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buyer => "Buyer",
            Self::Seller => "Seller",
        })
    }
}

/// Sign of a PnL figure; zero counts as positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PnlSign {
    Positive,
    Negative,
}

impl PnlSign {
    #[must_use]
    pub fn of(value: Decimal) -> Self {
        if value.is_sign_negative() && !value.is_zero() {
            Self::Negative
        } else {
            Self::Positive
        }
    }
}

/// A fill with the derived fields the trade table shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedFill {
    #[serde(flatten)]
    pub fill: Fill,
    pub direction: Direction,
    pub role: Role,
    pub party: Party,
    pub pnl_sign: PnlSign,
    /// `None` when `time` is outside the representable range
    pub executed_at: Option<DateTime<Utc>>,
    pub display_price: String,
    pub display_qty: String,
    pub display_quote_qty: String,
    pub display_pnl: String,
    pub display_commission: String,
}

impl AggregatedFill {
    #[must_use]
    pub fn from_fill(fill: &Fill) -> Self {
        Self {
            direction: Direction::from(fill.side),
            role: if fill.maker { Role::Maker } else { Role::Taker },
            party: if fill.buyer { Party::Buyer } else { Party::Seller },
            pnl_sign: PnlSign::of(fill.realized_pnl),
            executed_at: DateTime::from_timestamp_millis(fill.time),
            display_price: fixed(fill.price, price_decimals(&fill.symbol)),
            display_qty: trimmed(fill.qty),
            display_quote_qty: fixed(fill.quote_qty, 2),
            display_pnl: signed_fixed(fill.realized_pnl, 2),
            display_commission: fixed(fill.commission, fractional_digits(fill.commission).max(2)),
            fill: fill.clone(),
        }
    }

    /// Execution time as `YYYY-MM-DD HH:MM:SS UTC`, or the raw millis if out of range
    #[must_use]
    pub fn display_time(&self) -> String {
        self.executed_at.map_or_else(
            || self.fill.time.to_string(),
            |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
    }
}

/// Totals over one list of fills
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub trade_count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_pnl: Decimal,
    /// Commission paid in `dominant_commission_asset` only
    #[serde(with = "rust_decimal::serde::str")]
    pub total_commission: Decimal,
    pub dominant_commission_asset: Option<String>,
    pub mixed_assets_detected: bool,
    /// Fills whose commission was left out of `total_commission`
    pub excluded_commission_fills: usize,
}

impl Summary {
    #[must_use]
    pub fn pnl_sign(&self) -> PnlSign {
        PnlSign::of(self.total_pnl)
    }

    /// Total PnL with two decimals; the `-` follows [`Summary::pnl_sign`]
    #[must_use]
    pub fn display_total_pnl(&self) -> String {
        signed_fixed(self.total_pnl, 2)
    }

    /// Total commission with at least four decimals
    #[must_use]
    pub fn display_total_commission(&self) -> String {
        fixed(
            self.total_commission,
            fractional_digits(self.total_commission).max(4),
        )
    }
}

/// Aggregated view of one fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TradeReport {
    pub fills: Vec<AggregatedFill>,
    pub summary: Summary,
}

impl TradeReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}

/// Commission accumulator pinned to the first asset it sees
#[derive(Debug, Default)]
struct CommissionLedger {
    asset: Option<String>,
    total: Decimal,
    excluded: usize,
}

impl CommissionLedger {
    fn record(&mut self, fill: &Fill) {
        match self.asset.as_deref() {
            Some(asset) if asset == fill.commission_asset => self.total += fill.commission,
            Some(asset) => {
                self.excluded += 1;
                debug!(
                    order_id = fill.order_id,
                    expected = asset,
                    actual = %fill.commission_asset,
                    "Commission excluded from total"
                );
            }
            None => {
                self.total += fill.commission;
                if !fill.commission_asset.is_empty() {
                    self.asset = Some(fill.commission_asset.clone());
                }
            }
        }
    }
}

/// Stateless aggregation of fills into a [`TradeReport`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeAggregator;

impl TradeAggregator {
    /// Aggregate `fills` in the order given.
    ///
    /// Every fill's realized PnL counts toward the total. Commission only
    /// counts for fills paid in the first non-empty commission asset seen;
    /// the rest are tallied in `excluded_commission_fills`.
    #[must_use]
    pub fn aggregate(fills: &[Fill]) -> TradeReport {
        let mut ledger = CommissionLedger::default();
        let mut total_pnl = Decimal::ZERO;

        let rows = fills
            .iter()
            .map(|fill| {
                total_pnl += fill.realized_pnl;
                ledger.record(fill);
                AggregatedFill::from_fill(fill)
            })
            .collect::<Vec<_>>();

        let mixed_assets_detected = ledger.excluded > 0;
        if mixed_assets_detected {
            warn!(
                asset = ledger.asset.as_deref().unwrap_or_default(),
                excluded = ledger.excluded,
                "Multiple commission assets in result; total covers one asset only"
            );
        }

        TradeReport {
            summary: Summary {
                trade_count: rows.len(),
                total_pnl,
                total_commission: ledger.total,
                dominant_commission_asset: ledger.asset,
                mixed_assets_detected,
                excluded_commission_fills: ledger.excluded,
            },
            fills: rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn fill(asset: &str, commission: Decimal) -> Fill {
        Fill {
            time: 0,
            symbol: "BTCUSDT".into(),
            side: Side::Buy,
            price: dec!(1),
            qty: dec!(1),
            quote_qty: dec!(1),
            realized_pnl: dec!(0),
            commission,
            commission_asset: asset.into(),
            buyer: true,
            maker: false,
            order_id: 1,
            id: None,
            position_side: None,
            margin_asset: None,
        }
    }

    #[test]
    fn test_ledger_adopts_first_non_empty_asset() {
        let mut ledger = CommissionLedger::default();
        ledger.record(&fill("", dec!(0.1)));
        assert_eq!(ledger.asset, None);
        ledger.record(&fill("BNB", dec!(0.2)));
        ledger.record(&fill("BNB", dec!(0.3)));
        assert_eq!(ledger.asset.as_deref(), Some("BNB"));
        assert_eq!(ledger.total, dec!(0.6));
        assert_eq!(ledger.excluded, 0);
    }

    #[test]
    fn test_ledger_counts_exclusions() {
        let mut ledger = CommissionLedger::default();
        ledger.record(&fill("USDT", dec!(1)));
        ledger.record(&fill("BNB", dec!(5)));
        ledger.record(&fill("", dec!(7)));
        assert_eq!(ledger.total, dec!(1));
        assert_eq!(ledger.excluded, 2);
    }

    #[test]
    fn test_pnl_sign_zero_is_positive() {
        assert_eq!(PnlSign::of(dec!(0)), PnlSign::Positive);
        assert_eq!(PnlSign::of(dec!(-0.00)), PnlSign::Positive);
        assert_eq!(PnlSign::of(dec!(-0.01)), PnlSign::Negative);
    }

    #[rstest]
    #[case(dec!(-0.001), "-0.00", PnlSign::Negative)]
    #[case(dec!(0), "0.00", PnlSign::Positive)]
    #[case(dec!(0.004), "0.00", PnlSign::Positive)]
    fn test_total_pnl_prefix_follows_sign(
        #[case] total_pnl: Decimal,
        #[case] expected: &str,
        #[case] sign: PnlSign,
    ) {
        let summary = Summary {
            total_pnl,
            ..Summary::default()
        };
        assert_eq!(summary.pnl_sign(), sign);
        assert_eq!(summary.display_total_pnl(), expected);
    }

    #[test]
    fn test_summary_display() {
        let summary = Summary {
            total_pnl: dec!(-3.456),
            total_commission: dec!(0.1),
            ..Summary::default()
        };
        assert_eq!(summary.display_total_pnl(), "-3.46");
        assert_eq!(summary.display_total_commission(), "0.1000");

        let summary = Summary {
            total_pnl: dec!(12),
            total_commission: dec!(0.00001234),
            ..Summary::default()
        };
        assert_eq!(summary.display_total_pnl(), "12.00");
        assert_eq!(summary.display_total_commission(), "0.00001234");
    }
}
