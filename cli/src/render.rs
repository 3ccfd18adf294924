//! Terminal rendering: status notifications, trade table and summary

use std::fmt;
use std::time::Duration;

use reporting::{AggregatedFill, Summary, TradeReport};

/// How long a success notification stays relevant
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(5);

const COLUMNS: [&str; 11] = [
    "Time",
    "Symbol",
    "Side",
    "Price",
    "Qty",
    "Quote Qty",
    "Realized PnL",
    "Commission",
    "Asset",
    "Role",
    "Order ID",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A status line for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Display duration for transient notifications; `None` stays until replaced
    pub duration: Option<Duration>,
}

impl Notification {
    fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: None,
        }
    }

    #[must_use]
    pub fn fetching() -> Self {
        Self::new(NotificationKind::Info, "Fetching trades securely...")
    }

    #[must_use]
    pub fn fetched(count: usize) -> Self {
        Self {
            duration: Some(SUCCESS_DISPLAY),
            ..Self::new(
                NotificationKind::Success,
                format!("Successfully fetched {count} trades."),
            )
        }
    }

    #[must_use]
    pub fn no_trades() -> Self {
        Self::new(NotificationKind::Success, "No trades found for the given criteria.")
    }

    #[must_use]
    pub fn error(err: &dyn fmt::Display) -> Self {
        Self::new(NotificationKind::Error, format!("Error: {err}"))
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.duration.is_some()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn row_cells(row: &AggregatedFill) -> [String; 11] {
    let fill = &row.fill;
    [
        row.display_time(),
        fill.symbol.clone(),
        fill.side.to_string(),
        row.display_price.clone(),
        row.display_qty.clone(),
        row.display_quote_qty.clone(),
        row.display_pnl.clone(),
        row.display_commission.clone(),
        fill.commission_asset.clone(),
        format!("{}/{}", row.party, row.role),
        fill.order_id.to_string(),
    ]
}

fn format_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Fixed-width table of the report's fills, header first
#[must_use]
pub fn render_table(report: &TradeReport) -> String {
    let rows: Vec<[String; 11]> = report.fills.iter().map(row_cells).collect();

    let mut widths = COLUMNS.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![format_line(&COLUMNS, &widths)];
    let rules = widths.map(|w| "-".repeat(w));
    lines.push(format_line(&rules, &widths));
    for cells in &rows {
        lines.push(format_line(cells, &widths));
    }
    lines.join("\n")
}

/// Summary block: count, totals and commission asset
#[must_use]
pub fn render_summary(summary: &Summary) -> String {
    let mut lines = vec![
        format!("Total trades:     {}", summary.trade_count),
        format!("Total PnL:        {}", summary.display_total_pnl()),
        format!(
            "Total commission: {} {}",
            summary.display_total_commission(),
            summary.dominant_commission_asset.as_deref().unwrap_or_default()
        )
        .trim_end()
        .to_string(),
    ];
    if summary.mixed_assets_detected {
        lines.push(format!(
            "Note: {} fill(s) paid commission in another asset and are not in the total.",
            summary.excluded_commission_fills
        ));
    }
    lines.join("\n")
}
