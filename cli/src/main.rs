//! trade-viewer - print account trade history fetched through the proxy

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use reporting::TradeAggregator;
use trade_viewer::{
    FileKeyValueStore, Notification, NotificationKind, ProxyClient, ViewPreferenceStore,
    build_params, render_summary, render_table,
};

#[derive(Parser)]
#[command(name = "trade-viewer")]
#[command(about = "View Binance futures account trades through the signing proxy")]
#[command(version)]
struct Cli {
    /// Symbol, e.g. BTCUSDT; defaults to the last one used
    #[arg(long)]
    symbol: Option<String>,

    /// Maximum number of trades (1-1000); defaults to the last one used
    #[arg(long)]
    limit: Option<String>,

    /// Start time, RFC 3339 or YYYY-MM-DDTHH:MM (UTC)
    #[arg(long)]
    start: Option<String>,

    /// End time, RFC 3339 or YYYY-MM-DDTHH:MM (UTC)
    #[arg(long)]
    end: Option<String>,

    /// Base URL of the proxy
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    proxy_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Print the aggregated report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn notify(notification: &Notification) {
    match notification.kind {
        NotificationKind::Error => eprintln!("{notification}"),
        NotificationKind::Info | NotificationKind::Success => println!("{notification}"),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "trade_viewer=warn".into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut preferences = ViewPreferenceStore::new(FileKeyValueStore::default_location());
    let stored = preferences.load();
    let symbol = cli.symbol.or(stored.symbol).unwrap_or_default();
    let limit = cli.limit.unwrap_or(stored.limit);

    if let Err(e) = preferences.save(&symbol, &limit) {
        warn!("Could not save preferences: {}", e);
    }

    let params = match build_params(Some(&symbol), &limit, cli.start.as_deref(), cli.end.as_deref()) {
        Ok(params) => params,
        Err(e) => {
            notify(&Notification::error(&e));
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = ProxyClient::new(cli.proxy_url, Duration::from_secs(cli.timeout))?;

    notify(&Notification::fetching());
    let fills = match client.fetch_trades(&params).await {
        Ok(fills) => fills,
        Err(e) => {
            notify(&Notification::error(&e));
            return Ok(ExitCode::FAILURE);
        }
    };

    if fills.is_empty() {
        notify(&Notification::no_trades());
        return Ok(ExitCode::SUCCESS);
    }

    let report = TradeAggregator::aggregate(&fills);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_table(&report));
        println!();
        println!("{}", render_summary(&report.summary));
    }
    notify(&Notification::fetched(report.summary.trade_count));

    Ok(ExitCode::SUCCESS)
}
