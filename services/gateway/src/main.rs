//! api-gateway binary

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api_gateway::{GatewayConfig, server::print_routes, start_server};

const DEFAULT_LOG_FILTER: &str = "api_gateway=info,tower_http=debug";

#[derive(Parser, Debug)]
#[command(
    name = "api-gateway",
    version,
    about = "Signed proxy for the Binance futures account trade list"
)]
struct Args {
    /// Configuration file; a missing file falls back to defaults and env overrides
    #[arg(short, long, value_name = "FILE", default_value = "gateway.toml")]
    config: String,

    /// Print the served routes and exit
    #[arg(long)]
    routes: bool,
}

fn load_config(path: &str) -> GatewayConfig {
    GatewayConfig::from_file(path).unwrap_or_else(|e| {
        warn!(path, error = %e, "Unreadable gateway config, using defaults");
        GatewayConfig::default()
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if args.routes {
        print_routes();
        return Ok(());
    }

    let config = load_config(&args.config);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.server_address(),
        upstream = %config.exchange.trades_url(),
        recv_window_ms = config.exchange.recv_window_ms,
        timeout_s = config.exchange.request_timeout_seconds,
        cors = config.cors.enabled,
        "Starting trade gateway"
    );

    if let Err(e) = start_server(config).await {
        error!(error = %e, "Gateway stopped");
        std::process::exit(1);
    }
    Ok(())
}
