//! Common constants used across all services
//!
//! Single source of truth for exchange endpoints, limits and preference keys

// Exchange endpoint
/// Binance USD-M futures REST base URL
pub const BINANCE_FUTURES_BASE_URL: &str = "https://fapi.binance.com";
/// Account trade list endpoint
pub const USER_TRADES_PATH: &str = "/fapi/v1/userTrades";
/// Header carrying the API key on signed requests
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

// Signing
/// Tolerance between request timestamp and exchange receipt time
pub const DEFAULT_RECV_WINDOW_MS: u64 = 6000;

// Query limits
pub const DEFAULT_TRADE_LIMIT: u16 = 500;
pub const MIN_TRADE_LIMIT: u16 = 1;
pub const MAX_TRADE_LIMIT: u16 = 1000;

// Credentials
pub const ENV_API_KEY: &str = "BINANCE_API_KEY";
pub const ENV_API_SECRET: &str = "BINANCE_API_SECRET";

// Proxy routes
pub const PROXY_TRADES_PATH: &str = "/api/get-binance-trades";
pub const PROXY_REPORT_PATH: &str = "/api/v1/trades/report";

// Client preferences
pub const PREF_SYMBOL_KEY: &str = "tradeViewerSymbol";
pub const PREF_LIMIT_KEY: &str = "tradeViewerLimit";
/// Limit shown by the client when nothing has been stored yet
pub const CLIENT_DEFAULT_LIMIT: &str = "100";
