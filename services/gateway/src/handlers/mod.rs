//! API handlers for the gateway's endpoints

pub mod health;
pub mod trades;

pub use health::HealthHandlers;
pub use trades::TradeHandlers;
