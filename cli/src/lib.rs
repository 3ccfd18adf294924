//! Terminal viewer for the trade history proxy
//!
//! Fetches fills through the gateway, aggregates them locally and prints a
//! table with a PnL and commission summary. The last symbol and limit are
//! remembered between runs.

pub mod client;
pub mod input;
pub mod preferences;
pub mod render;

pub use client::{ClientError, ProxyClient};
pub use input::build_params;
pub use preferences::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, PreferenceError, ViewPreferenceStore,
    ViewPreferences,
};
pub use render::{Notification, NotificationKind, render_summary, render_table};
