//! Configuration module for the liquidation heatmap application.

pub mod analysis;
pub mod binance;
pub mod persistence;
pub mod plot;

// Re-export commonly used items
pub use analysis::ANALYSIS;
pub use binance::BINANCE;
pub use persistence::{APP_STATE_PATH, KLINE_PATH, KLINE_VERSION, kline_cache_filename};
pub use plot::PLOT_CONFIG;
