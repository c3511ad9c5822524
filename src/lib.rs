#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use data::{TimeSeriesCollection, fetch_pair_data, write_timeseries_data_async};
pub use domain::{Candle, LiquidationZone, PairInterval, Side, SwingPoint};
pub use models::{LiquidationMap, MapParams, OhlcvTimeSeries};
pub use ui::LiquidityHunterApp;

use crate::utils::TimeUtils;

// CLI argument parsing
use clap::{Parser, ValueEnum};

/// Kline interval the analysis runs on.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    /// 1-hour klines
    H1,
    /// 4-hour klines
    H4,
    /// Daily klines
    D1,
}

impl Timeframe {
    pub fn interval_ms(&self) -> i64 {
        match self {
            Timeframe::H1 => TimeUtils::MS_IN_H,
            Timeframe::H4 => TimeUtils::MS_IN_4_H,
            Timeframe::D1 => TimeUtils::MS_IN_D,
        }
    }
}

/// How far back to fetch klines.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// One month of history
    M1,
    /// Three months of history
    M3,
    /// Six months of history
    M6,
}

impl Period {
    pub fn lookback_ms(&self) -> i64 {
        match self {
            Period::M1 => TimeUtils::MS_IN_30_D,
            Period::M3 => TimeUtils::MS_IN_30_D * 3,
            Period::M6 => TimeUtils::MS_IN_30_D * 6,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Comma-separated Binance spot pairs to analyse
    #[arg(long, value_delimiter = ',', default_value = "BTCUSDT,ETHUSDT,SOLUSDT")]
    pub pairs: Vec<String>,

    /// Kline interval
    #[arg(long, value_enum, default_value_t = Timeframe::H1)]
    pub timeframe: Timeframe,

    /// History window to fetch
    #[arg(long, value_enum, default_value_t = Period::M3)]
    pub period: Period,

    /// Use API as primary source instead of the local cache
    #[arg(long, default_value_t = false)]
    pub prefer_api: bool,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    timeseries_data: TimeSeriesCollection,
) -> Box<dyn eframe::App> {
    let app = ui::LiquidityHunterApp::new(cc, timeseries_data);
    Box::new(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_interval_mapping() {
        assert_eq!(Timeframe::H1.interval_ms(), 3_600_000);
        assert_eq!(Timeframe::H4.interval_ms(), 14_400_000);
        assert_eq!(Timeframe::D1.interval_ms(), 86_400_000);
    }

    #[test]
    fn test_period_lookback_is_multiples_of_30_days() {
        assert_eq!(Period::M3.lookback_ms(), Period::M1.lookback_ms() * 3);
        assert_eq!(Period::M6.lookback_ms(), Period::M1.lookback_ms() * 6);
    }
}
