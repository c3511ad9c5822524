// Domain models for the liquidation estimator
// These modules contain pure business logic independent of UI/visualization

pub mod liquidation_map;
pub mod timeseries;

// Re-export key types for convenience
pub use liquidation_map::{LiquidationMap, MapParams};
pub use timeseries::{OhlcvTimeSeries, find_matching_ohlcv};
