// Swing detection, liquidation projection, and zone aggregation.
// Everything in here is a pure transform: series -> swings -> zones -> heatmap.
pub mod extrema;
pub mod heatmap;
pub mod map_generator;
pub mod projection;
pub mod zones;

use std::fmt;

// Re-export commonly used items
pub use extrema::detect_swing_points;
pub use heatmap::HeatmapDensity;
pub use map_generator::MapGenerator;
pub use projection::project_liquidation;
pub use zones::{aggregate_zones, filter_near_current};

/// Error type for the analysis pipeline.
///
/// Insufficient data (short series, empty series, nothing left after
/// filtering) is deliberately NOT an error: every stage returns an empty
/// collection instead so the UI can show a "no data" state.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A caller-supplied parameter violates a precondition. Never silently
    /// corrected.
    InvalidInput(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
