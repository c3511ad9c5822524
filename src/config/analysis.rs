//! Analysis and computation configuration

/// Configuration for the swing-window UI slider.
pub struct SwingConfig {
    /// Comparison radius: bar i is a swing iff it dominates [i-w, i+w]
    pub default_window: usize,
    pub min_window: usize,
    pub max_window: usize,
}

/// The leverage multiples we simulate positions for.
pub struct LeverageConfig {
    /// Tiers offered in the UI, ascending
    pub tiers: &'static [u32],
    /// Tiers checked by default on first launch
    pub default_enabled: &'static [u32],
}

/// Display-relevance band around the current price.
pub struct DisplayBandConfig {
    // Default band is current price ±15% -> ratios (0.85, 1.15)
    pub default_threshold_pct: f64,
    pub min_threshold_pct: f64,
    pub max_threshold_pct: f64,
}

/// Settings for the heatmap density binning.
pub struct HeatmapConfig {
    /// Number of price buckets across the display band
    pub bucket_count: usize,
    /// Half-width of one zone's band as a fraction of its price
    /// (0.002 -> each zone paints price ±0.2%)
    pub band_half_width_pct: f64,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub swing: SwingConfig,
    pub leverage: LeverageConfig,
    pub band: DisplayBandConfig,
    pub heatmap: HeatmapConfig,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    swing: SwingConfig {
        default_window: 5,
        min_window: 1,
        max_window: 20,
    },
    leverage: LeverageConfig {
        tiers: &[10, 25, 50, 100],
        default_enabled: &[25, 50],
    },
    band: DisplayBandConfig {
        default_threshold_pct: 0.15,
        min_threshold_pct: 0.05,
        max_threshold_pct: 0.30,
    },
    heatmap: HeatmapConfig {
        bucket_count: 400,
        band_half_width_pct: 0.002,
    },
};
