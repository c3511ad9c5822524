//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    // Candlestick colors
    pub bull_candle_color: Color32,
    pub bear_candle_color: Color32,
    /// Candle body width as a fraction of one bar slot
    pub candle_body_width: f64,
    pub candle_wick_width: f32,

    // Heatmap layers
    /// Gradient for long-liquidation density (cold -> hot), below price
    pub long_gradient_colors: &'static [&'static str],
    /// Gradient for short-liquidation density (cold -> hot), above price
    pub short_gradient_colors: &'static [&'static str],
    /// Peak opacity of a fully-stacked heat bucket (0.0 = invisible)
    pub heat_max_opacity: f32,

    // Current price marker (inner line over a dashed outer stroke)
    pub current_price_color: Color32,
    pub current_price_outer_color: Color32,
    pub current_price_line_width: f32,
    pub current_price_outer_width: f32,

    // Layer defaults: `false` layers start hidden (can be toggled in the panel)
    pub show_candles: bool,
    pub show_long_heat: bool,
    pub show_short_heat: bool,
    pub show_price_line: bool,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    bull_candle_color: Color32::from_rgb(0, 200, 120),
    bear_candle_color: Color32::from_rgb(220, 60, 60),
    candle_body_width: 0.7,
    candle_wick_width: 1.0,

    // Long liquidations pool below swing lows (green family)
    long_gradient_colors: &[
        "#0b3d1e", // Deep forest
        "#1d7a3c", // Mid green
        "#37d069", // Bright green
    ],
    // Short liquidations pool above swing highs (red family)
    short_gradient_colors: &[
        "#3d0b0b", // Deep maroon
        "#8b1d1d", // Firebrick
        "#ff4545", // Bright red
    ],
    heat_max_opacity: 0.85,

    current_price_color: Color32::from_rgb(255, 215, 0), // Gold
    current_price_outer_color: Color32::from_rgb(255, 0, 0), // Red border
    current_price_line_width: 2.0,
    current_price_outer_width: 4.0,

    show_candles: true,
    show_long_heat: true,
    show_short_heat: true,
    show_price_line: true,
};
