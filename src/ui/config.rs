use eframe::egui::Color32;

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub error: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,     // This sets every label globally to this color
        heading: Color32::YELLOW, // Sets every heading
        subsection_heading: Color32::ORANGE, // Sets every subsection heading
        central_panel: Color32::from_rgb(18, 18, 24),
        side_panel: Color32::from_rgb(25, 25, 25),
        error: Color32::from_rgb(255, 100, 100),
    },
};

/// All user-facing strings in one place
pub struct UiText {
    pub controls_heading: &'static str,
    pub pair_selector_heading: &'static str,
    pub swing_window_heading: &'static str,
    pub swing_window_helper_prefix: &'static str,
    pub swing_window_helper_suffix: &'static str,
    pub leverage_heading: &'static str,
    pub leverage_suffix: &'static str,
    pub band_heading: &'static str,
    pub band_helper_prefix: &'static str,
    pub band_helper_suffix: &'static str,

    pub view_options_heading: &'static str,
    pub toggle_candles: &'static str,
    pub toggle_long_heat: &'static str,
    pub toggle_short_heat: &'static str,
    pub toggle_price_line: &'static str,

    pub status_price_label: &'static str,
    pub status_swings_label: &'static str,
    pub status_zones_label: &'static str,
    pub no_zones_in_band: &'static str,

    pub plot_x_axis: &'static str,
    pub plot_y_axis: &'static str,
    pub label_current_price: &'static str,
}

pub static UI_TEXT: UiText = UiText {
    controls_heading: "Analysis",
    pair_selector_heading: "Trading Pair",
    swing_window_heading: "Swing Window",
    swing_window_helper_prefix: "Bars each side that a swing must dominate: ",
    swing_window_helper_suffix: "",
    leverage_heading: "Leverage Tiers",
    leverage_suffix: "x",
    band_heading: "Display Band",
    band_helper_prefix: "Show zones within ±",
    band_helper_suffix: "% of the current price",

    view_options_heading: "View Options",
    toggle_candles: "Candlesticks",
    toggle_long_heat: "Long Liquidations",
    toggle_short_heat: "Short Liquidations",
    toggle_price_line: "Current Price",

    status_price_label: "Price",
    status_swings_label: "Swings",
    status_zones_label: "Zones in band",
    no_zones_in_band: "No liquidation zones inside the display band",

    plot_x_axis: "Time",
    plot_y_axis: "Price",
    label_current_price: "Current Price",
};
