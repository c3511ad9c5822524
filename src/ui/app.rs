use eframe::{Frame, egui};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::analysis::MapGenerator;
use crate::config::{ANALYSIS, PLOT_CONFIG};
use crate::data::timeseries::TimeSeriesCollection;
use crate::models::{LiquidationMap, MapParams};
use crate::ui::ui_plot_view::PlotView;
use crate::ui::utils::setup_custom_visuals;

/// Error types for application operations
#[derive(Debug, Clone)]
pub enum AppError {
    /// No data is available for the operation
    DataNotAvailable,
    /// The selected pair is invalid or not found
    InvalidPair(String),
    /// Liquidation map calculation failed
    CalculationFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DataNotAvailable => write!(f, "No data available"),
            AppError::InvalidPair(pair) => write!(f, "Invalid or missing pair: {}", pair),
            AppError::CalculationFailed(msg) => write!(f, "Calculation failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Which plot layers are drawn. Persisted with the rest of the UI state.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct PlotVisibility {
    pub candles: bool,
    pub long_heat: bool,
    pub short_heat: bool,
    pub price_line: bool,
}

impl Default for PlotVisibility {
    fn default() -> Self {
        Self {
            candles: PLOT_CONFIG.show_candles,
            long_heat: PLOT_CONFIG.show_long_heat,
            short_heat: PLOT_CONFIG.show_short_heat,
            price_line: PLOT_CONFIG.show_price_line,
        }
    }
}

#[derive(Default)]
pub struct DataState {
    pub timeseries_collection: TimeSeriesCollection,
    pub current_map: Option<Arc<LiquidationMap>>,
    pub generator: MapGenerator,
    pub last_error: Option<AppError>,
}

impl DataState {
    pub fn new(timeseries_collection: TimeSeriesCollection, generator: MapGenerator) -> Self {
        Self {
            timeseries_collection,
            current_map: None,
            generator,
            last_error: None,
        }
    }
}

#[derive(Deserialize, Serialize)]
pub struct LiquidityHunterApp {
    // UI state
    #[serde(default = "default_selected_pair")]
    pub(super) selected_pair: Option<String>,
    #[serde(default = "default_swing_window")]
    pub(super) swing_window: usize,
    #[serde(default = "default_enabled_tiers")]
    pub(super) enabled_tiers: Vec<u32>,
    #[serde(default = "default_band_threshold_pct")]
    pub(super) band_threshold_pct: f64,
    #[serde(default)]
    pub(super) plot_visibility: PlotVisibility,

    // Data state - skip serialization since it contains runtime-only data
    #[serde(skip)]
    pub(super) data_state: DataState,
    #[serde(skip)]
    pub(super) plot_view: PlotView,

    // Track the last calculated params to detect real changes
    #[serde(skip)]
    pub(super) last_params: Option<MapParams>,
}

/// Default value for selected pair - used by serde and initialization
fn default_selected_pair() -> Option<String> {
    Some("BTCUSDT".to_string())
}

fn default_swing_window() -> usize {
    ANALYSIS.swing.default_window
}

fn default_enabled_tiers() -> Vec<u32> {
    ANALYSIS.leverage.default_enabled.to_vec()
}

fn default_band_threshold_pct() -> f64 {
    ANALYSIS.band.default_threshold_pct
}

impl LiquidityHunterApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        timeseries_collection: TimeSeriesCollection,
    ) -> Self {
        let mut app: LiquidityHunterApp;

        // Attempt to load the persisted state
        if let Some(storage) = cc.storage {
            if let Some(value) = eframe::get_value(storage, eframe::APP_KEY) {
                #[cfg(debug_assertions)]
                log::info!("Successfully loaded persisted state");
                app = value;
            } else {
                #[cfg(debug_assertions)]
                log::info!("No persisted state found. Creating anew.");
                app = LiquidityHunterApp::new_with_initial_state();
            }
        } else {
            app = LiquidityHunterApp::new_with_initial_state();
        }

        // Initialize the data state with fresh timeseries and generator
        let generator = MapGenerator::default();
        app.data_state = DataState::new(timeseries_collection, generator);

        // Explicitly reinitialize plot_view (it's skipped during serialization)
        app.plot_view = PlotView::new();
        app.last_params = None;

        let available_pairs = app.data_state.timeseries_collection.unique_pair_names();
        if available_pairs.is_empty() {
            app.data_state.last_error = Some(AppError::DataNotAvailable);
            #[cfg(debug_assertions)]
            log::error!("No trading pairs available in timeseries collection");
            return app;
        }

        // Validate that the selected pair exists in current data, or pick the first one
        if let Some(selected_pair) = &app.selected_pair {
            if !available_pairs.contains(selected_pair) {
                #[cfg(debug_assertions)]
                log::info!(
                    "Selected pair '{}' not found, defaulting to first available pair",
                    selected_pair
                );
                app.selected_pair = available_pairs.first().cloned();
            }
        } else {
            // No pair selected, pick the first one
            app.selected_pair = available_pairs.first().cloned();
        }

        // Persisted state may predate validation limits
        app.swing_window = app
            .swing_window
            .clamp(ANALYSIS.swing.min_window, ANALYSIS.swing.max_window);
        if app.enabled_tiers.is_empty() {
            app.enabled_tiers = default_enabled_tiers();
        }

        app
    }

    pub fn new_with_initial_state() -> Self {
        Self {
            selected_pair: default_selected_pair(),
            swing_window: default_swing_window(),
            enabled_tiers: default_enabled_tiers(),
            band_threshold_pct: default_band_threshold_pct(),
            plot_visibility: PlotVisibility::default(),
            data_state: DataState::default(),
            plot_view: PlotView::default(),
            last_params: None,
        }
    }

    /// The analysis parameters implied by the current UI state.
    pub(super) fn current_params(&self) -> MapParams {
        MapParams {
            window: self.swing_window,
            tiers: self
                .enabled_tiers
                .iter()
                .copied()
                .sorted_unstable()
                .dedup()
                .collect(),
            lower_ratio: 1.0 - self.band_threshold_pct,
            upper_ratio: 1.0 + self.band_threshold_pct,
        }
    }

    /// Recompute the liquidation map when the pair or parameters changed.
    /// The generator memoizes per (pair, params), so scrubbing a slider back
    /// to a previous value is effectively free.
    pub(super) fn refresh_map_if_needed(&mut self) {
        let Some(selected_pair) = self.selected_pair.clone() else {
            self.data_state.last_error = Some(AppError::DataNotAvailable);
            return;
        };

        let params = self.current_params();
        let unchanged = self.last_params.as_ref() == Some(&params)
            && self
                .data_state
                .current_map
                .as_ref()
                .map(|m| m.pair_name == selected_pair)
                .unwrap_or(false);
        if unchanged {
            return;
        }

        match self.data_state.generator.get_map(
            &selected_pair,
            &params,
            &self.data_state.timeseries_collection,
        ) {
            Ok(map) => {
                self.data_state.current_map = Some(map);
                self.data_state.last_error = None;
                self.last_params = Some(params);
            }
            Err(e) => {
                self.data_state.current_map = None;
                self.data_state.last_error =
                    Some(AppError::CalculationFailed(format!("{:#}", e)));
                self.last_params = Some(params);
                #[cfg(debug_assertions)]
                log::error!("Liquidation map build failed for {}: {:#}", selected_pair, e);
            }
        }
    }

    pub(super) fn handle_pair_selection(&mut self, new_pair: String) {
        if self.selected_pair.as_ref() == Some(&new_pair) {
            return;
        }
        let available = self.data_state.timeseries_collection.unique_pair_names();
        if !available.contains(&new_pair) {
            self.data_state.last_error = Some(AppError::InvalidPair(new_pair));
            return;
        }
        self.selected_pair = Some(new_pair);
        self.plot_view.clear_cache();
    }
}

impl eframe::App for LiquidityHunterApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);

        self.refresh_map_if_needed();

        self.render_side_panel(ctx);
        self.render_status_panel(ctx);
        self.render_central_panel(ctx);
    }
}
