use colorgrad::Gradient;
use std::hash::{Hash, Hasher};

use eframe::egui::{self, Color32};
use egui_plot::{AxisHints, Corner, HPlacement, Legend, Plot};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::zone::Side;
use crate::models::{LiquidationMap, OhlcvTimeSeries};
use crate::ui::config::UI_TEXT;
use crate::utils::maths_utils;
use crate::utils::time_utils::epoch_ms_to_utc;

// Import the Layer System
use crate::ui::app::PlotVisibility;
use crate::ui::plot_layers::{
    CandlestickLayer, HeatmapLayer, LayerContext, PlotLayer, PriceLineLayer,
};

/// One horizontal heat band, already colored for its stack height.
#[derive(Clone)]
pub struct HeatBar {
    pub price_bottom: f64,
    pub price_top: f64,
    pub color: Color32,
}

#[derive(Clone)]
pub struct PlotCache {
    pub map_hash: u64,
    pub long_bars: Vec<HeatBar>,
    pub short_bars: Vec<HeatBar>,
    pub y_min: f64,
    pub y_max: f64,
    pub x_min: f64,
    pub x_max: f64,
}

#[derive(Default)]
pub struct PlotView {
    cache: Option<PlotCache>,
}

impl PlotView {
    pub fn new() -> Self {
        Self { cache: None }
    }

    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    pub fn show_map(
        &mut self,
        ui: &mut egui::Ui,
        series: &OhlcvTimeSeries,
        map: &LiquidationMap,
        visibility: &PlotVisibility,
    ) {
        let cache = self.calculate_plot_data(series, map);
        let pair_name = map.pair_name.clone();
        let (y_min, y_max) = (cache.y_min, cache.y_max);
        let (x_min, x_max) = (cache.x_min, cache.x_max);

        let legend = Legend::default().position(Corner::RightTop);

        Plot::new("liquidation_plot")
            .legend(legend)
            .custom_x_axes(vec![create_x_axis(series)])
            .custom_y_axes(vec![create_y_axis(&pair_name)])
            .label_formatter(|_, _| String::new())
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds_y(y_min..=y_max);
                plot_ui.set_plot_bounds_x(x_min..=x_max);

                // --- LAYER RENDERING SYSTEM ---

                // 1. Create Context
                let ctx = LayerContext {
                    series,
                    map,
                    cache: &cache,
                    visibility,
                    x_min,
                    x_max,
                };

                // 2. Define Layer Stack (Back to Front)
                let layers: Vec<Box<dyn PlotLayer>> = vec![
                    Box::new(HeatmapLayer { side: Side::Long }),
                    Box::new(HeatmapLayer { side: Side::Short }),
                    Box::new(CandlestickLayer),
                    Box::new(PriceLineLayer),
                ];

                // 3. Render Loop
                for layer in layers {
                    layer.render(plot_ui, &ctx);
                }
            });
    }

    fn calculate_plot_data(&mut self, series: &OhlcvTimeSeries, map: &LiquidationMap) -> PlotCache {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        map.pair_name.hash(&mut hasher);
        series.klines().hash(&mut hasher);
        map.filtered_zones.len().hash(&mut hasher);
        if let Some((band_low, band_high)) = map.band {
            band_low.to_bits().hash(&mut hasher);
            band_high.to_bits().hash(&mut hasher);
        }
        let current_hash = hasher.finish();

        if let Some(cache) = &self.cache {
            if cache.map_hash == current_hash {
                return cache.clone();
            }
        }

        let (long_bars, short_bars) = match &map.density {
            Some(density) => (
                side_heat_bars(density, Side::Long, PLOT_CONFIG.long_gradient_colors),
                side_heat_bars(density, Side::Short, PLOT_CONFIG.short_gradient_colors),
            ),
            None => (Vec::new(), Vec::new()),
        };

        // Y covers both the candles and the display band
        let (mut y_min, mut y_max) = series.price_extent().unwrap_or((0.0, 1.0));
        if let Some((band_low, band_high)) = map.band {
            y_min = y_min.min(band_low);
            y_max = y_max.max(band_high);
        }

        let cache = PlotCache {
            map_hash: current_hash,
            long_bars,
            short_bars,
            y_min,
            y_max,
            x_min: -1.0,
            x_max: series.klines() as f64,
        };

        self.cache = Some(cache.clone());
        cache
    }
}

/// Map one side's stacks to colored bars. Stack height drives both the
/// gradient position and the opacity, so overlapping zones read hotter.
fn side_heat_bars(
    density: &crate::analysis::HeatmapDensity,
    side: Side,
    gradient_colors: &[&str],
) -> Vec<HeatBar> {
    let stacks = density.side_stacks(side);
    let normalized = maths_utils::normalize_max(stacks);

    let grad = colorgrad::GradientBuilder::new()
        .html_colors(gradient_colors)
        .build::<colorgrad::CatmullRomGradient>()
        .expect("Failed to create color gradient");

    normalized
        .iter()
        .enumerate()
        .filter(|&(_, &heat)| heat > 0.0)
        .map(|(index, &heat)| {
            let (price_bottom, price_top) = density.price_range.chunk_bounds(index);
            let color = to_egui_color(grad.at(heat as f32))
                .linear_multiply(PLOT_CONFIG.heat_max_opacity * heat as f32);
            HeatBar {
                price_bottom,
                price_top,
                color,
            }
        })
        .collect()
}

fn to_egui_color(colorgrad_color: colorgrad::Color) -> Color32 {
    let rgba8 = colorgrad_color.to_rgba8();
    Color32::from_rgba_unmultiplied(rgba8[0], rgba8[1], rgba8[2], 255)
}

fn create_x_axis(series: &OhlcvTimeSeries) -> AxisHints<'static> {
    let first_timestamp_ms = series.first_kline_timestamp_ms;
    let interval_ms = series.pair_interval.interval_ms;
    AxisHints::new_x()
        .label(UI_TEXT.plot_x_axis)
        .formatter(move |grid_mark, _range| {
            let index = grid_mark.value.round() as i64;
            if index < 0 {
                return String::new();
            }
            let timestamp_ms = first_timestamp_ms + index * interval_ms;
            epoch_ms_to_utc(timestamp_ms)
        })
}

fn create_y_axis(pair_name: &str) -> AxisHints<'static> {
    let label = format!("{}  {}", pair_name, UI_TEXT.plot_y_axis);
    AxisHints::new_y()
        .label(label)
        .formatter(|grid_mark, _range| format!("${:.2}", grid_mark.value))
        .placement(HPlacement::Left)
}
