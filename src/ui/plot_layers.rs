use eframe::egui::Stroke;
use egui_plot::{HLine, Line, PlotPoints, PlotUi, Polygon};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::candle::CandleType;
use crate::domain::zone::Side;
use crate::models::{LiquidationMap, OhlcvTimeSeries};
use crate::ui::app::PlotVisibility;
use crate::ui::config::UI_TEXT;
use crate::ui::ui_plot_view::PlotCache;

/// Context passed to every layer during rendering.
/// This prevents argument explosion.
pub struct LayerContext<'a> {
    pub series: &'a OhlcvTimeSeries,
    pub map: &'a LiquidationMap,
    pub cache: &'a PlotCache,
    pub visibility: &'a PlotVisibility,
    pub x_min: f64,
    pub x_max: f64,
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. HEATMAP LAYER (one instance per side)
// ============================================================================
pub struct HeatmapLayer {
    pub side: Side,
}

impl PlotLayer for HeatmapLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let visible = match self.side {
            Side::Long => ctx.visibility.long_heat,
            Side::Short => ctx.visibility.short_heat,
        };
        if !visible {
            return;
        }

        // Name passed here enables Legend grouping
        let legend_label = self.side.to_string();

        let bars = match self.side {
            Side::Long => &ctx.cache.long_bars,
            Side::Short => &ctx.cache.short_bars,
        };

        for bar in bars {
            let points = PlotPoints::new(vec![
                [ctx.x_min, bar.price_bottom],
                [ctx.x_max, bar.price_bottom],
                [ctx.x_max, bar.price_top],
                [ctx.x_min, bar.price_top],
            ]);

            let polygon = Polygon::new(&legend_label, points)
                .fill_color(bar.color)
                .stroke(Stroke::NONE); // Critical for visual coherence

            plot_ui.polygon(polygon);
        }
    }
}

// ============================================================================
// 2. CANDLESTICK LAYER
// ============================================================================
pub struct CandlestickLayer;

impl PlotLayer for CandlestickLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if !ctx.visibility.candles {
            return;
        }

        let half_body = PLOT_CONFIG.candle_body_width / 2.0;

        for index in 0..ctx.series.klines() {
            let candle = ctx.series.get_candle(index);
            let x = index as f64;

            let (label, color) = match candle.get_type() {
                CandleType::Bullish => ("Bullish", PLOT_CONFIG.bull_candle_color),
                CandleType::Bearish => ("Bearish", PLOT_CONFIG.bear_candle_color),
            };

            // Wick first, so the body draws over it
            let wick = Line::new(
                label,
                PlotPoints::new(vec![[x, candle.low_price], [x, candle.high_price]]),
            )
            .color(color)
            .width(PLOT_CONFIG.candle_wick_width);
            plot_ui.line(wick);

            let (body_bottom, body_top) = candle.body_range();
            let body = Polygon::new(
                label,
                PlotPoints::new(vec![
                    [x - half_body, body_bottom],
                    [x + half_body, body_bottom],
                    [x + half_body, body_top],
                    [x - half_body, body_top],
                ]),
            )
            .fill_color(color)
            .stroke(Stroke::new(1.0, color));
            plot_ui.polygon(body);
        }
    }
}

// ============================================================================
// 3. PRICE LINE LAYER
// ============================================================================
pub struct PriceLineLayer;

impl PlotLayer for PriceLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if !ctx.visibility.price_line {
            return;
        }

        if let Some(price) = ctx.map.current_price {
            let label = UI_TEXT.label_current_price;

            // Outer Line (Border)
            plot_ui.hline(
                HLine::new(label, price)
                    .color(PLOT_CONFIG.current_price_outer_color)
                    .width(PLOT_CONFIG.current_price_outer_width)
                    .style(egui_plot::LineStyle::dashed_loose()),
            );

            // Inner Line (Color)
            plot_ui.hline(
                HLine::new(label, price)
                    .color(PLOT_CONFIG.current_price_color)
                    .width(PLOT_CONFIG.current_price_line_width),
            );
        }
    }
}
