use eframe::egui::{CentralPanel, Color32, Context, Frame, RichText, SidePanel, TopBottomPanel};

use crate::domain::swing::SwingKind;
use crate::domain::zone::Side;
use crate::models::find_matching_ohlcv;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::ui_panels::{ControlsEventChanged, ControlsPanel, Panel, ViewEventChanged, ViewPanel};
use crate::ui::utils::format_price;

use super::app::LiquidityHunterApp;

impl LiquidityHunterApp {
    pub(super) fn render_side_panel(&mut self, ctx: &Context) {
        let side_panel_frame = Frame::new().fill(UI_CONFIG.colors.side_panel);
        SidePanel::left("left_panel")
            .min_width(180.0)
            .frame(side_panel_frame)
            .show(ctx, |ui| {
                let mut controls = ControlsPanel::new(
                    self.selected_pair.clone(),
                    self.data_state.timeseries_collection.unique_pair_names(),
                    self.swing_window,
                    self.enabled_tiers.clone(),
                    self.band_threshold_pct,
                );
                let control_events = controls.render(ui);

                let mut view = ViewPanel::new(
                    self.plot_visibility.candles,
                    self.plot_visibility.long_heat,
                    self.plot_visibility.short_heat,
                    self.plot_visibility.price_line,
                );
                let view_events = view.render(ui);

                for event in control_events {
                    match event {
                        ControlsEventChanged::Pair(new_pair) => {
                            self.handle_pair_selection(new_pair);
                        }
                        ControlsEventChanged::SwingWindow(window) => {
                            self.swing_window = window;
                        }
                        ControlsEventChanged::TierToggled(tier, enabled) => {
                            if enabled {
                                if !self.enabled_tiers.contains(&tier) {
                                    self.enabled_tiers.push(tier);
                                }
                            } else {
                                self.enabled_tiers.retain(|&t| t != tier);
                            }
                        }
                        ControlsEventChanged::BandThreshold(threshold) => {
                            self.band_threshold_pct = threshold;
                        }
                    }
                }

                for event in view_events {
                    match event {
                        ViewEventChanged::Candles(on) => self.plot_visibility.candles = on,
                        ViewEventChanged::LongHeat(on) => self.plot_visibility.long_heat = on,
                        ViewEventChanged::ShortHeat(on) => self.plot_visibility.short_heat = on,
                        ViewEventChanged::PriceLine(on) => self.plot_visibility.price_line = on,
                    }
                }
            });
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let central_panel_frame = Frame::new().fill(UI_CONFIG.colors.central_panel);
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                ui.add_space(10.0);

                let map = self.data_state.current_map.clone();
                let series = map.as_ref().and_then(|m| {
                    find_matching_ohlcv(
                        &self.data_state.timeseries_collection.series_data,
                        &m.pair_name,
                    )
                    .ok()
                });

                if let (Some(map), Some(series)) = (map.as_ref(), series) {
                    self.plot_view
                        .show_map(ui, series, map, &self.plot_visibility);
                } else if let Some(error) = &self.data_state.last_error {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.heading("⚠ Unable to Generate Results");
                        ui.add_space(10.0);
                        ui.label(
                            RichText::new(format!("Error: {}", error))
                                .color(UI_CONFIG.colors.error),
                        );
                        ui.add_space(20.0);
                        ui.label("Please check your pair selection and try again.");
                    });
                } else {
                    let pair_name = self.selected_pair.clone();
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.spinner();
                        ui.add_space(12.0);
                        if let Some(pair) = pair_name {
                            ui.heading(format!("Preparing analysis for {}...", pair));
                        } else {
                            ui.heading("Preparing analysis...");
                        }
                        ui.add_space(6.0);
                        ui.label(
                            RichText::new("Rebuilding liquidation zones with the latest settings")
                                .color(Color32::from_gray(190)),
                        );
                    });
                }
            });
    }

    pub(super) fn render_status_panel(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let Some(map) = self.data_state.current_map.as_ref() else {
                    if let Some(error) = &self.data_state.last_error {
                        ui.label(
                            RichText::new(error.to_string()).color(UI_CONFIG.colors.error),
                        );
                    }
                    return;
                };

                ui.label(RichText::new(&map.pair_name).strong());
                ui.separator();

                if let Some(price) = map.current_price {
                    ui.label(format!(
                        "{}: {}",
                        UI_TEXT.status_price_label,
                        format_price(price)
                    ));
                    ui.separator();
                }

                ui.label(format!(
                    "{}: {} highs / {} lows",
                    UI_TEXT.status_swings_label,
                    map.swing_count(SwingKind::High),
                    map.swing_count(SwingKind::Low),
                ));
                ui.separator();

                if map.is_empty() {
                    ui.label(
                        RichText::new(UI_TEXT.no_zones_in_band).color(Color32::GRAY),
                    );
                } else {
                    ui.label(format!(
                        "{}: {} long / {} short",
                        UI_TEXT.status_zones_label,
                        map.filtered_count(Side::Long),
                        map.filtered_count(Side::Short),
                    ));
                }
            });
        });
    }
}
