use eframe::egui::{Color32, RichText, ScrollArea, Slider, Ui};
use strum::IntoEnumIterator;

use crate::config::ANALYSIS;
use crate::domain::zone::Side;
use crate::ui::config::UI_TEXT;
use crate::ui::utils::{colored_subsection_heading, section_heading, spaced_separator};

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

/// Panel for the analysis controls (pair, swing window, tiers, band)
pub struct ControlsPanel {
    selected_pair: Option<String>,
    available_pairs: Vec<String>,
    swing_window: usize,
    enabled_tiers: Vec<u32>,
    band_threshold_pct: f64,
}

#[derive(Debug)]
pub enum ControlsEventChanged {
    Pair(String),
    SwingWindow(usize),
    TierToggled(u32, bool),
    BandThreshold(f64),
}

impl ControlsPanel {
    pub fn new(
        selected_pair: Option<String>,
        available_pairs: Vec<String>,
        swing_window: usize,
        enabled_tiers: Vec<u32>,
        band_threshold_pct: f64,
    ) -> Self {
        Self {
            selected_pair,
            available_pairs,
            swing_window,
            enabled_tiers,
            band_threshold_pct,
        }
    }

    fn render_pair_selector(&mut self, ui: &mut Ui) -> Option<String> {
        let mut changed = None;
        let previously_selected_pair = self.selected_pair.clone();

        ui.label(colored_subsection_heading(UI_TEXT.pair_selector_heading));
        ScrollArea::vertical()
            .max_height(160.)
            .id_salt("pair_selector")
            .show(ui, |ui| {
                for item in &self.available_pairs {
                    let is_selected = self.selected_pair.as_ref() == Some(item);
                    if ui.selectable_label(is_selected, item).clicked() {
                        self.selected_pair = Some(item.clone());
                        changed = Some(item.clone());
                    }
                }
            });

        // Defensive check: catch changes even if .clicked() didn't fire
        if self.selected_pair != previously_selected_pair {
            changed = self.selected_pair.clone();
        }

        changed
    }

    fn render_swing_window_slider(&mut self, ui: &mut Ui) -> Option<usize> {
        let mut changed = None;

        ui.add_space(5.0);
        ui.label(colored_subsection_heading(UI_TEXT.swing_window_heading));

        let mut window = self.swing_window as f64;
        let response = ui.add(
            Slider::new(
                &mut window,
                ANALYSIS.swing.min_window as f64..=ANALYSIS.swing.max_window as f64,
            )
            .integer()
            .suffix(" bars"),
        );

        let new_value = window.round() as usize;
        self.swing_window = new_value;

        if response.changed() {
            changed = Some(new_value);
        }

        let helper_text = format!(
            "{}{}{}",
            UI_TEXT.swing_window_helper_prefix, new_value, UI_TEXT.swing_window_helper_suffix
        );
        ui.label(RichText::new(helper_text).small().color(Color32::GRAY));

        changed
    }

    fn render_tier_checkboxes(&mut self, ui: &mut Ui) -> Vec<(u32, bool)> {
        let mut toggled = Vec::new();

        ui.add_space(5.0);
        ui.label(colored_subsection_heading(UI_TEXT.leverage_heading));

        ui.horizontal(|ui| {
            for &tier in ANALYSIS.leverage.tiers {
                let mut enabled = self.enabled_tiers.contains(&tier);
                let label = format!("{}{}", tier, UI_TEXT.leverage_suffix);
                if ui.checkbox(&mut enabled, label).changed() {
                    if enabled {
                        self.enabled_tiers.push(tier);
                    } else {
                        self.enabled_tiers.retain(|&t| t != tier);
                    }
                    toggled.push((tier, enabled));
                }
            }
        });

        toggled
    }

    fn render_band_slider(&mut self, ui: &mut Ui) -> Option<f64> {
        let mut changed = None;

        ui.add_space(5.0);
        ui.label(colored_subsection_heading(UI_TEXT.band_heading));

        let mut threshold_pct = self.band_threshold_pct * 100.0;
        let response = ui.add(
            Slider::new(
                &mut threshold_pct,
                ANALYSIS.band.min_threshold_pct * 100.0..=ANALYSIS.band.max_threshold_pct * 100.0,
            )
            .step_by(1.0)
            .suffix("%"),
        );

        if response.changed() {
            changed = Some(threshold_pct / 100.0);
        }

        let helper_text = format!(
            "{}{}{}",
            UI_TEXT.band_helper_prefix,
            threshold_pct.round(),
            UI_TEXT.band_helper_suffix
        );
        ui.label(RichText::new(helper_text).small().color(Color32::GRAY));

        changed
    }
}

impl Panel for ControlsPanel {
    type Event = ControlsEventChanged;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.controls_heading);

        if let Some(window) = self.render_swing_window_slider(ui) {
            events.push(ControlsEventChanged::SwingWindow(window));
        }
        spaced_separator(ui);

        for (tier, enabled) in self.render_tier_checkboxes(ui) {
            events.push(ControlsEventChanged::TierToggled(tier, enabled));
        }
        spaced_separator(ui);

        if let Some(threshold) = self.render_band_slider(ui) {
            events.push(ControlsEventChanged::BandThreshold(threshold));
        }
        spaced_separator(ui);

        if let Some(pair) = self.render_pair_selector(ui) {
            events.push(ControlsEventChanged::Pair(pair));
        }
        ui.add_space(20.0);
        events
    }
}

/// Panel for layer visibility toggles
pub struct ViewPanel {
    candles: bool,
    long_heat: bool,
    short_heat: bool,
    price_line: bool,
}

#[derive(Debug)]
pub enum ViewEventChanged {
    Candles(bool),
    LongHeat(bool),
    ShortHeat(bool),
    PriceLine(bool),
}

impl ViewPanel {
    pub fn new(candles: bool, long_heat: bool, short_heat: bool, price_line: bool) -> Self {
        Self {
            candles,
            long_heat,
            short_heat,
            price_line,
        }
    }

    fn side_toggle(&mut self, side: Side) -> (&mut bool, &'static str) {
        match side {
            Side::Long => (&mut self.long_heat, UI_TEXT.toggle_long_heat),
            Side::Short => (&mut self.short_heat, UI_TEXT.toggle_short_heat),
        }
    }
}

impl Panel for ViewPanel {
    type Event = ViewEventChanged;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.view_options_heading);

        if ui
            .checkbox(&mut self.candles, UI_TEXT.toggle_candles)
            .changed()
        {
            events.push(ViewEventChanged::Candles(self.candles));
        }

        for side in Side::iter() {
            let (flag, label) = self.side_toggle(side);
            if ui.checkbox(flag, label).changed() {
                let value = *flag;
                events.push(match side {
                    Side::Long => ViewEventChanged::LongHeat(value),
                    Side::Short => ViewEventChanged::ShortHeat(value),
                });
            }
        }

        if ui
            .checkbox(&mut self.price_line, UI_TEXT.toggle_price_line)
            .changed()
        {
            events.push(ViewEventChanged::PriceLine(self.price_line));
        }

        ui.add_space(20.0);
        events
    }
}
