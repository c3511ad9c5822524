use crate::analysis::{
    AnalysisError, HeatmapDensity, aggregate_zones, detect_swing_points, filter_near_current,
};
use crate::config::ANALYSIS;
use crate::domain::swing::SwingKind;
use crate::domain::zone::{LiquidationZone, Side};
use crate::models::OhlcvTimeSeries;
use crate::utils::maths_utils::RangeF64;

/// Everything the user can turn that changes the analysis output.
#[derive(Debug, Clone, PartialEq)]
pub struct MapParams {
    /// Swing comparison radius
    pub window: usize,
    /// Leverage tiers to simulate, ascending
    pub tiers: Vec<u32>,
    /// Display band ratios around the current price, lower < upper
    pub lower_ratio: f64,
    pub upper_ratio: f64,
}

/// One full analysis run: swings, projected zones, the display-filtered
/// subset, and the binned density the renderer consumes. Regenerated
/// wholesale whenever the inputs change; nothing here is updated in place.
#[derive(Debug, Clone)]
pub struct LiquidationMap {
    pub pair_name: String,
    pub current_price: Option<f64>,
    /// Absolute display band (band_low, band_high), present iff we had a price
    pub band: Option<(f64, f64)>,
    pub swings: Vec<crate::domain::swing::SwingPoint>,
    /// All projected zones, unfiltered
    pub zones: Vec<LiquidationZone>,
    /// Zones inside the display band, order preserved
    pub filtered_zones: Vec<LiquidationZone>,
    pub density: Option<HeatmapDensity>,
}

impl LiquidationMap {
    /// Runs the full pipeline over one series. An empty or too-short series
    /// flows through as empty collections at every stage; only genuinely
    /// invalid parameters error.
    pub fn build(series: &OhlcvTimeSeries, params: &MapParams) -> Result<Self, AnalysisError> {
        let swings = detect_swing_points(series, params.window)?;
        let zones = aggregate_zones(&swings, &params.tiers)?;
        let current_price = series.last_close();

        let (filtered_zones, band, density) = match current_price {
            Some(price) => {
                let filtered =
                    filter_near_current(&zones, price, params.lower_ratio, params.upper_ratio)?;
                let band = (price * params.lower_ratio, price * params.upper_ratio);
                let price_range =
                    RangeF64::new(band.0, band.1, ANALYSIS.heatmap.bucket_count);
                let density = HeatmapDensity::from_zones(
                    &filtered,
                    price_range,
                    ANALYSIS.heatmap.band_half_width_pct,
                );
                (filtered, Some(band), Some(density))
            }
            None => (Vec::new(), None, None),
        };

        Ok(Self {
            pair_name: series.pair_interval.name().to_string(),
            current_price,
            band,
            swings,
            zones,
            filtered_zones,
            density,
        })
    }

    pub fn swing_count(&self, kind: SwingKind) -> usize {
        self.swings.iter().filter(|s| s.kind == kind).count()
    }

    pub fn filtered_count(&self, side: Side) -> usize {
        self.filtered_zones
            .iter()
            .filter(|z| z.side == side)
            .count()
    }

    /// True when there is nothing worth drawing (the UI shows "no data").
    pub fn is_empty(&self) -> bool {
        self.filtered_zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pair_interval::PairInterval;
    use crate::utils::TimeUtils;

    fn series_from_lows(lows: &[f64]) -> OhlcvTimeSeries {
        let highs: Vec<f64> = lows.iter().map(|l| l + 1.0).collect();
        OhlcvTimeSeries {
            pair_interval: PairInterval {
                name: "TESTUSDT".to_string(),
                interval_ms: TimeUtils::MS_IN_H,
            },
            first_kline_timestamp_ms: 0,
            open_prices: lows.to_vec(),
            high_prices: highs,
            low_prices: lows.to_vec(),
            close_prices: lows.to_vec(),
        }
    }

    fn default_params() -> MapParams {
        MapParams {
            window: 1,
            tiers: vec![10, 50],
            lower_ratio: 0.85,
            upper_ratio: 1.15,
        }
    }

    #[test]
    fn test_empty_series_builds_empty_map_without_error() {
        let map = LiquidationMap::build(&series_from_lows(&[]), &default_params()).unwrap();
        assert!(map.swings.is_empty());
        assert!(map.zones.is_empty());
        assert!(map.filtered_zones.is_empty());
        assert!(map.density.is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_v_shape_scenario_end_to_end() {
        // Lows [100, 95, 90, 95, 100]: swing Low at 90, last close 100.
        // Tiers 10x/50x project 81 and 88.2; band around 100 is (85, 115),
        // so only 88.2 survives filtering.
        let series = series_from_lows(&[100.0, 95.0, 90.0, 95.0, 100.0]);
        let map = LiquidationMap::build(&series, &default_params()).unwrap();

        assert!(map.swing_count(SwingKind::Low) >= 1);
        let longs: Vec<f64> = map
            .zones
            .iter()
            .filter(|z| z.side == Side::Long)
            .map(|z| z.price)
            .collect();
        assert!(longs.iter().any(|&p| (p - 81.0).abs() < 1e-9));
        assert!(longs.iter().any(|&p| (p - 88.2).abs() < 1e-9));

        assert_eq!(map.current_price, Some(100.0));
        let (band_low, band_high) = map.band.unwrap();
        assert!((band_low - 85.0).abs() < 1e-9);
        assert!((band_high - 115.0).abs() < 1e-9);

        assert!(
            map.filtered_zones
                .iter()
                .filter(|z| z.side == Side::Long)
                .all(|z| (z.price - 88.2).abs() < 1e-9 || z.price > 85.0)
        );
        let density = map.density.as_ref().unwrap();
        assert!(density.max_stack() >= 1.0);
    }

    #[test]
    fn test_filtered_counts_match_sides() {
        let series = series_from_lows(&[100.0, 95.0, 90.0, 95.0, 100.0]);
        let map = LiquidationMap::build(&series, &default_params()).unwrap();
        assert_eq!(
            map.filtered_count(Side::Long) + map.filtered_count(Side::Short),
            map.filtered_zones.len()
        );
    }
}
