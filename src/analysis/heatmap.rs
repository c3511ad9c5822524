use crate::domain::zone::{LiquidationZone, Side};
use crate::utils::maths_utils::{self, RangeF64};

/// Per-side stacked counts over a bucketed price axis.
///
/// Each zone contributes a thin band around its price (`price * (1 ± half
/// width)`) and adds 1.0 to every bucket the band touches. Overlapping bands
/// therefore stack, which is exactly what the renderer maps to opacity:
/// more overlap = hotter. Bands are clipped to the axis; a band entirely
/// outside it contributes nothing.
#[derive(Debug, Clone)]
pub struct HeatmapDensity {
    pub price_range: RangeF64,
    pub long_stacks: Vec<f64>,
    pub short_stacks: Vec<f64>,
}

impl HeatmapDensity {
    pub fn from_zones(
        zones: &[LiquidationZone],
        price_range: RangeF64,
        band_half_width_pct: f64,
    ) -> Self {
        let n_chunks = price_range.n_chunks();
        let mut density = HeatmapDensity {
            price_range,
            long_stacks: vec![0.0; n_chunks],
            short_stacks: vec![0.0; n_chunks],
        };

        for zone in zones {
            let band_low = zone.price * (1.0 - band_half_width_pct);
            let band_high = zone.price * (1.0 + band_half_width_pct);
            let stacks = match zone.side {
                Side::Long => &mut density.long_stacks,
                Side::Short => &mut density.short_stacks,
            };
            stack_band(stacks, &density.price_range, band_low, band_high);
        }

        density
    }

    pub fn side_stacks(&self, side: Side) -> &[f64] {
        match side {
            Side::Long => &self.long_stacks,
            Side::Short => &self.short_stacks,
        }
    }

    /// Largest stack across both sides, for normalization. Zero when nothing
    /// was binned.
    pub fn max_stack(&self) -> f64 {
        if self.long_stacks.is_empty() {
            return 0.0;
        }
        maths_utils::get_max(&self.long_stacks).max(maths_utils::get_max(&self.short_stacks))
    }
}

fn stack_band(stacks: &mut [f64], range: &RangeF64, band_low: f64, band_high: f64) {
    let num_chunks = range.count_intersecting_chunks(band_low, band_high);
    if num_chunks == 0 {
        return;
    }

    let (axis_min, axis_max) = range.min_max();
    let start_chunk = range.chunk_index(band_low.max(axis_min).min(axis_max));

    stacks
        .iter_mut()
        .skip(start_chunk)
        .take(num_chunks)
        .for_each(|count| {
            *count += 1.0;
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(price: f64, side: Side) -> LiquidationZone {
        LiquidationZone {
            price,
            side,
            leverage: 25,
        }
    }

    #[test]
    fn test_empty_zones_give_zero_density() {
        let density =
            HeatmapDensity::from_zones(&[], RangeF64::new(80.0, 120.0, 100), 0.002);
        assert_eq!(density.max_stack(), 0.0);
        assert!(density.long_stacks.iter().all(|&c| c == 0.0));
        assert!(density.short_stacks.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_overlapping_bands_stack() {
        // Two long zones at the same price: their buckets count twice.
        let zones = vec![zone(100.0, Side::Long), zone(100.0, Side::Long)];
        let density =
            HeatmapDensity::from_zones(&zones, RangeF64::new(80.0, 120.0, 100), 0.002);
        assert_eq!(density.max_stack(), 2.0);
        // The short side stays untouched
        assert!(density.short_stacks.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_sides_bin_independently() {
        let zones = vec![zone(90.0, Side::Long), zone(110.0, Side::Short)];
        let density =
            HeatmapDensity::from_zones(&zones, RangeF64::new(80.0, 120.0, 100), 0.002);

        let long_hit = density.price_range.chunk_index(90.0);
        let short_hit = density.price_range.chunk_index(110.0);
        assert!(density.long_stacks[long_hit] > 0.0);
        assert!(density.short_stacks[short_hit] > 0.0);
        assert_eq!(density.long_stacks[short_hit], 0.0);
        assert_eq!(density.short_stacks[long_hit], 0.0);
    }

    #[test]
    fn test_band_outside_axis_is_ignored() {
        let zones = vec![zone(500.0, Side::Short)];
        let density =
            HeatmapDensity::from_zones(&zones, RangeF64::new(80.0, 120.0, 100), 0.002);
        assert_eq!(density.max_stack(), 0.0);
    }
}
