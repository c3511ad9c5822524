use rayon::prelude::*;

use crate::analysis::AnalysisError;
use crate::analysis::projection::project_liquidation;
use crate::domain::swing::{SwingKind, SwingPoint};
use crate::domain::zone::{LiquidationZone, Side};

/// Projects one liquidation zone for every (swing, leverage tier) pair.
///
/// Low swings model hypothetical longs opened at support, so they produce
/// Long-liquidation zones below the swing price; High swings produce
/// Short-liquidation zones above it. Output order is fixed and documented:
/// all Long-derived zones first (swing order, then tier order), then all
/// Short-derived zones. Cardinality is exactly
/// `(#Low swings + #High swings) * #tiers`.
///
/// Empty `swings` or `tiers` yields an empty collection, not an error. Each
/// swing's projections are independent, so the per-swing work fans out over
/// rayon and is recombined in order.
pub fn aggregate_zones(
    swings: &[SwingPoint],
    tiers: &[u32],
) -> Result<Vec<LiquidationZone>, AnalysisError> {
    let mut zones = project_side(swings, tiers, SwingKind::Low, Side::Long)?;
    zones.extend(project_side(swings, tiers, SwingKind::High, Side::Short)?);
    Ok(zones)
}

fn project_side(
    swings: &[SwingPoint],
    tiers: &[u32],
    kind: SwingKind,
    side: Side,
) -> Result<Vec<LiquidationZone>, AnalysisError> {
    let per_swing: Vec<Vec<LiquidationZone>> = swings
        .par_iter()
        .filter(|swing| swing.kind == kind)
        .map(|swing| {
            tiers
                .iter()
                .map(|&leverage| {
                    let price = project_liquidation(swing.price, side, leverage)?;
                    Ok(LiquidationZone {
                        price,
                        side,
                        leverage,
                    })
                })
                .collect::<Result<Vec<_>, AnalysisError>>()
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    Ok(per_swing.into_iter().flatten().collect())
}

/// Display-relevance filter: keeps zones with price strictly inside
/// `(current_price * lower_ratio, current_price * upper_ratio)`.
///
/// Order is preserved and the input is never mutated, which makes the filter
/// idempotent for fixed bounds. Errors with `InvalidInput` when
/// `current_price` is not positive or the ratios are not strictly ordered.
pub fn filter_near_current(
    zones: &[LiquidationZone],
    current_price: f64,
    lower_ratio: f64,
    upper_ratio: f64,
) -> Result<Vec<LiquidationZone>, AnalysisError> {
    if !(current_price.is_finite() && current_price > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "current price must be a positive finite number, got {}",
            current_price
        )));
    }
    if lower_ratio >= upper_ratio {
        return Err(AnalysisError::InvalidInput(format!(
            "band ratios must satisfy lower < upper, got {} >= {}",
            lower_ratio, upper_ratio
        )));
    }

    let band_low = current_price * lower_ratio;
    let band_high = current_price * upper_ratio;

    Ok(zones
        .iter()
        .filter(|zone| zone.price > band_low && zone.price < band_high)
        .copied()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample_swings() -> Vec<SwingPoint> {
        vec![
            SwingPoint::new(2, 90.0, SwingKind::Low),
            SwingPoint::new(7, 100.0, SwingKind::High),
            SwingPoint::new(11, 92.0, SwingKind::Low),
        ]
    }

    #[test]
    fn test_cardinality_is_swings_times_tiers() {
        let zones = aggregate_zones(&sample_swings(), &[10, 25, 50]).unwrap();
        assert_eq!(zones.len(), 3 * 3);
    }

    #[test]
    fn test_sides_derive_from_swing_kinds() {
        let zones = aggregate_zones(&sample_swings(), &[10, 50]).unwrap();

        let longs: Vec<_> = zones.iter().filter(|z| z.side == Side::Long).collect();
        let shorts: Vec<_> = zones.iter().filter(|z| z.side == Side::Short).collect();
        assert_eq!(longs.len(), 4, "2 Low swings x 2 tiers");
        assert_eq!(shorts.len(), 2, "1 High swing x 2 tiers");

        // Long zones lie strictly below their swing lows, shorts strictly above
        assert!(longs.iter().all(|z| z.price < 92.0));
        assert!(shorts.iter().all(|z| z.price > 100.0));
    }

    #[test]
    fn test_documented_output_order() {
        // Longs first (swing order, then tier order), then shorts.
        let zones = aggregate_zones(&sample_swings(), &[10, 50]).unwrap();
        assert!((zones[0].price - 81.0).abs() < EPS); // 90 @ 10x
        assert!((zones[1].price - 88.2).abs() < EPS); // 90 @ 50x
        assert!((zones[2].price - 82.8).abs() < EPS); // 92 @ 10x
        assert!((zones[3].price - 90.16).abs() < EPS); // 92 @ 50x
        assert_eq!(zones[4].side, Side::Short); // 100 @ 10x = 110
        assert!((zones[4].price - 110.0).abs() < EPS);
        assert!((zones[5].price - 102.0).abs() < EPS); // 100 @ 50x
    }

    #[test]
    fn test_degenerate_inputs_yield_empty() {
        assert!(aggregate_zones(&[], &[10, 25]).unwrap().is_empty());
        assert!(aggregate_zones(&sample_swings(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_tier_propagates() {
        let err = aggregate_zones(&sample_swings(), &[10, 0]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_filter_retains_nearby_projections() {
        // Long liquidations 81 and 88.2 from a swing low at 90; current 95
        // with (0.85, 1.15) gives the band (80.75, 109.25) — both retained.
        let swings = vec![SwingPoint::new(2, 90.0, SwingKind::Low)];
        let zones = aggregate_zones(&swings, &[10, 50]).unwrap();
        let kept = filter_near_current(&zones, 95.0, 0.85, 1.15).unwrap();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_filter_bounds_are_strict() {
        let zones = vec![
            LiquidationZone {
                price: 85.0,
                side: Side::Long,
                leverage: 10,
            },
            LiquidationZone {
                price: 115.0,
                side: Side::Short,
                leverage: 10,
            },
            LiquidationZone {
                price: 100.0,
                side: Side::Short,
                leverage: 10,
            },
        ];
        // Band is exactly (85, 115): both boundary prices fall out.
        let kept = filter_near_current(&zones, 100.0, 0.85, 1.15).unwrap();
        assert_eq!(kept.len(), 1);
        assert!((kept[0].price - 100.0).abs() < EPS);
    }

    #[test]
    fn test_filter_is_idempotent_and_order_preserving() {
        let swings = sample_swings();
        let zones = aggregate_zones(&swings, &[10, 25, 50, 100]).unwrap();
        let once = filter_near_current(&zones, 95.0, 0.85, 1.15).unwrap();
        let twice = filter_near_current(&once, 95.0, 0.85, 1.15).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_rejects_bad_parameters() {
        let zones: Vec<LiquidationZone> = Vec::new();
        assert!(filter_near_current(&zones, 0.0, 0.85, 1.15).is_err());
        assert!(filter_near_current(&zones, -10.0, 0.85, 1.15).is_err());
        assert!(filter_near_current(&zones, 100.0, 1.15, 0.85).is_err());
        assert!(filter_near_current(&zones, 100.0, 1.0, 1.0).is_err());
    }
}
