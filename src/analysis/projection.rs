use crate::analysis::AnalysisError;
use crate::domain::zone::Side;

/// Estimates the liquidation price of an isolated-margin position opened at
/// `entry_price` with the given leverage.
///
///   Long:  `entry - entry / leverage`
///   Short: `entry + entry / leverage`
///
/// This ignores fees, funding, and maintenance-margin ratios, so it is an
/// estimate of where liquidation clusters, not an exchange-exact number.
/// Higher leverage moves the result closer to the entry; leverage 1 gives
/// the degenerate bounds 0 (Long) and 2x entry (Short).
///
/// Pure function. Errors with `InvalidInput` when `leverage` is zero or
/// `entry_price` is not a positive finite number.
pub fn project_liquidation(
    entry_price: f64,
    side: Side,
    leverage: u32,
) -> Result<f64, AnalysisError> {
    if leverage == 0 {
        return Err(AnalysisError::InvalidInput(
            "leverage must be positive".to_string(),
        ));
    }
    if !(entry_price.is_finite() && entry_price > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "entry price must be a positive finite number, got {}",
            entry_price
        )));
    }

    let offset = entry_price / leverage as f64;
    let liq_price = match side {
        Side::Long => entry_price - offset,
        Side::Short => entry_price + offset,
    };
    Ok(liq_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_long_projections_at_known_tiers() {
        // Swing Low at 90 with tiers 10x and 50x
        let at_10x = project_liquidation(90.0, Side::Long, 10).unwrap();
        let at_50x = project_liquidation(90.0, Side::Long, 50).unwrap();
        assert!((at_10x - 81.0).abs() < EPS);
        assert!((at_50x - 88.2).abs() < EPS);
    }

    #[test]
    fn test_short_projection_at_known_tier() {
        // Swing High at 100 with 25x leverage
        let liq = project_liquidation(100.0, Side::Short, 25).unwrap();
        assert!((liq - 104.0).abs() < EPS);
    }

    #[test]
    fn test_leverage_one_boundary() {
        assert!((project_liquidation(123.0, Side::Long, 1).unwrap() - 0.0).abs() < EPS);
        assert!((project_liquidation(123.0, Side::Short, 1).unwrap() - 246.0).abs() < EPS);
    }

    #[test]
    fn test_distance_shrinks_as_leverage_grows() {
        let entry = 250.0;
        for side in [Side::Long, Side::Short] {
            let mut prev_distance = f64::INFINITY;
            for leverage in [2, 5, 10, 25, 50, 100] {
                let liq = project_liquidation(entry, side, leverage).unwrap();
                let distance = (liq - entry).abs();
                assert!(
                    distance < prev_distance,
                    "distance must strictly decrease with leverage ({:?} {}x)",
                    side,
                    leverage
                );
                prev_distance = distance;
            }
        }
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        assert!(project_liquidation(100.0, Side::Long, 0).is_err());
        assert!(project_liquidation(0.0, Side::Long, 10).is_err());
        assert!(project_liquidation(-5.0, Side::Short, 10).is_err());
        assert!(project_liquidation(f64::NAN, Side::Short, 10).is_err());
        assert!(project_liquidation(f64::INFINITY, Side::Long, 10).is_err());
    }
}
