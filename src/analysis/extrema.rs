use crate::analysis::AnalysisError;
use crate::domain::swing::{SwingKind, SwingPoint};
use crate::models::OhlcvTimeSeries;

/// Finds swing highs and lows over a symmetric comparison window.
///
/// Bar `i` is a swing High iff its high is >= the high of every bar with
/// index in `[i - window, i + window]`, clipped to the series bounds; the
/// symmetric definition with <= on lows gives swing Lows. Bars near the
/// series edges are compared only against the bars that exist, so a boundary
/// bar can still qualify by dominating its truncated neighborhood.
///
/// Because the comparison is non-strict, a flat run of equal extremes marks
/// every bar in the run. A single bar can be both a High and a Low.
///
/// Output is ordered by bar index, High marker before Low marker per bar.
///
/// Errors with `InvalidInput` when `window` is zero. A series with fewer
/// than `2 * window + 1` bars has no fully-evaluable interior point, so we
/// treat it as "not enough data" and return an empty set rather than fail.
pub fn detect_swing_points(
    series: &OhlcvTimeSeries,
    window: usize,
) -> Result<Vec<SwingPoint>, AnalysisError> {
    if window < 1 {
        return Err(AnalysisError::InvalidInput(
            "swing window must be at least 1".to_string(),
        ));
    }

    let len = series.klines();
    if len < 2 * window + 1 {
        return Ok(Vec::new());
    }

    let highs = &series.high_prices;
    let lows = &series.low_prices;
    let mut swings = Vec::new();

    for i in 0..len {
        let lo = i.saturating_sub(window);
        let hi = (i + window).min(len - 1);

        if highs[lo..=hi].iter().all(|&h| highs[i] >= h) {
            swings.push(SwingPoint::new(i, highs[i], SwingKind::High));
        }
        if lows[lo..=hi].iter().all(|&l| lows[i] <= l) {
            swings.push(SwingPoint::new(i, lows[i], SwingKind::Low));
        }
    }

    Ok(swings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pair_interval::PairInterval;
    use crate::utils::TimeUtils;

    /// Build a series where highs sit 1.0 above the given lows; open/close
    /// are irrelevant to the detector.
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

    fn lows_of(swings: &[SwingPoint]) -> Vec<usize> {
        swings
            .iter()
            .filter(|s| s.kind == SwingKind::Low)
            .map(|s| s.index)
            .collect()
    }

    fn highs_of(swings: &[SwingPoint]) -> Vec<usize> {
        swings
            .iter()
            .filter(|s| s.kind == SwingKind::High)
            .map(|s| s.index)
            .collect()
    }

    #[test]
    fn test_zero_window_is_invalid() {
        let series = series_from_lows(&[100.0, 95.0, 100.0]);
        let err = detect_swing_points(&series, 0).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_short_series_yields_empty_not_error() {
        // 4 bars but window 2 needs 2*2+1 = 5
        let series = series_from_lows(&[100.0, 95.0, 90.0, 95.0]);
        let swings = detect_swing_points(&series, 2).unwrap();
        assert!(swings.is_empty(), "short series should produce no swings");
    }

    #[test]
    fn test_empty_series_yields_empty() {
        let series = series_from_lows(&[]);
        assert!(detect_swing_points(&series, 5).unwrap().is_empty());
    }

    #[test]
    fn test_v_shape_marks_the_trough() {
        // V-shaped lows [100, 95, 90, 95, 100], window 1
        let series = series_from_lows(&[100.0, 95.0, 90.0, 95.0, 100.0]);
        let swings = detect_swing_points(&series, 1).unwrap();

        let lows = lows_of(&swings);
        assert!(lows.contains(&2), "index 2 must be a swing Low");
        let trough = swings
            .iter()
            .find(|s| s.index == 2 && s.kind == SwingKind::Low)
            .unwrap();
        assert_eq!(trough.price, 90.0);

        // The highs mirror the lows here, so the edge bars are swing Highs
        // (truncated windows) while the trough is not.
        let highs = highs_of(&swings);
        assert!(!highs.contains(&2));
    }

    #[test]
    fn test_boundary_bar_can_qualify_with_truncated_window() {
        // Strictly decreasing lows: the first bar is never a Low, the last
        // always is; the first bar dominates every truncated high window.
        let series = series_from_lows(&[100.0, 99.0, 98.0, 97.0, 96.0]);
        let swings = detect_swing_points(&series, 2).unwrap();

        assert_eq!(lows_of(&swings), vec![4]);
        assert_eq!(highs_of(&swings), vec![0]);
    }

    #[test]
    fn test_flat_run_marks_every_bar() {
        // Three equal maxima in a row: all three get High markers.
        let series = series_from_lows(&[90.0, 100.0, 100.0, 100.0, 90.0]);
        let swings = detect_swing_points(&series, 1).unwrap();
        let highs = highs_of(&swings);
        assert_eq!(
            highs,
            vec![1, 2, 3],
            "every bar of a flat top must be marked"
        );
    }

    #[test]
    fn test_constant_series_marks_everything_both_ways() {
        // Degenerate but legal: every bar ties on both highs and lows, so
        // every bar is simultaneously a swing High and a swing Low.
        let series = series_from_lows(&[50.0; 5]);
        let swings = detect_swing_points(&series, 1).unwrap();
        assert_eq!(highs_of(&swings).len(), 5);
        assert_eq!(lows_of(&swings).len(), 5);
    }

    #[test]
    fn test_detector_is_deterministic() {
        let series = series_from_lows(&[100.0, 97.0, 93.0, 95.0, 91.0, 94.0, 99.0]);
        let first = detect_swing_points(&series, 2).unwrap();
        let second = detect_swing_points(&series, 2).unwrap();
        assert_eq!(first, second);
    }
}
