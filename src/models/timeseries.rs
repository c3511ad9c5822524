use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::domain::candle::Candle;
use crate::domain::pair_interval::PairInterval;
use crate::utils::maths_utils;

// ============================================================================
// OhlcvTimeSeries: Raw time series data for a trading pair
// ============================================================================

/// Column-wise OHLC series, chronological and gap-free. Bar timestamps are
/// derived from `first_kline_timestamp_ms + index * interval_ms`, which rules
/// out duplicate timestamps by construction.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OhlcvTimeSeries {
    pub pair_interval: PairInterval,
    pub first_kline_timestamp_ms: i64,

    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,
}

pub fn find_matching_ohlcv<'a>(
    timeseries_data: &'a [OhlcvTimeSeries],
    pair_name: &str,
) -> Result<&'a OhlcvTimeSeries> {
    timeseries_data
        .iter()
        .find(|ohlcv| ohlcv.pair_interval.name == pair_name)
        .ok_or_else(|| anyhow!("No matching OHLCV data found for pair {}", pair_name))
}

impl OhlcvTimeSeries {
    pub fn get_candle(&self, idx: usize) -> Candle {
        Candle::new(
            self.open_prices[idx],
            self.high_prices[idx],
            self.low_prices[idx],
            self.close_prices[idx],
        )
    }

    pub fn klines(&self) -> usize {
        self.open_prices.len()
    }

    pub fn timestamp_ms_at(&self, idx: usize) -> i64 {
        self.first_kline_timestamp_ms + (idx as i64 * self.pair_interval.interval_ms)
    }

    pub fn last_kline_timestamp_ms(&self) -> i64 {
        self.timestamp_ms_at(self.klines().saturating_sub(1))
    }

    /// Close of the most recent bar; the "current price" of an analysis run.
    pub fn last_close(&self) -> Option<f64> {
        self.close_prices.last().copied()
    }

    /// Min low and max high across the whole series (None when empty).
    pub fn price_extent(&self) -> Option<(f64, f64)> {
        if self.low_prices.is_empty() {
            return None;
        }
        Some((
            maths_utils::get_min(&self.low_prices),
            maths_utils::get_max(&self.high_prices),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TimeUtils;

    fn sample_series() -> OhlcvTimeSeries {
        OhlcvTimeSeries {
            pair_interval: PairInterval {
                name: "BTCUSDT".to_string(),
                interval_ms: TimeUtils::MS_IN_H,
            },
            first_kline_timestamp_ms: 1_700_000_000_000,
            open_prices: vec![100.0, 101.0, 102.0],
            high_prices: vec![101.5, 102.5, 103.0],
            low_prices: vec![99.5, 100.5, 101.0],
            close_prices: vec![101.0, 102.0, 102.5],
        }
    }

    #[test]
    fn test_timestamps_derive_from_index() {
        let series = sample_series();
        assert_eq!(series.timestamp_ms_at(0), series.first_kline_timestamp_ms);
        assert_eq!(
            series.last_kline_timestamp_ms(),
            series.first_kline_timestamp_ms + 2 * TimeUtils::MS_IN_H
        );
    }

    #[test]
    fn test_price_extent_and_last_close() {
        let series = sample_series();
        assert_eq!(series.price_extent(), Some((99.5, 103.0)));
        assert_eq!(series.last_close(), Some(102.5));
    }

    #[test]
    fn test_find_matching_ohlcv() {
        let all = vec![sample_series()];
        assert!(find_matching_ohlcv(&all, "BTCUSDT").is_ok());
        assert!(find_matching_ohlcv(&all, "ETHUSDT").is_err());
    }
}
