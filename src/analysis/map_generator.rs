use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::data::timeseries::TimeSeriesCollection;
use crate::models::{LiquidationMap, MapParams, find_matching_ohlcv};

// --- The cache key struct ---
// Ratios are stored as bits so the key can be Eq/Hash despite being f64s.
#[derive(Clone, Debug)]
struct CacheKey {
    pair: String,
    window: usize,
    tiers: Vec<u32>,
    lower_ratio_bits: u64,
    upper_ratio_bits: u64,
}

impl CacheKey {
    fn new(pair: &str, params: &MapParams) -> Self {
        Self {
            pair: pair.to_string(),
            window: params.window,
            tiers: params.tiers.clone(),
            lower_ratio_bits: params.lower_ratio.to_bits(),
            upper_ratio_bits: params.upper_ratio.to_bits(),
        }
    }
}

impl Hash for CacheKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.pair.hash(state);
        self.window.hash(state);
        self.tiers.hash(state);
        self.lower_ratio_bits.hash(state);
        self.upper_ratio_bits.hash(state);
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.pair == other.pair
            && self.window == other.window
            && self.tiers == other.tiers
            && self.lower_ratio_bits == other.lower_ratio_bits
            && self.upper_ratio_bits == other.upper_ratio_bits
    }
}

impl Eq for CacheKey {}

/// Memoizes `LiquidationMap` per (pair, params) so slider scrubbing and pair
/// switching reuse prior results instead of recomputing every frame.
pub struct MapGenerator {
    cache: Arc<Mutex<HashMap<CacheKey, Arc<LiquidationMap>>>>,
}

impl Default for MapGenerator {
    fn default() -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Clone for MapGenerator {
    fn clone(&self) -> Self {
        Self {
            // Clone the Arc, not the HashMap - this shares the cache!
            cache: Arc::clone(&self.cache),
        }
    }
}

impl MapGenerator {
    pub fn get_map(
        &self,
        selected_pair: &str,
        params: &MapParams,
        timeseries_data: &TimeSeriesCollection,
    ) -> Result<Arc<LiquidationMap>> {
        let key = CacheKey::new(selected_pair, params);

        // --- Step 1: Try to get a lock and check if the key exists ---
        {
            if let Ok(cache) = self.cache.lock()
                && let Some(cached_map) = cache.get(&key)
            {
                #[cfg(debug_assertions)]
                log::debug!(
                    "Liquidation map cache HIT for {} (window {}, {} tiers)",
                    selected_pair,
                    params.window,
                    params.tiers.len()
                );
                return Ok(Arc::clone(cached_map));
            }
        } // Lock is released here.

        // --- Step 2: Not cached, compute and insert with a lock ---
        #[cfg(debug_assertions)]
        log::debug!(
            "Liquidation map cache MISS for {} (window {}, {} tiers) - computing",
            selected_pair,
            params.window,
            params.tiers.len()
        );

        let series = find_matching_ohlcv(&timeseries_data.series_data, selected_pair)?;
        let map = Arc::new(LiquidationMap::build(series, params)?);

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, Arc::clone(&map));
        }

        Ok(map)
    }

    /// Drop all cached results, e.g. after the source data changes.
    #[allow(dead_code)]
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pair_interval::PairInterval;
    use crate::models::OhlcvTimeSeries;
    use crate::utils::TimeUtils;

    fn collection() -> TimeSeriesCollection {
        let lows = vec![100.0, 95.0, 90.0, 95.0, 100.0];
        let highs: Vec<f64> = lows.iter().map(|l| l + 1.0).collect();
        TimeSeriesCollection {
            name: "test".to_string(),
            version: 1.0,
            series_data: vec![OhlcvTimeSeries {
                pair_interval: PairInterval {
                    name: "TESTUSDT".to_string(),
                    interval_ms: TimeUtils::MS_IN_H,
                },
                first_kline_timestamp_ms: 0,
                open_prices: lows.clone(),
                high_prices: highs,
                low_prices: lows.clone(),
                close_prices: lows,
            }],
        }
    }

    fn params() -> MapParams {
        MapParams {
            window: 1,
            tiers: vec![10, 50],
            lower_ratio: 0.85,
            upper_ratio: 1.15,
        }
    }

    #[test]
    fn test_cache_returns_same_arc_for_same_params() {
        let generator = MapGenerator::default();
        let data = collection();
        let first = generator.get_map("TESTUSDT", &params(), &data).unwrap();
        let second = generator.get_map("TESTUSDT", &params(), &data).unwrap();
        assert!(Arc::ptr_eq(&first, &second), "second call must be a cache hit");
    }

    #[test]
    fn test_param_change_recomputes() {
        let generator = MapGenerator::default();
        let data = collection();
        let first = generator.get_map("TESTUSDT", &params(), &data).unwrap();
        let mut wider = params();
        wider.window = 2;
        let second = generator.get_map("TESTUSDT", &wider, &data).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unknown_pair_errors() {
        let generator = MapGenerator::default();
        assert!(generator.get_map("NOPEUSDT", &params(), &collection()).is_err());
    }
}
