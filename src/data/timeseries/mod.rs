pub mod binance_api;
pub mod cache_file;
pub mod local_cache;

use crate::models::OhlcvTimeSeries;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[async_trait]
pub trait MarketDataSource {
    // Either create a time-series collection OR return an anyhow::Error
    async fn create_timeseries_data(&self) -> Result<TimeSeriesCollection>;

    /// A unique identifier for this source (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Try each source in order and return the first that succeeds.
pub async fn get_timeseries_data_async(
    sources: &[Box<dyn MarketDataSource>],
) -> Result<(TimeSeriesCollection, &'static str)> {
    for source in sources {
        match source.create_timeseries_data().await {
            Ok(data) => {
                let signature = source.signature();
                return Ok((data, signature));
            }
            Err(e) => {
                log::info!("Data source '{}' failed: {}", source.signature(), e);
                // Continue to the next source
            }
        }
    }
    Err(anyhow!("All data sources failed to produce time series"))
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct TimeSeriesCollection {
    pub name: String, // Metadata e.g. "Binance TimeSeries Collection".
    pub version: f64, // Serialization format version, checked on cache load
    pub series_data: Vec<OhlcvTimeSeries>,
}

impl TimeSeriesCollection {
    pub fn unique_pair_names(&self) -> Vec<String> {
        // BTreeSet maintains sorted order and ensures uniqueness
        self.series_data
            .iter()
            .map(|ts| ts.pair_interval.name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pair_interval::PairInterval;
    use crate::utils::TimeUtils;

    fn series(name: &str) -> OhlcvTimeSeries {
        OhlcvTimeSeries {
            pair_interval: PairInterval {
                name: name.to_string(),
                interval_ms: TimeUtils::MS_IN_H,
            },
            first_kline_timestamp_ms: 0,
            open_prices: vec![1.0],
            high_prices: vec![1.0],
            low_prices: vec![1.0],
            close_prices: vec![1.0],
        }
    }

    #[test]
    fn test_unique_pair_names_sorted_and_deduped() {
        let collection = TimeSeriesCollection {
            name: "test".to_string(),
            version: 1.0,
            series_data: vec![series("ETHUSDT"), series("BTCUSDT"), series("ETHUSDT")],
        };
        assert_eq!(
            collection.unique_pair_names(),
            vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()]
        );
    }
}
