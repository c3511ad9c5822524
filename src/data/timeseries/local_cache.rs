use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use crate::data::timeseries::{MarketDataSource, TimeSeriesCollection, cache_file::CacheFile};
use crate::utils::time_utils::how_many_seconds_ago;

/// Pre-flight check so the provider ordering can decide whether the local
/// cache is worth trying at all.
pub fn check_local_data_validity(
    recency_required_secs: i64,
    version_required: f64,
    interval_ms: i64,
) -> Result<()> {
    let full_path = CacheFile::default_cache_path(interval_ms);

    #[cfg(debug_assertions)]
    log::info!("Checking validity of local cache at {:?}...", full_path);

    let cache = CacheFile::load_from_path(&full_path)?;

    // Check version
    if cache.version != version_required {
        bail!(
            "Cache version mismatch: file v{} vs required v{}",
            cache.version,
            version_required
        );
    }

    // Check interval matches
    if cache.interval_ms != interval_ms {
        bail!(
            "Cache interval mismatch: file has {}ms intervals, expected {}ms",
            cache.interval_ms,
            interval_ms
        );
    }

    // Check recency
    let seconds_ago = how_many_seconds_ago(cache.timestamp_ms);
    if seconds_ago > recency_required_secs {
        bail!(
            "Cache too old: created {} seconds ago (limit: {} seconds)",
            seconds_ago,
            recency_required_secs
        );
    }

    #[cfg(debug_assertions)]
    log::info!(
        "✅ Cache valid: v{}, {}s old (limit {}s), interval {}ms",
        cache.version,
        seconds_ago,
        recency_required_secs,
        cache.interval_ms
    );

    Ok(())
}

/// Write timeseries data to a binary cache file.
/// Uses bincode for ~10-20x faster serialization vs JSON.
pub fn write_timeseries_data_locally(
    timeseries_signature: &'static str,
    timeseries_collection: &TimeSeriesCollection,
    interval_ms: i64,
) -> Result<()> {
    if timeseries_signature != "Binance API" {
        #[cfg(debug_assertions)]
        log::info!("Skipping cache write (data not from Binance API)");
        return Ok(());
    }

    let full_path = CacheFile::default_cache_path(interval_ms);

    #[cfg(debug_assertions)]
    let start_time = {
        log::info!("Writing cache to disk: {:?}...", full_path);
        std::time::Instant::now()
    };

    let cache = CacheFile::new(
        interval_ms,
        timeseries_collection.clone(),
        crate::config::KLINE_VERSION,
    );
    cache.save_to_path(&full_path)?;

    #[cfg(debug_assertions)]
    {
        let elapsed = start_time.elapsed();
        let file_size = std::fs::metadata(&full_path)?.len();
        log::info!(
            "✅ Cache written: {:?} ({:.1} MB in {:.2}s)",
            full_path,
            file_size as f64 / 1_048_576.0,
            elapsed.as_secs_f64(),
        );
    }

    Ok(())
}

/// Async wrapper for write_timeseries_data_locally.
/// Spawns a blocking task to avoid freezing the UI.
pub async fn write_timeseries_data_async(
    timeseries_signature: &'static str,
    timeseries_collection: TimeSeriesCollection,
    interval_ms: i64,
) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        write_timeseries_data_locally(timeseries_signature, &timeseries_collection, interval_ms)
    })
    .await
    .context("Cache write task panicked")?
}

pub struct LocalCacheSource {
    pub interval_ms: i64,
}

#[async_trait]
impl MarketDataSource for LocalCacheSource {
    fn signature(&self) -> &'static str {
        "Local Cache"
    }

    async fn create_timeseries_data(&self) -> Result<TimeSeriesCollection> {
        let full_path = CacheFile::default_cache_path(self.interval_ms);

        #[cfg(debug_assertions)]
        let start_time = {
            log::info!("Reading cache from: {:?}...", full_path);
            std::time::Instant::now()
        };

        // File IO off the async runtime
        let cache = tokio::task::spawn_blocking(move || CacheFile::load_from_path(&full_path))
            .await
            .context("Deserialization task panicked")?
            .context("Failed to load cache file")?;

        #[cfg(debug_assertions)]
        log::info!(
            "✅ Cache loaded: {} pairs in {:.2}s",
            cache.data.series_data.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(cache.data)
    }
}
