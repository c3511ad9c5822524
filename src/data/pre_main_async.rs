// Async data loading to run in main before egui starts up

use crate::Cli;
use crate::config::{BINANCE, KLINE_VERSION};
use crate::data::timeseries::binance_api::BinanceApiSource;
use crate::data::timeseries::local_cache::{LocalCacheSource, check_local_data_validity};
use crate::data::timeseries::{
    MarketDataSource, TimeSeriesCollection, get_timeseries_data_async,
};

/// Resolve klines before the GUI starts (so the app never renders without data).
///
/// If the local cache fails validation the only choice is the API. Otherwise
/// both sources are available and `--prefer-api` decides the ordering.
pub async fn fetch_pair_data(args: &Cli) -> (TimeSeriesCollection, &'static str) {
    let interval_ms = args.timeframe.interval_ms();

    let api_source = || -> Box<dyn MarketDataSource> {
        Box::new(BinanceApiSource {
            pairs: args.pairs.clone(),
            interval_ms,
            lookback_ms: args.period.lookback_ms(),
        })
    };
    let cache_source = || -> Box<dyn MarketDataSource> {
        Box::new(LocalCacheSource { interval_ms })
    };

    let providers: Vec<Box<dyn MarketDataSource>> = match (
        args.prefer_api,
        check_local_data_validity(
            BINANCE.limits.kline_acceptable_age_sec,
            KLINE_VERSION,
            interval_ms,
        ),
    ) {
        (false, Ok(_)) => vec![cache_source(), api_source()], // local first
        (true, Ok(_)) => vec![api_source(), cache_source()],  // API first
        (_, Err(e)) => {
            log::warn!("⚠️  Local cache validation failed: {:#}", e);
            log::warn!("⚠️  Falling back to Binance API...");
            vec![api_source()] // API only
        }
    };

    let (timeseries_data, timeseries_signature) = get_timeseries_data_async(&providers)
        .await
        .expect("failed to retrieve time series data so exiting main function!");

    #[cfg(debug_assertions)]
    log::info!(
        "Successfully retrieved time series data using: {}.",
        timeseries_signature
    );

    (timeseries_data, timeseries_signature)
}
