// Std library crates
use std::collections::HashSet;
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;

// External crates
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
};
use binance_sdk::{errors, errors::ConnectorError as connection_error};
use tokio::{task::JoinError, task::JoinHandle, time::Instant};

// Local crates
use crate::config::{BINANCE, KLINE_VERSION, binance::BinanceApiConfig};
use crate::data::timeseries::{MarketDataSource, TimeSeriesCollection};
use crate::domain::pair_interval::PairInterval;
use crate::models::OhlcvTimeSeries;

pub fn try_interval_from_ms(ms: i64) -> Result<KlinesIntervalEnum, String> {
    use crate::utils::TimeUtils;
    match ms {
        TimeUtils::MS_IN_H => Ok(KlinesIntervalEnum::Interval1h),
        TimeUtils::MS_IN_4_H => Ok(KlinesIntervalEnum::Interval4h),
        TimeUtils::MS_IN_D => Ok(KlinesIntervalEnum::Interval1d),
        _ => Err(format!("Unsupported interval: {}ms", ms)),
    }
}

/// Fetches klines for every configured pair, bounded by a lookback window
/// ending now. Each pair is loaded in its own task.
pub struct BinanceApiSource {
    pub pairs: Vec<String>,
    pub interval_ms: i64,
    pub lookback_ms: i64,
}

#[async_trait]
impl MarketDataSource for BinanceApiSource {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    async fn create_timeseries_data(&self) -> Result<TimeSeriesCollection> {
        let start_time = Instant::now();

        let pair_intervals: Vec<PairInterval> = self
            .pairs
            .iter()
            .map(|p| p.trim().to_uppercase())
            .filter(|p| !p.is_empty())
            .take(BINANCE.max_pairs)
            .map(|name| PairInterval {
                name,
                interval_ms: self.interval_ms,
            })
            .collect();

        if pair_intervals.is_empty() {
            bail!("No pairs configured for the Binance API source");
        }

        let mut handles: Vec<JoinHandle<Result<OhlcvTimeSeries>>> = Vec::new();
        for pair_interval in pair_intervals {
            log::info!("Fetching klines for {}", pair_interval);
            handles.push(tokio::spawn(load_klines(pair_interval, self.lookback_ms)));
        }
        let results: Vec<Result<Result<OhlcvTimeSeries>, JoinError>> = join_all(handles).await;
        log::info!(
            "...Time to complete all kline fetch tasks: {:?}",
            start_time.elapsed()
        );

        let mut series_data: Vec<OhlcvTimeSeries> = Vec::new();
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(Ok(series)) => {
                    log::info!(
                        "{} loaded with {} klines",
                        series.pair_interval,
                        series.klines()
                    );
                    series_data.push(series);
                }
                Ok(Err(e)) => {
                    // A single bad symbol should not sink the whole run
                    log::info!("Binance API error for pair: {:#}", e);
                }
                Err(e) => {
                    errors.push(format!("Request task failed: {:?}", e));
                }
            }
        }

        if !errors.is_empty() {
            return Err(anyhow!("Failed to fetch data: {}", errors.join(", ")));
        }
        if series_data.is_empty() {
            bail!("No pair returned any klines from the Binance API");
        }

        Ok(TimeSeriesCollection {
            name: "Binance TimeSeries Collection".to_string(),
            version: KLINE_VERSION,
            series_data,
        })
    }
}

#[derive(Debug, PartialOrd, PartialEq)]
pub struct BNKline {
    pub open_timestamp_ms: i64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
}

#[derive(Debug)]
pub enum BNKlineError {
    InvalidLength,
    InvalidType(String),
    ConnectionFailed(String),
}

impl fmt::Display for BNKlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BNKlineError::InvalidLength => write!(f, "Invalid length"),
            BNKlineError::InvalidType(string) => write!(f, "Invalid type: {}", string),
            BNKlineError::ConnectionFailed(msg) => {
                write!(f, "Binance API connection failed: {}.", msg)
            }
        }
    }
}

impl Error for BNKlineError {}

fn parse_price(
    item: Option<KlinesItemInner>,
    field: &str,
) -> Result<f64, BNKlineError> {
    match item {
        Some(KlinesItemInner::String(s)) => s
            .parse::<f64>()
            .map_err(|_| BNKlineError::InvalidType(field.to_string())),
        Some(_) => Err(BNKlineError::InvalidType(field.to_string())),
        None => Err(BNKlineError::InvalidLength),
    }
}

impl TryFrom<Vec<KlinesItemInner>> for BNKline {
    type Error = BNKlineError;

    fn try_from(row: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        // Binance returns 12 fields per kline; we use the first five
        let mut items = row.into_iter();
        let open_timestamp_ms = match items.next().ok_or(BNKlineError::InvalidLength)? {
            KlinesItemInner::Integer(ts) => ts,
            _ => return Err(BNKlineError::InvalidType("open_time".to_string())),
        };

        Ok(BNKline {
            open_timestamp_ms,
            open_price: parse_price(items.next(), "open")?,
            high_price: parse_price(items.next(), "high")?,
            low_price: parse_price(items.next(), "low")?,
            close_price: parse_price(items.next(), "close")?,
        })
    }
}

fn convert_klines(data: Vec<Vec<KlinesItemInner>>) -> Result<Vec<BNKline>, BNKlineError> {
    data.into_iter().map(Vec::try_into).collect()
}

async fn configure_binance_client() -> Result<RestApi, anyhow::Error> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    let rest_client = SpotRestApi::production(rest_conf);
    Ok(rest_client)
}

async fn fetch_binance_klines(
    rest_client: &RestApi,
    params: KlinesParams,
    pair_interval: &PairInterval,
) -> Result<Vec<Vec<KlinesItemInner>>, anyhow::Error> {
    let response_result = rest_client.klines(params).await;

    match response_result {
        Ok(r) => Ok(r.data().await?),
        Err(e) => {
            if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
                match conn_err {
                    connection_error::ConnectorClientError(msg) => {
                        log::error!(
                            "{} Client error: Check your request parameters. {}",
                            pair_interval,
                            msg
                        );
                    }
                    connection_error::TooManyRequestsError(msg) => {
                        log::error!(
                            "{} Rate limit exceeded. Please wait and try again. {}",
                            pair_interval,
                            msg
                        );
                    }
                    connection_error::RateLimitBanError(msg) => {
                        log::error!(
                            "{} IP address banned due to excessive rate limits. {}",
                            pair_interval,
                            msg
                        );
                    }
                    errors::ConnectorError::ServerError { msg, status_code } => {
                        log::error!(
                            "{} Server error: {} (status code: {:?})",
                            pair_interval,
                            msg,
                            status_code
                        );
                    }
                    errors::ConnectorError::NetworkError(msg) => {
                        log::error!(
                            "{} Network error: Check your internet connection. {}",
                            pair_interval,
                            msg
                        );
                    }
                    errors::ConnectorError::NotFoundError(msg) => {
                        log::error!("Resource not found. {}", msg);
                    }
                    connection_error::BadRequestError(msg) => {
                        log::error!(
                            "{} Bad request: Verify your input parameters. {}",
                            pair_interval,
                            msg
                        );
                    }
                    other => {
                        log::error!("Unexpected ConnectorError variant: {:?}", other);
                    }
                }
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(conn_err.to_string()))
                        .context(format!("Binance API call failed for {}", pair_interval)),
                )
            } else {
                log::error!(
                    "An unexpected error occurred for {}: {:#}",
                    pair_interval,
                    e
                );
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(e.to_string())).context(
                        format!("Unexpected error during API call for {}", pair_interval),
                    ),
                )
            }
        }
    }
}

/// Load all klines for one pair from `now - lookback_ms` to now, paging
/// forward in `klines_limit`-sized batches.
pub async fn load_klines(
    pair_interval: PairInterval,
    lookback_ms: i64,
) -> Result<OhlcvTimeSeries, anyhow::Error> {
    let rest_client = configure_binance_client().await?;

    let mut start_time = Utc::now().timestamp_millis() - lookback_ms;
    let mut all_klines: Vec<BNKline> = Vec::new();

    loop {
        let interval = try_interval_from_ms(pair_interval.interval_ms)
            .map_err(|e| anyhow!("{}: {}", pair_interval, e))?;
        let params = KlinesParams::builder(pair_interval.bn_name().to_string(), interval)
            .limit(BINANCE.limits.klines_limit)
            .start_time(Some(start_time))
            .end_time(None)
            .build()?;

        let new_klines = fetch_binance_klines(&rest_client, params, &pair_interval).await?;
        let batch = convert_klines(new_klines).map_err(|e| {
            anyhow::Error::new(e).context(format!("{} convert_klines failed", pair_interval))
        })?;

        let batch_len = batch.len();
        if let Some(last) = batch.last() {
            // Next page starts one interval after the last open time we got
            start_time = last.open_timestamp_ms + pair_interval.interval_ms;
        }
        all_klines.extend(batch);

        if batch_len < BINANCE.limits.klines_limit as usize {
            break; // reached the live edge
        }
    }

    if all_klines.is_empty() {
        bail!("{}: Binance returned zero klines", pair_interval);
    }
    if has_duplicate_kline_open_time(&all_klines) {
        bail!("{}: duplicate kline open times in API response", pair_interval);
    }

    build_series(all_klines, pair_interval)
}

fn build_series(
    klines: Vec<BNKline>,
    pair_interval: PairInterval,
) -> Result<OhlcvTimeSeries, anyhow::Error> {
    let first_kline_timestamp_ms = klines[0].open_timestamp_ms;

    let mut open_prices = Vec::with_capacity(klines.len());
    let mut high_prices = Vec::with_capacity(klines.len());
    let mut low_prices = Vec::with_capacity(klines.len());
    let mut close_prices = Vec::with_capacity(klines.len());

    for kline in &klines {
        if kline.high_price < kline.low_price {
            bail!(
                "{}: corrupt kline at {} (high {} < low {})",
                pair_interval,
                kline.open_timestamp_ms,
                kline.high_price,
                kline.low_price
            );
        }
        open_prices.push(kline.open_price);
        high_prices.push(kline.high_price);
        low_prices.push(kline.low_price);
        close_prices.push(kline.close_price);
    }

    Ok(OhlcvTimeSeries {
        pair_interval,
        first_kline_timestamp_ms,
        open_prices,
        high_prices,
        low_prices,
        close_prices,
    })
}

fn has_duplicate_kline_open_time(klines: &[BNKline]) -> bool {
    let mut seen_ids = HashSet::new();
    for kline in klines {
        if !seen_ids.insert(kline.open_timestamp_ms) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TimeUtils;

    fn kline(ts: i64, price: f64) -> BNKline {
        BNKline {
            open_timestamp_ms: ts,
            open_price: price,
            high_price: price + 1.0,
            low_price: price - 1.0,
            close_price: price,
        }
    }

    #[test]
    fn test_try_interval_from_ms_supported_subset() {
        assert!(try_interval_from_ms(TimeUtils::MS_IN_H).is_ok());
        assert!(try_interval_from_ms(TimeUtils::MS_IN_4_H).is_ok());
        assert!(try_interval_from_ms(TimeUtils::MS_IN_D).is_ok());
        assert!(try_interval_from_ms(12345).is_err());
    }

    #[test]
    fn test_duplicate_open_time_detected() {
        let klines = vec![kline(0, 10.0), kline(1000, 11.0), kline(0, 12.0)];
        assert!(has_duplicate_kline_open_time(&klines));
        assert!(!has_duplicate_kline_open_time(&klines[..2]));
    }

    #[test]
    fn test_build_series_columns_match() {
        let pair_interval = PairInterval {
            name: "BTCUSDT".to_string(),
            interval_ms: TimeUtils::MS_IN_H,
        };
        let klines = vec![kline(1_000, 10.0), kline(1_000 + TimeUtils::MS_IN_H, 12.0)];
        let series = build_series(klines, pair_interval).unwrap();
        assert_eq!(series.first_kline_timestamp_ms, 1_000);
        assert_eq!(series.open_prices, vec![10.0, 12.0]);
        assert_eq!(series.high_prices, vec![11.0, 13.0]);
        assert_eq!(series.low_prices, vec![9.0, 11.0]);
        assert_eq!(series.close_prices, vec![10.0, 12.0]);
    }

    #[test]
    fn test_build_series_rejects_corrupt_kline() {
        let pair_interval = PairInterval {
            name: "BTCUSDT".to_string(),
            interval_ms: TimeUtils::MS_IN_H,
        };
        let bad = BNKline {
            open_timestamp_ms: 0,
            open_price: 10.0,
            high_price: 5.0,
            low_price: 9.0,
            close_price: 10.0,
        };
        assert!(build_series(vec![bad], pair_interval).is_err());
    }
}
