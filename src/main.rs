#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use clap::Parser;
use eframe::NativeOptions;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use liquidity_hunter::config::APP_STATE_PATH;
use liquidity_hunter::{Cli, fetch_pair_data, run_app, write_timeseries_data_async};

fn main() -> eframe::Result {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Data Loading (Blocking)
    let rt = Runtime::new().expect("Failed to create Tokio runtime");
    let (timeseries_data, timeseries_signature) = rt.block_on(fetch_pair_data(&args));

    // D. Background Cache Write
    let cache_data = timeseries_data.clone();
    let interval_ms = args.timeframe.interval_ms();
    rt.spawn(async move {
        if let Err(e) =
            write_timeseries_data_async(timeseries_signature, cache_data, interval_ms).await
        {
            log::error!("⚠️  Failed to write cache: {}", e);
        }
    });

    // E. Run Native App
    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(APP_STATE_PATH)),
        ..Default::default()
    };

    eframe::run_native(
        "Liquidity Hunter - Estimated Liquidation Heatmap",
        options,
        Box::new(move |cc| Ok(run_app(cc, timeseries_data))),
    )
}
