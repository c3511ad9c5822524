// Data loading and caching
pub mod pre_main_async;
pub mod timeseries;

// Re-export commonly used types
pub use pre_main_async::fetch_pair_data;
pub use timeseries::TimeSeriesCollection;
pub use timeseries::local_cache::write_timeseries_data_async;
