//! GrowthLab Runner — growth pipelines, metrics, configuration, export.
//!
//! This crate builds on `growthlab-core` to provide:
//! - CAGR and investment normalization
//! - The multi-ticker comparator (`run_comparison`)
//! - The dividend reinvestment simulator (`run_simulation`)
//! - TOML configuration and provider selection
//! - Display formatting and artifact export (JSON, CSV, Parquet)

pub mod comparator;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod metrics;
pub mod providers;
pub mod simulator;

pub use comparator::{
    add_cumulative_dividends, fetch_adjusted_closes, parse_symbols, run_comparison,
    ComparatorRequest, ComparisonReport, MissingTicker, TickerComparison, TickerFailure,
    ADDITIVE_DIVIDEND_MODEL,
};
pub use config::{ConfigError, GrowthConfig, ProviderConfig, ProviderSource};
pub use error::PipelineError;
pub use export::{save_comparison_artifacts, save_simulation_artifacts};
pub use format::{format_cagr, format_currency, format_percent};
pub use metrics::{cagr, MetricError};
pub use providers::build_provider;
pub use simulator::{
    run_simulation, simulate_reinvestment, ReinvestmentOutcome, SimulationReport,
    SimulationRequest,
};
