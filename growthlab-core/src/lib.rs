//! GrowthLab Core — domain types, market data providers, alignment, logging.
//!
//! This crate holds everything the pipelines need before any metric is computed:
//! - Domain types (price series, dividend events, growth points)
//! - The `DataProvider` trait and its implementations (Yahoo Finance, CSV import,
//!   synthetic, in-memory)
//! - Circuit breaker for the remote provider
//! - Multi-symbol alignment into a single date-indexed price table
//! - `tracing` subscriber setup shared by the CLI and TUI

pub mod data;
pub mod domain;
pub mod logging;
