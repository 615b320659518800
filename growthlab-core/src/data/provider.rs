//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV import,
//! synthetic, in-memory) so the pipelines can swap implementations and tests can
//! run without the network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DividendEvent, PricePoint, PriceSeries, SeriesError};

/// One daily row as returned by a provider, before any series is built.
///
/// Either price may be missing on a given day (holidays, partial rows).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
}

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("csv import failed for {path}: {reason}")]
    CsvImport { path: String, reason: String },

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Whether this error means "the provider had nothing for this symbol"
    /// rather than "the provider could not be asked".
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::SymbolNotFound { .. })
    }
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
    InMemory,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::CsvImport => "CSV import",
            DataSource::Synthetic => "synthetic",
            DataSource::InMemory => "in-memory",
        }
    }
}

/// Daily history for one symbol.
///
/// `dividends` is `None` when the provider answered with prices only (actions
/// were not requested, or the source has no dividend column). `Some(vec![])`
/// means dividends were looked up and none were paid in the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub rows: Vec<DailyRow>,
    pub dividends: Option<Vec<DividendEvent>>,
    pub source: DataSource,
}

impl PriceHistory {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw close prices for every row that has one.
    pub fn close_series(&self) -> Result<PriceSeries, SeriesError> {
        PriceSeries::new(
            self.rows
                .iter()
                .filter_map(|r| finite(r.close).map(|price| PricePoint::new(r.date, price)))
                .collect(),
        )
    }

    /// Adjusted close for every row, falling back to the raw close where the
    /// provider left the adjusted value out.
    pub fn adjusted_close_series(&self) -> Result<PriceSeries, SeriesError> {
        PriceSeries::new(
            self.rows
                .iter()
                .filter_map(|r| {
                    finite(r.adj_close)
                        .or_else(|| finite(r.close))
                        .map(|price| PricePoint::new(r.date, price))
                })
                .collect(),
        )
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Trait for data providers (Yahoo Finance, CSV import, etc).
///
/// The date range is half-open: rows on `start` are included, rows on `end`
/// are not. Providers do not validate the range; a range with no trading days
/// produces `SymbolNotFound`, the same as an unknown symbol.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily closes (and, if `include_actions`, dividend events) for a
    /// symbol over `[start, end)`.
    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        include_actions: bool,
    ) -> Result<PriceHistory, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, close: Option<f64>, adj: Option<f64>) -> DailyRow {
        DailyRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
            adj_close: adj,
        }
    }

    fn history(rows: Vec<DailyRow>) -> PriceHistory {
        PriceHistory {
            symbol: "TEST".into(),
            rows,
            dividends: None,
            source: DataSource::InMemory,
        }
    }

    #[test]
    fn close_series_skips_missing_and_nan() {
        let h = history(vec![
            row(2, Some(10.0), None),
            row(3, None, Some(9.0)),
            row(4, Some(f64::NAN), None),
            row(5, Some(12.0), None),
        ]);
        let s = h.close_series().unwrap();
        assert_eq!(s.prices().collect::<Vec<_>>(), vec![10.0, 12.0]);
    }

    #[test]
    fn adjusted_series_falls_back_to_close() {
        let h = history(vec![row(2, Some(10.0), Some(9.5)), row(3, Some(11.0), None)]);
        let s = h.adjusted_close_series().unwrap();
        assert_eq!(s.prices().collect::<Vec<_>>(), vec![9.5, 11.0]);
    }

    #[test]
    fn not_found_is_distinguished() {
        assert!(DataError::SymbolNotFound { symbol: "X".into() }.is_not_found());
        assert!(!DataError::NetworkUnreachable("down".into()).is_not_found());
    }
}
