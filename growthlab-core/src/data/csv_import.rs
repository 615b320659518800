//! CSV import provider for offline use.
//!
//! Reads `<dir>/<SYMBOL>.csv` with a header row. Recognised columns:
//! `date` (YYYY-MM-DD, required), `close`, `adj_close`, `dividend`.
//! A file without a `dividend` column is a price-only source.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DailyRow, DataError, DataProvider, DataSource, PriceHistory};
use crate::domain::DividendEvent;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    close: Option<f64>,
    adj_close: Option<f64>,
    dividend: Option<f64>,
}

/// Provider backed by a directory of per-symbol CSV files.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    fn read_file(
        path: &Path,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        include_actions: bool,
    ) -> Result<PriceHistory, DataError> {
        let csv_err = |reason: String| DataError::CsvImport {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| csv_err(e.to_string()))?;

        let has_dividend_column = reader
            .headers()
            .map_err(|e| csv_err(e.to_string()))?
            .iter()
            .any(|h| h == "dividend");

        let mut rows = Vec::new();
        let mut events = Vec::new();
        for record in reader.deserialize::<CsvRow>() {
            let row = record.map_err(|e| csv_err(e.to_string()))?;
            if row.date < start || row.date >= end {
                continue;
            }
            if let Some(amount) = row.dividend {
                if amount != 0.0 {
                    events.push(DividendEvent::new(row.date, amount));
                }
            }
            if row.close.is_none() && row.adj_close.is_none() {
                continue;
            }
            rows.push(DailyRow {
                date: row.date,
                close: row.close,
                adj_close: row.adj_close,
            });
        }

        if rows.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        rows.sort_by_key(|r| r.date);

        Ok(PriceHistory {
            symbol: symbol.to_string(),
            rows,
            dividends: (include_actions && has_dividend_column).then_some(events),
            source: DataSource::CsvImport,
        })
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        include_actions: bool,
    ) -> Result<PriceHistory, DataError> {
        let path = self.symbol_path(symbol);
        if !path.is_file() {
            tracing::debug!(symbol, path = %path.display(), "no CSV file for symbol");
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Self::read_file(&path, symbol, start, end, include_actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn write(dir: &Path, symbol: &str, body: &str) {
        std::fs::write(dir.join(format!("{symbol}.csv")), body).unwrap();
    }

    #[test]
    fn reads_prices_and_dividends_in_range() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "KO",
            "date,close,adj_close,dividend\n\
             2023-12-29,58.9,57.0,\n\
             2024-01-02,59.0,57.1,0\n\
             2024-01-03,59.5,57.6,0.46\n\
             2024-01-04,60.0,,\n",
        );
        let p = CsvProvider::new(tmp.path());
        let h = p
            .fetch_history("KO", d(2024, 1, 1), d(2024, 1, 4), true)
            .unwrap();
        assert_eq!(h.rows.len(), 2);
        assert_eq!(h.source, DataSource::CsvImport);
        let divs = h.dividends.unwrap();
        assert_eq!(divs, vec![DividendEvent::new(d(2024, 1, 3), 0.46)]);
    }

    #[test]
    fn file_without_dividend_column_is_price_only() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "SPY", "date,close\n2024-01-02,470.0\n");
        let p = CsvProvider::new(tmp.path());
        let h = p
            .fetch_history("SPY", d(2024, 1, 1), d(2024, 2, 1), true)
            .unwrap();
        assert!(h.dividends.is_none());
        assert_eq!(h.rows[0].adj_close, None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let p = CsvProvider::new(tmp.path());
        let err = p
            .fetch_history("ZZZZ", d(2024, 1, 1), d(2024, 2, 1), false)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn malformed_row_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "BAD", "date,close\nnot-a-date,1.0\n");
        let p = CsvProvider::new(tmp.path());
        let err = p
            .fetch_history("BAD", d(2024, 1, 1), d(2024, 2, 1), false)
            .unwrap_err();
        assert!(matches!(err, DataError::CsvImport { .. }));
    }
}
