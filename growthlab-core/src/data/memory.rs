//! In-memory provider: serves pre-built histories, honouring the date range
//! and the actions flag exactly like the remote providers do.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::provider::{DailyRow, DataError, DataProvider, DataSource, PriceHistory};
use crate::domain::DividendEvent;

#[derive(Debug, Clone)]
struct Entry {
    rows: Vec<DailyRow>,
    dividends: Option<Vec<DividendEvent>>,
}

/// Provider holding histories keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    entries: HashMap<String, Entry>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register close prices (used as both raw and adjusted close) and an
    /// optional dividend column for `symbol`.
    pub fn with_closes(
        mut self,
        symbol: &str,
        closes: &[(NaiveDate, f64)],
        dividends: Option<Vec<DividendEvent>>,
    ) -> Self {
        let rows = closes
            .iter()
            .map(|&(date, price)| DailyRow {
                date,
                close: Some(price),
                adj_close: Some(price),
            })
            .collect();
        self.entries
            .insert(symbol.to_string(), Entry { rows, dividends });
        self
    }

    /// Register fully specified rows for `symbol`.
    pub fn with_rows(
        mut self,
        symbol: &str,
        rows: Vec<DailyRow>,
        dividends: Option<Vec<DividendEvent>>,
    ) -> Self {
        self.entries
            .insert(symbol.to_string(), Entry { rows, dividends });
        self
    }
}

impl DataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        include_actions: bool,
    ) -> Result<PriceHistory, DataError> {
        let not_found = || DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        };
        let entry = self.entries.get(symbol).ok_or_else(not_found)?;
        let in_range = |date: NaiveDate| date >= start && date < end;

        let rows: Vec<DailyRow> = entry.rows.iter().filter(|r| in_range(r.date)).copied().collect();
        if rows.is_empty() {
            return Err(not_found());
        }

        let dividends = if include_actions {
            entry
                .dividends
                .as_ref()
                .map(|events| events.iter().filter(|e| in_range(e.date)).copied().collect())
        } else {
            None
        };

        Ok(PriceHistory {
            symbol: symbol.to_string(),
            rows,
            dividends,
            source: DataSource::InMemory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn filters_half_open_range() {
        let p = InMemoryProvider::new().with_closes(
            "AAA",
            &[(d(2), 1.0), (d(3), 2.0), (d(4), 3.0)],
            Some(vec![DividendEvent::new(d(4), 0.1)]),
        );
        let h = p.fetch_history("AAA", d(2), d(4), true).unwrap();
        assert_eq!(h.rows.len(), 2);
        assert_eq!(h.dividends, Some(vec![]));
    }

    #[test]
    fn dividends_hidden_unless_requested() {
        let p = InMemoryProvider::new().with_closes("AAA", &[(d(2), 1.0)], Some(vec![]));
        let h = p.fetch_history("AAA", d(1), d(31), false).unwrap();
        assert!(h.dividends.is_none());
    }

    #[test]
    fn unknown_symbol_is_not_found() {
        let p = InMemoryProvider::new();
        assert!(p.fetch_history("ZZZZ", d(1), d(31), false).unwrap_err().is_not_found());
    }
}
