//! Synthetic data provider for demos and offline development.
//!
//! Produces a deterministic random walk per symbol (seeded from a BLAKE3 hash
//! of the symbol) on weekdays, with a quarterly dividend on the first trading
//! day of March, June, September and December. The numbers are clearly fake
//! and tagged `DataSource::Synthetic`.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DailyRow, DataError, DataProvider, DataSource, PriceHistory};
use crate::domain::DividendEvent;

const DIVIDEND_MONTHS: [u32; 4] = [3, 6, 9, 12];

/// Deterministic random-walk provider.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    daily_range: f64,
    /// Quarterly dividend as a fraction of the prevailing price.
    dividend_yield: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            daily_range: 0.02,
            dividend_yield: 0.005,
        }
    }
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dividend_yield(mut self, quarterly_yield: f64) -> Self {
        self.dividend_yield = quarterly_yield.max(0.0);
        self
    }

    fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> (Vec<DailyRow>, Vec<DividendEvent>) {
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut rows = Vec::new();
        let mut dividends = Vec::new();
        let mut price = self.start_price;
        let mut paid_month: Option<(i32, u32)> = None;
        let mut current = start;

        while current < end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += chrono::Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-self.daily_range..self.daily_range);
            price *= 1.0 + daily_return;

            let month = (current.year(), current.month());
            if DIVIDEND_MONTHS.contains(&current.month()) && paid_month != Some(month) {
                dividends.push(DividendEvent::new(current, price * self.dividend_yield));
                paid_month = Some(month);
            }

            rows.push(DailyRow {
                date: current,
                close: Some(price),
                adj_close: Some(price),
            });
            current += chrono::Duration::days(1);
        }

        (rows, dividends)
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        include_actions: bool,
    ) -> Result<PriceHistory, DataError> {
        let (rows, dividends) = self.generate(symbol, start, end);
        if rows.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(PriceHistory {
            symbol: symbol.to_string(),
            rows,
            dividends: include_actions.then_some(dividends),
            source: DataSource::Synthetic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn deterministic_per_symbol() {
        let p = SyntheticProvider::new();
        let a = p.fetch_history("AAA", d(2024, 1, 1), d(2024, 3, 1), false).unwrap();
        let b = p.fetch_history("AAA", d(2024, 1, 1), d(2024, 3, 1), false).unwrap();
        let c = p.fetch_history("BBB", d(2024, 1, 1), d(2024, 3, 1), false).unwrap();
        assert_eq!(a.rows, b.rows);
        assert_ne!(a.rows, c.rows);
    }

    #[test]
    fn skips_weekends() {
        let p = SyntheticProvider::new();
        let h = p.fetch_history("AAA", d(2024, 1, 1), d(2024, 1, 15), false).unwrap();
        assert!(h
            .rows
            .iter()
            .all(|r| !matches!(r.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert_eq!(h.rows.len(), 10);
    }

    #[test]
    fn one_dividend_per_quarter_month() {
        let p = SyntheticProvider::new();
        let h = p.fetch_history("AAA", d(2023, 1, 1), d(2024, 1, 1), true).unwrap();
        let divs = h.dividends.unwrap();
        assert_eq!(divs.len(), 4);
        assert_eq!(divs[0].date, d(2023, 3, 1));
        assert!(divs.iter().all(|e| e.amount > 0.0));
    }

    #[test]
    fn empty_range_is_not_found() {
        let p = SyntheticProvider::new();
        let err = p
            .fetch_history("AAA", d(2024, 1, 6), d(2024, 1, 8), false)
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
