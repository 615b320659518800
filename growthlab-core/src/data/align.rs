//! Multi-symbol time alignment.
//!
//! Given one price series per symbol, build a single table on the union of
//! their dates. A symbol with no observation on a date gets an empty cell;
//! nothing is forward-filled.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;

/// Date-indexed price table, one column per symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    /// The common date axis (sorted ascending).
    pub dates: Vec<NaiveDate>,
    /// Column order, as given to [`PriceTable::align`].
    pub symbols: Vec<String>,
    /// `columns[i][j]` is `symbols[i]` on `dates[j]`.
    pub columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Align series onto the union of their dates.
    pub fn align(series: &[(String, PriceSeries)]) -> Self {
        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|(_, s)| s.dates())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let index: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let columns = series
            .iter()
            .map(|(_, s)| {
                let mut column = vec![None; dates.len()];
                for point in s {
                    column[index[&point.date]] = Some(point.price);
                }
                column
            })
            .collect();

        Self {
            dates,
            symbols: series.iter().map(|(sym, _)| sym.clone()).collect(),
            columns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterate rows as `(date, cells)`; cells follow `symbols` order.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, Vec<Option<f64>>)> + '_ {
        self.dates
            .iter()
            .enumerate()
            .map(move |(j, date)| (*date, self.columns.iter().map(|c| c[j]).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(points: &[(u32, f64)]) -> PriceSeries {
        PriceSeries::from_pairs(points.iter().map(|&(day, p)| (d(day), p))).unwrap()
    }

    #[test]
    fn union_of_dates_with_gaps() {
        let table = PriceTable::align(&[
            ("AAA".into(), series(&[(2, 1.0), (4, 2.0)])),
            ("BBB".into(), series(&[(3, 5.0), (4, 6.0)])),
        ]);
        assert_eq!(table.dates, vec![d(2), d(3), d(4)]);
        assert_eq!(table.column("AAA").unwrap(), &[Some(1.0), None, Some(2.0)]);
        assert_eq!(table.column("BBB").unwrap(), &[None, Some(5.0), Some(6.0)]);
    }

    #[test]
    fn keeps_symbol_order() {
        let table = PriceTable::align(&[
            ("ZZZ".into(), series(&[(2, 1.0)])),
            ("AAA".into(), series(&[(2, 1.0)])),
        ]);
        assert_eq!(table.symbols, vec!["ZZZ", "AAA"]);
    }

    #[test]
    fn rows_iterate_in_date_order() {
        let table = PriceTable::align(&[("AAA".into(), series(&[(2, 1.0), (3, 2.0)]))]);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows, vec![(d(2), vec![Some(1.0)]), (d(3), vec![Some(2.0)])]);
    }

    #[test]
    fn empty_input_is_empty_table() {
        assert!(PriceTable::align(&[]).is_empty());
    }
}
