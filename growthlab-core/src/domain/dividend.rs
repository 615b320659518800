//! Dividend events and the per-date schedule built from them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cash dividend paid per share on a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub date: NaiveDate,
    pub amount: f64,
}

impl DividendEvent {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }

    /// Only strictly positive, finite amounts move money.
    pub fn is_payable(&self) -> bool {
        self.amount.is_finite() && self.amount > 0.0
    }
}

/// Payable dividends keyed by date.
///
/// Events on the same date are summed. Zero, negative and non-finite amounts
/// are dropped at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividendSchedule {
    by_date: BTreeMap<NaiveDate, f64>,
}

impl DividendSchedule {
    pub fn from_events(events: &[DividendEvent]) -> Self {
        let mut by_date = BTreeMap::new();
        for event in events.iter().filter(|e| e.is_payable()) {
            *by_date.entry(event.date).or_insert(0.0) += event.amount;
        }
        Self { by_date }
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Number of distinct payment dates.
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn amount_on(&self, date: NaiveDate) -> Option<f64> {
        self.by_date.get(&date).copied()
    }

    /// Sum of all payable dividends dated on or before `date`.
    pub fn cumulative_through(&self, date: NaiveDate) -> f64 {
        self.by_date.range(..=date).map(|(_, amount)| amount).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.by_date.iter().map(|(d, a)| (*d, *a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    #[test]
    fn same_day_events_are_summed() {
        let schedule = DividendSchedule::from_events(&[
            DividendEvent::new(d(3, 1), 0.25),
            DividendEvent::new(d(3, 1), 0.10),
        ]);
        assert_eq!(schedule.len(), 1);
        assert!((schedule.amount_on(d(3, 1)).unwrap() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn non_payable_amounts_are_dropped() {
        let schedule = DividendSchedule::from_events(&[
            DividendEvent::new(d(3, 1), 0.0),
            DividendEvent::new(d(4, 1), -1.0),
            DividendEvent::new(d(5, 1), f64::NAN),
        ]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn cumulative_is_inclusive() {
        let schedule = DividendSchedule::from_events(&[
            DividendEvent::new(d(3, 1), 1.0),
            DividendEvent::new(d(6, 1), 2.0),
        ]);
        assert_eq!(schedule.cumulative_through(d(2, 28)), 0.0);
        assert_eq!(schedule.cumulative_through(d(3, 1)), 1.0);
        assert_eq!(schedule.cumulative_through(d(5, 31)), 1.0);
        assert_eq!(schedule.cumulative_through(d(6, 1)), 3.0);
    }
}
