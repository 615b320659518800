//! Chronological price series.
//!
//! A `PriceSeries` is one (date, price) pair per trading day with a known
//! price, strictly increasing by date. It is validated once at construction
//! and immutable afterwards, so downstream code can index `[0]` and `last()`
//! without re-checking ordering.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single observed price on a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Errors raised while building a series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("dates out of order: {date} follows {previous}")]
    OutOfOrder { previous: NaiveDate, date: NaiveDate },

    #[error("duplicate observation for {0}")]
    DuplicateDate(NaiveDate),

    #[error("non-finite price {price} on {date}")]
    NonFinitePrice { date: NaiveDate, price: f64 },
}

/// Ordered, immutable sequence of daily prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting unordered dates, duplicates and NaN/inf prices.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for pair in points.windows(2) {
            let (prev, next) = (pair[0].date, pair[1].date);
            if next == prev {
                return Err(SeriesError::DuplicateDate(next));
            }
            if next < prev {
                return Err(SeriesError::OutOfOrder {
                    previous: prev,
                    date: next,
                });
            }
        }
        if let Some(bad) = points.iter().find(|p| !p.price.is_finite()) {
            return Err(SeriesError::NonFinitePrice {
                date: bad.date,
                price: bad.price,
            });
        }
        Ok(Self { points })
    }

    /// Build a series from `(date, price)` tuples.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, price)| PricePoint { date, price })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    /// Price observed on `date`, if that date is a trading day in the series.
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.date.cmp(&date))
            .ok()
            .map(|i| self.points[i].price)
    }

    /// Apply `f` to every price, keeping the dates.
    ///
    /// `f` receives the point so adjustments can depend on the date.
    pub fn map_prices<F>(&self, mut f: F) -> Result<Self, SeriesError>
    where
        F: FnMut(&PricePoint) -> f64,
    {
        Self::new(
            self.points
                .iter()
                .map(|p| PricePoint {
                    date: p.date,
                    price: f(p),
                })
                .collect(),
        )
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = SeriesError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
