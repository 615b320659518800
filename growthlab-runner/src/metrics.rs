//! Growth metrics — pure functions over scalars and price series.
//!
//! Nothing here fetches data or knows which pipeline is calling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use growthlab_core::domain::{GrowthPoint, PriceSeries};

/// Calendar days per year used for elapsed-time annualization.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// A metric whose inputs fall outside its domain.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum MetricError {
    #[error("undefined CAGR: start value must be positive (got {0})")]
    NonPositiveStartValue(f64),

    #[error("undefined CAGR: elapsed years must be positive (got {0:.4})")]
    NonPositiveYears(f64),

    #[error("undefined CAGR: negative end value {0} has no real fractional root")]
    NegativeEndValue(f64),

    #[error("undefined CAGR: result is not a finite number")]
    NonFinite,

    #[error("cannot normalize to an investment: first price is {0}")]
    NonPositiveFirstPrice(f64),

    #[error("cannot normalize an empty series")]
    EmptySeries,
}

/// Compound annual growth rate as a fraction (`0.10` is 10%).
///
/// `cagr = (end_value / start_value)^(1 / years) - 1`
pub fn cagr(start_value: f64, end_value: f64, years: f64) -> Result<f64, MetricError> {
    if !(start_value.is_finite() && start_value > 0.0) {
        return Err(MetricError::NonPositiveStartValue(start_value));
    }
    if !(years.is_finite() && years > 0.0) {
        return Err(MetricError::NonPositiveYears(years));
    }
    if end_value.is_nan() {
        return Err(MetricError::NonFinite);
    }
    if end_value < 0.0 {
        return Err(MetricError::NegativeEndValue(end_value));
    }
    let rate = (end_value / start_value).powf(1.0 / years) - 1.0;
    if rate.is_finite() {
        Ok(rate)
    } else {
        Err(MetricError::NonFinite)
    }
}

/// Years between two calendar dates at 365.25 days per year.
///
/// Negative when `end` precedes `start`; `cagr` rejects that.
pub fn elapsed_years(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days() as f64 / DAYS_PER_YEAR
}

/// Value of `initial_investment` placed at the first price, on every day of
/// the series: `initial * price[t] / price[0]`.
///
/// The first point equals `initial_investment` exactly.
pub fn normalize_to_investment(
    series: &PriceSeries,
    initial_investment: f64,
) -> Result<Vec<GrowthPoint>, MetricError> {
    let base = first_price(series)?;
    Ok(series
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let value = if i == 0 {
                initial_investment
            } else {
                initial_investment * (p.price / base)
            };
            GrowthPoint::new(p.date, value)
        })
        .collect())
}

/// `initial * price[last] / price[0]`.
pub fn final_investment_value(
    series: &PriceSeries,
    initial_investment: f64,
) -> Result<f64, MetricError> {
    let base = first_price(series)?;
    let last = series.last().map(|p| p.price).ok_or(MetricError::EmptySeries)?;
    Ok(initial_investment * (last / base))
}

fn first_price(series: &PriceSeries) -> Result<f64, MetricError> {
    let base = series.first().map(|p| p.price).ok_or(MetricError::EmptySeries)?;
    if base > 0.0 {
        Ok(base)
    } else {
        Err(MetricError::NonPositiveFirstPrice(base))
    }
}
