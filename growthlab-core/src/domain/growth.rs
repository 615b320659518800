use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Value of an investment on a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl GrowthPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}
