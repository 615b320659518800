//! Domain types shared by both pipelines.

pub mod dividend;
pub mod growth;
pub mod series;

pub use dividend::{DividendEvent, DividendSchedule};
pub use growth::GrowthPoint;
pub use series::{PricePoint, PriceSeries, SeriesError};
