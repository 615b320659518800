//! Market data: provider trait, concrete providers, alignment.

pub mod align;
pub mod circuit_breaker;
pub mod csv_import;
pub mod memory;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use align::PriceTable;
pub use circuit_breaker::CircuitBreaker;
pub use csv_import::CsvProvider;
pub use memory::InMemoryProvider;
pub use provider::{DailyRow, DataError, DataProvider, DataSource, PriceHistory};
pub use synthetic::SyntheticProvider;
pub use yahoo::{normalize_timestamp, YahooConfig, YahooProvider};
