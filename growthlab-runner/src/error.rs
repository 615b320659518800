//! Pipeline-level errors.
//!
//! A `PipelineError` aborts one run and is shown to the user as a single
//! message. Per-ticker problems (missing symbols, undefined CAGR) are not
//! errors at this level; they are carried inside the reports.

use thiserror::Error;

use growthlab_core::data::DataError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no data available for {} ({detail}); try different symbols or dates", .symbols.join(", "))]
    NoData { symbols: Vec<String>, detail: String },

    #[error("ticker {symbol} returned no price data in the selected range")]
    NoPriceData { symbol: String },

    #[error("ticker {symbol} returned prices without dividend data; reinvestment cannot be simulated")]
    NoDividendData { symbol: String },
}

impl PipelineError {
    /// Build `NoData` from the provider error that caused it.
    pub fn no_data(symbols: &[String], cause: &DataError) -> Self {
        let detail = if cause.is_not_found() {
            "ticker not found or no trading days in range".to_string()
        } else {
            cause.to_string()
        };
        PipelineError::NoData {
            symbols: symbols.to_vec(),
            detail,
        }
    }

    /// Short category tag for status bars and error history.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "INPUT",
            PipelineError::NoData { .. } => "NODATA",
            PipelineError::NoPriceData { .. } => "PRICE",
            PipelineError::NoDividendData { .. } => "DIV",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_message_names_symbols() {
        let err = PipelineError::no_data(
            &["ZZZZ".to_string()],
            &DataError::SymbolNotFound {
                symbol: "ZZZZ".into(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("ZZZZ"));
        assert!(msg.contains("not found"));
        assert_eq!(err.category(), "NODATA");
    }

    #[test]
    fn no_data_keeps_network_cause() {
        let err = PipelineError::no_data(
            &["AAPL".to_string()],
            &DataError::NetworkUnreachable("connection refused".into()),
        );
        assert!(err.to_string().contains("connection refused"));
    }
}
