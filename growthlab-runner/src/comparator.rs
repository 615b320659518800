//! Multi-ticker comparator.
//!
//! Fetches adjusted closes for several tickers, optionally folds dividends in
//! with the simplified additive model, normalizes every ticker to the same
//! initial investment and computes a price-based CAGR per ticker.
//!
//! Failure policy:
//! - no ticker returned data → `PipelineError::NoData`, nothing else runs
//! - a ticker the provider doesn't know → listed in `missing`, others continue
//! - a ticker whose first price is zero → listed in `failures`, others continue
//! - an undefined CAGR → carried in that ticker's `cagr` field only

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use growthlab_core::data::{DataError, DataProvider, DataSource, PriceTable};
use growthlab_core::domain::{
    DividendEvent, DividendSchedule, GrowthPoint, PriceSeries, SeriesError,
};

use crate::error::PipelineError;
use crate::metrics::{self, MetricError};

/// Label shown wherever dividend-adjusted comparator prices are displayed.
pub const ADDITIVE_DIVIDEND_MODEL: &str =
    "simplified additive model: cumulative dividends added to adjusted close, not a total-return series";

/// User parameters for one comparator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparatorRequest {
    pub symbols: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub include_dividends: bool,
    pub initial_investment: f64,
}

impl ComparatorRequest {
    /// Build a request from the raw comma-separated symbol input.
    pub fn parse(
        symbols_input: &str,
        start: NaiveDate,
        end: NaiveDate,
        include_dividends: bool,
        initial_investment: f64,
    ) -> Result<Self, PipelineError> {
        let request = Self {
            symbols: parse_symbols(symbols_input)?,
            start,
            end,
            include_dividends,
            initial_investment,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.symbols.is_empty() {
            return Err(PipelineError::InvalidInput(
                "enter at least one ticker symbol".into(),
            ));
        }
        if self.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(PipelineError::InvalidInput(
                "ticker symbols must not be blank".into(),
            ));
        }
        if !(self.initial_investment.is_finite() && self.initial_investment >= 0.0) {
            return Err(PipelineError::InvalidInput(format!(
                "initial investment must be a non-negative amount (got {})",
                self.initial_investment
            )));
        }
        if self.end <= self.start {
            return Err(PipelineError::InvalidInput(format!(
                "end date {} must be after start date {}",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

/// Split a comma-separated list into trimmed, upper-cased, de-duplicated
/// symbols. An empty entry (`"AAPL,,MSFT"`, `""`) is an input error.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, PipelineError> {
    let mut symbols: Vec<String> = Vec::new();
    for raw in input.split(',') {
        let symbol = raw.trim();
        if symbol.is_empty() {
            return Err(PipelineError::InvalidInput(format!(
                "empty ticker symbol in '{}'",
                input.trim()
            )));
        }
        let symbol = symbol.to_uppercase();
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    Ok(symbols)
}

/// A requested ticker that contributed nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingTicker {
    pub symbol: String,
    pub reason: String,
}

/// Adjusted-close series for every ticker the provider answered.
#[derive(Debug, Clone)]
pub struct FetchedPrices {
    /// In request order.
    pub series: Vec<(String, PriceSeries)>,
    pub missing: Vec<MissingTicker>,
    pub has_synthetic: bool,
}

/// Fetch adjusted closes for each symbol over `[start, end)`.
///
/// The range is passed to the provider untouched. With `include_dividends`,
/// each series goes through [`add_cumulative_dividends`]; a ticker without a
/// dividend column is left unadjusted.
pub fn fetch_adjusted_closes(
    provider: &dyn DataProvider,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    include_dividends: bool,
) -> Result<FetchedPrices, PipelineError> {
    let mut series = Vec::with_capacity(symbols.len());
    let mut missing = Vec::new();
    let mut cause: Option<DataError> = None;
    let mut has_synthetic = false;

    for symbol in symbols {
        let history = match provider.fetch_history(symbol, start, end, include_dividends) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "ticker skipped");
                missing.push(MissingTicker {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                });
                // Keep the most informative cause for a possible NoData.
                if cause.as_ref().map_or(true, |c| c.is_not_found()) {
                    cause = Some(e);
                }
                continue;
            }
        };

        let adjusted = match history.adjusted_close_series() {
            Ok(s) if !s.is_empty() => s,
            Ok(_) => {
                tracing::warn!(symbol = %symbol, "ticker has rows but no prices");
                missing.push(MissingTicker {
                    symbol: symbol.clone(),
                    reason: "no adjusted close prices".into(),
                });
                continue;
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "ticker has an invalid series");
                missing.push(MissingTicker {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let adjusted = match (include_dividends, &history.dividends) {
            (true, Some(events)) => match add_cumulative_dividends(&adjusted, events) {
                Ok(s) => s,
                Err(e) => {
                    missing.push(MissingTicker {
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            },
            (true, None) => {
                tracing::warn!(symbol = %symbol, "no dividend data, prices left unadjusted");
                adjusted
            }
            (false, _) => adjusted,
        };

        tracing::debug!(symbol = %symbol, days = adjusted.len(), source = history.source.label(), "fetched");
        has_synthetic |= history.source == DataSource::Synthetic;
        series.push((symbol.clone(), adjusted));
    }

    if series.is_empty() {
        let cause = cause.unwrap_or_else(|| DataError::SymbolNotFound {
            symbol: symbols.join(", "),
        });
        return Err(PipelineError::no_data(symbols, &cause));
    }

    Ok(FetchedPrices {
        series,
        missing,
        has_synthetic,
    })
}

/// Simplified additive dividend model.
///
/// Day *i* becomes `adjusted_close[i] + (sum of dividends paid on or before
/// date[i])`. This is not reinvestment and not a total-return index; it only
/// adds back the cash paid so far. The compounding model lives in
/// [`crate::simulator::simulate_reinvestment`].
pub fn add_cumulative_dividends(
    series: &PriceSeries,
    dividends: &[DividendEvent],
) -> Result<PriceSeries, SeriesError> {
    let schedule = DividendSchedule::from_events(dividends);
    if schedule.is_empty() {
        return Ok(series.clone());
    }
    series.map_prices(|p| p.price + schedule.cumulative_through(p.date))
}

/// Comparator results for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerComparison {
    pub symbol: String,
    /// Adjusted close (dividend-adjusted when requested).
    pub prices: PriceSeries,
    pub investment_values: Vec<GrowthPoint>,
    pub cagr: Result<f64, MetricError>,
    pub final_value: f64,
}

impl TickerComparison {
    pub fn cagr_percent(&self) -> Option<f64> {
        self.cagr.as_ref().ok().map(|c| c * 100.0)
    }
}

/// Normalized curve, price CAGR and final value for one ticker.
///
/// `years` comes from the requested range, not from the observed dates.
pub fn compare_series(
    symbol: &str,
    prices: PriceSeries,
    initial_investment: f64,
    years: f64,
) -> Result<TickerComparison, MetricError> {
    let (start_price, end_price) = prices
        .first()
        .zip(prices.last())
        .map(|(f, l)| (f.price, l.price))
        .ok_or(MetricError::EmptySeries)?;
    let investment_values = metrics::normalize_to_investment(&prices, initial_investment)?;
    let final_value = metrics::final_investment_value(&prices, initial_investment)?;
    let cagr = metrics::cagr(start_price, end_price, years);

    Ok(TickerComparison {
        symbol: symbol.to_string(),
        prices,
        investment_values,
        cagr,
        final_value,
    })
}

/// A ticker that had data but could not be normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerFailure {
    pub symbol: String,
    pub error: MetricError,
}

/// Everything the interface renders after a comparator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub request: ComparatorRequest,
    /// Years between the requested start and end dates.
    pub years: f64,
    /// Raw adjusted-close table for every ticker that returned data.
    pub prices: PriceTable,
    pub tickers: Vec<TickerComparison>,
    pub failures: Vec<TickerFailure>,
    pub missing: Vec<MissingTicker>,
    pub has_synthetic: bool,
}

impl ComparisonReport {
    pub fn ticker(&self, symbol: &str) -> Option<&TickerComparison> {
        self.tickers.iter().find(|t| t.symbol == symbol)
    }

    /// Label for the dividend model in effect, if any.
    pub fn dividend_model(&self) -> Option<&'static str> {
        self.request
            .include_dividends
            .then_some(ADDITIVE_DIVIDEND_MODEL)
    }
}

/// Run the comparator pipeline once.
pub fn run_comparison(
    provider: &dyn DataProvider,
    request: &ComparatorRequest,
) -> Result<ComparisonReport, PipelineError> {
    request.validate()?;
    tracing::info!(
        symbols = %request.symbols.join(","),
        start = %request.start,
        end = %request.end,
        include_dividends = request.include_dividends,
        provider = provider.name(),
        "running comparison"
    );

    let fetched = fetch_adjusted_closes(
        provider,
        &request.symbols,
        request.start,
        request.end,
        request.include_dividends,
    )?;

    let years = metrics::elapsed_years(request.start, request.end);
    let prices = PriceTable::align(&fetched.series);

    let mut tickers = Vec::with_capacity(fetched.series.len());
    let mut failures = Vec::new();
    for (symbol, series) in fetched.series {
        match compare_series(&symbol, series, request.initial_investment, years) {
            Ok(comparison) => {
                if let Err(e) = &comparison.cagr {
                    tracing::warn!(symbol = %symbol, error = %e, "CAGR undefined");
                }
                tickers.push(comparison);
            }
            Err(error) => {
                tracing::warn!(symbol = %symbol, error = %error, "ticker could not be normalized");
                failures.push(TickerFailure { symbol, error });
            }
        }
    }

    Ok(ComparisonReport {
        request: request.clone(),
        years,
        prices,
        tickers,
        failures,
        missing: fetched.missing,
        has_synthetic: fetched.has_synthetic,
    })
}
