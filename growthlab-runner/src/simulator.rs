//! Single-ticker dividend reinvestment simulator.
//!
//! Buys `initial_investment / price[0]` shares on the first trading day, then
//! walks forward one day at a time. Each day records the holding's value
//! before any reinvestment; when a dividend is paid that day the cash buys
//! more shares at that day's close. Share count never decreases.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use growthlab_core::data::{DataProvider, DataSource};
use growthlab_core::domain::{DividendSchedule, GrowthPoint, PriceSeries};

use crate::error::PipelineError;
use crate::metrics::{self, MetricError};

/// Default lower bound on the simulator's initial investment.
pub const DEFAULT_MIN_INVESTMENT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub symbol: String,
    /// Investment start; also the CAGR start date.
    pub start: NaiveDate,
    /// Exclusive end of the fetched range.
    pub end: NaiveDate,
    pub initial_investment: f64,
}

impl SimulationRequest {
    /// Build and validate a request. A missing `end` means today.
    pub fn new(
        symbol: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
        initial_investment: f64,
        min_investment: f64,
    ) -> Result<Self, PipelineError> {
        let request = Self {
            symbol: symbol.trim().to_uppercase(),
            start,
            end: end.unwrap_or_else(|| Local::now().date_naive()),
            initial_investment,
        };
        request.validate(min_investment)?;
        Ok(request)
    }

    pub fn validate(&self, min_investment: f64) -> Result<(), PipelineError> {
        if self.symbol.trim().is_empty() {
            return Err(PipelineError::InvalidInput("enter a ticker symbol".into()));
        }
        if self.symbol.contains(',') {
            return Err(PipelineError::InvalidInput(format!(
                "the simulator takes one ticker, got '{}'",
                self.symbol
            )));
        }
        if !(self.initial_investment.is_finite() && self.initial_investment > 0.0) {
            return Err(PipelineError::InvalidInput(format!(
                "initial investment must be positive (got {})",
                self.initial_investment
            )));
        }
        if self.initial_investment < min_investment {
            return Err(PipelineError::InvalidInput(format!(
                "initial investment must be at least {min_investment} (got {})",
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

/// Result of walking one price series with dividend reinvestment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinvestmentOutcome {
    /// One point per trading day, valued before that day's reinvestment.
    pub growth: Vec<GrowthPoint>,
    pub initial_shares: f64,
    pub final_shares: f64,
    /// `final_shares * price[last]`.
    pub final_value: f64,
    /// Dividend dates that matched a trading day with a positive amount.
    pub dividends_reinvested: usize,
    /// Total cash reinvested over the walk.
    pub dividend_cash: f64,
    /// Dividend dates with no price observation; these are ignored.
    pub unmatched_dividends: usize,
}

/// Compounding reinvestment walk.
///
/// Not the comparator's additive adjustment: here each dividend buys
/// fractional shares, which then earn later dividends.
pub fn simulate_reinvestment(
    prices: &PriceSeries,
    dividends: &DividendSchedule,
    initial_investment: f64,
) -> Result<ReinvestmentOutcome, PipelineError> {
    let first = prices
        .first()
        .ok_or_else(|| PipelineError::InvalidInput("cannot simulate an empty price series".into()))?;
    if first.price <= 0.0 {
        return Err(PipelineError::InvalidInput(format!(
            "first close on {} is {}; cannot buy shares",
            first.date, first.price
        )));
    }
    if !(initial_investment.is_finite() && initial_investment >= 0.0) {
        return Err(PipelineError::InvalidInput(format!(
            "initial investment must be a non-negative amount (got {initial_investment})"
        )));
    }

    let initial_shares = initial_investment / first.price;
    let mut shares = initial_shares;
    let mut growth = Vec::with_capacity(prices.len());
    let mut dividends_reinvested = 0;
    let mut dividend_cash = 0.0;

    for point in prices {
        growth.push(GrowthPoint::new(point.date, shares * point.price));

        if let Some(amount) = dividends.amount_on(point.date) {
            if amount > 0.0 && point.price > 0.0 {
                let cash = shares * amount;
                shares += cash / point.price;
                dividend_cash += cash;
                dividends_reinvested += 1;
            }
        }
    }

    let unmatched_dividends = dividends
        .iter()
        .filter(|(date, _)| prices.price_on(*date).is_none())
        .count();
    if unmatched_dividends > 0 {
        tracing::warn!(
            count = unmatched_dividends,
            "dividends on non-trading days ignored"
        );
    }

    let last_price = prices.last().map_or(first.price, |p| p.price);

    Ok(ReinvestmentOutcome {
        growth,
        initial_shares,
        final_shares: shares,
        final_value: shares * last_price,
        dividends_reinvested,
        dividend_cash,
        unmatched_dividends,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub request: SimulationRequest,
    pub source: DataSource,
    pub first_trade_date: NaiveDate,
    pub last_trade_date: NaiveDate,
    /// From the requested start to the last trading day.
    pub years: f64,
    pub outcome: ReinvestmentOutcome,
    pub cagr: Result<f64, MetricError>,
}

impl SimulationReport {
    pub fn cagr_percent(&self) -> Option<f64> {
        self.cagr.as_ref().ok().map(|c| c * 100.0)
    }

    pub fn final_value(&self) -> f64 {
        self.outcome.final_value
    }
}

/// Run the simulator pipeline once.
pub fn run_simulation(
    provider: &dyn DataProvider,
    request: &SimulationRequest,
) -> Result<SimulationReport, PipelineError> {
    request.validate(0.0)?;
    tracing::info!(
        symbol = %request.symbol,
        start = %request.start,
        end = %request.end,
        provider = provider.name(),
        "running reinvestment simulation"
    );

    let symbols = [request.symbol.clone()];
    let history = provider
        .fetch_history(&request.symbol, request.start, request.end, true)
        .map_err(|e| {
            tracing::warn!(symbol = %request.symbol, error = %e, "fetch failed");
            PipelineError::no_data(&symbols, &e)
        })?;

    if history.is_empty() {
        return Err(PipelineError::NoData {
            symbols: symbols.to_vec(),
            detail: "no trading days in range".into(),
        });
    }

    let prices = match history.close_series() {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => {
            return Err(PipelineError::NoPriceData {
                symbol: request.symbol.clone(),
            })
        }
        Err(e) => {
            tracing::warn!(symbol = %request.symbol, error = %e, "close series rejected");
            return Err(PipelineError::NoPriceData {
                symbol: request.symbol.clone(),
            });
        }
    };

    let events = history
        .dividends
        .as_deref()
        .ok_or_else(|| PipelineError::NoDividendData {
            symbol: request.symbol.clone(),
        })?;
    let schedule = DividendSchedule::from_events(events);
    tracing::debug!(
        symbol = %request.symbol,
        days = prices.len(),
        dividends = schedule.len(),
        "simulating"
    );

    let outcome = simulate_reinvestment(&prices, &schedule, request.initial_investment)?;

    // Both exist: `prices` is non-empty.
    let (first_trade_date, last_trade_date) = match (prices.first(), prices.last()) {
        (Some(f), Some(l)) => (f.date, l.date),
        _ => {
            return Err(PipelineError::NoPriceData {
                symbol: request.symbol.clone(),
            })
        }
    };
    let years = metrics::elapsed_years(request.start, last_trade_date);
    let cagr = metrics::cagr(request.initial_investment, outcome.final_value, years);
    if let Err(e) = &cagr {
        tracing::warn!(symbol = %request.symbol, error = %e, "CAGR undefined");
    }

    Ok(SimulationReport {
        request: request.clone(),
        source: history.source,
        first_trade_date,
        last_trade_date,
        years,
        outcome,
        cagr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use growthlab_core::data::{DailyRow, InMemoryProvider};
    use growthlab_core::domain::DividendEvent;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn schedule(events: &[(NaiveDate, f64)]) -> DividendSchedule {
        let events: Vec<_> = events
            .iter()
            .map(|&(date, amount)| DividendEvent::new(date, amount))
            .collect();
        DividendSchedule::from_events(&events)
    }

    #[test]
    fn growth_point_is_recorded_before_reinvesting() {
        let prices = PriceSeries::from_pairs([(d(2024, 1, 2), 100.0), (d(2024, 1, 3), 100.0)])
            .unwrap();
        let out =
            simulate_reinvestment(&prices, &schedule(&[(d(2024, 1, 3), 5.0)]), 1000.0).unwrap();
        assert_eq!(out.growth[1].value, 1000.0);
        assert!((out.final_shares - 10.5).abs() < 1e-12);
        assert!((out.final_value - 1050.0).abs() < 1e-9);
        assert_eq!(out.dividends_reinvested, 1);
        assert!((out.dividend_cash - 50.0).abs() < 1e-9);
    }

    #[test]
    fn same_day_dividends_are_summed() {
        let prices = PriceSeries::from_pairs([(d(2024, 1, 2), 10.0)]).unwrap();
        let out = simulate_reinvestment(
            &prices,
            &schedule(&[(d(2024, 1, 2), 1.0), (d(2024, 1, 2), 1.0)]),
            100.0,
        )
        .unwrap();
        // 10 shares * 2.0 cash / 10.0 price = 2 more shares
        assert!((out.final_shares - 12.0).abs() < 1e-12);
        assert_eq!(out.dividends_reinvested, 1);
    }

    #[test]
    fn off_calendar_dividends_are_counted_not_applied() {
        let prices = PriceSeries::from_pairs([(d(2024, 1, 5), 10.0), (d(2024, 1, 8), 10.0)])
            .unwrap();
        // 2024-01-06 is a Saturday.
        let out =
            simulate_reinvestment(&prices, &schedule(&[(d(2024, 1, 6), 1.0)]), 100.0).unwrap();
        assert_eq!(out.final_shares, out.initial_shares);
        assert_eq!(out.unmatched_dividends, 1);
        assert_eq!(out.dividends_reinvested, 0);
    }

    #[test]
    fn zero_first_price_is_invalid_input() {
        let prices = PriceSeries::from_pairs([(d(2024, 1, 2), 0.0)]).unwrap();
        let err = simulate_reinvestment(&prices, &DividendSchedule::default(), 10.0).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[test]
    fn request_enforces_minimum_investment() {
        let err = SimulationRequest::new("aapl", d(2020, 1, 1), Some(d(2021, 1, 1)), 0.5, 1.0)
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
        let ok =
            SimulationRequest::new(" aapl ", d(2020, 1, 1), Some(d(2021, 1, 1)), 1.0, 1.0).unwrap();
        assert_eq!(ok.symbol, "AAPL");
    }

    #[test]
    fn request_defaults_end_to_today() {
        let req = SimulationRequest::new("AAPL", d(2020, 1, 1), None, 10.0, 1.0).unwrap();
        assert_eq!(req.end, Local::now().date_naive());
    }

    #[test]
    fn price_only_answer_is_no_dividend_data() {
        let provider =
            InMemoryProvider::new().with_closes("NODIV", &[(d(2024, 1, 2), 10.0)], None);
        let req =
            SimulationRequest::new("NODIV", d(2024, 1, 1), Some(d(2025, 1, 1)), 10.0, 1.0).unwrap();
        assert!(matches!(
            run_simulation(&provider, &req),
            Err(PipelineError::NoDividendData { .. })
        ));
    }

    #[test]
    fn rows_without_closes_are_no_price_data() {
        let provider = InMemoryProvider::new().with_rows(
            "HOLES",
            vec![DailyRow {
                date: d(2024, 1, 2),
                close: None,
                adj_close: None,
            }],
            Some(vec![]),
        );
        let req =
            SimulationRequest::new("HOLES", d(2024, 1, 1), Some(d(2025, 1, 1)), 10.0, 1.0).unwrap();
        assert!(matches!(
            run_simulation(&provider, &req),
            Err(PipelineError::NoPriceData { .. })
        ));
    }

    #[test]
    fn cagr_uses_requested_start() {
        let provider = InMemoryProvider::new().with_closes(
            "FLAT",
            &[(d(2021, 1, 1), 10.0), (d(2023, 1, 1), 10.0)],
            Some(vec![]),
        );
        let req =
            SimulationRequest::new("FLAT", d(2021, 1, 1), Some(d(2024, 1, 1)), 10.0, 1.0).unwrap();
        let report = run_simulation(&provider, &req).unwrap();
        assert_eq!(report.last_trade_date, d(2023, 1, 1));
        assert!((report.years - 730.0 / 365.25).abs() < 1e-12);
        assert_eq!(report.cagr, Ok(0.0));
    }

    #[test]
    fn non_positive_investment_is_rejected_whatever_the_minimum() {
        for amount in [0.0, -5.0, f64::NAN] {
            let err = SimulationRequest::new("KO", d(2024, 1, 1), Some(d(2024, 2, 1)), amount, 0.0)
                .unwrap_err();
            assert!(matches!(err, PipelineError::InvalidInput(_)), "{amount}: {err}");
        }

        let provider =
            InMemoryProvider::new().with_closes("KO", &[(d(2024, 1, 2), 60.0)], Some(vec![]));
        let zero = SimulationRequest {
            symbol: "KO".into(),
            start: d(2024, 1, 1),
            end: d(2024, 2, 1),
            initial_investment: 0.0,
        };
        assert!(matches!(
            run_simulation(&provider, &zero),
            Err(PipelineError::InvalidInput(_))
        ));
    }
}
