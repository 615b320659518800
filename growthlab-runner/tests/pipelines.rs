//! End-to-end pipeline scenarios against in-memory and synthetic providers.
//!
//! No test here touches the network.

use chrono::NaiveDate;
use growthlab_core::data::{InMemoryProvider, SyntheticProvider};
use growthlab_core::domain::DividendEvent;
use growthlab_runner::comparator::{run_comparison, ComparatorRequest};
use growthlab_runner::simulator::{run_simulation, SimulationRequest};
use growthlab_runner::{PipelineError, ADDITIVE_DIVIDEND_MODEL};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn annual_growth_provider() -> InMemoryProvider {
    InMemoryProvider::new().with_closes(
        "GROW",
        &[
            (d(2020, 1, 1), 100.0),
            (d(2021, 1, 1), 110.0),
            (d(2022, 1, 1), 121.0),
        ],
        Some(vec![]),
    )
}

// ── Scenario A: steady 10% a year, no dividends ──────────────────────

#[test]
fn simulator_steady_growth_without_dividends() {
    let req = SimulationRequest::new("GROW", d(2020, 1, 1), Some(d(2022, 1, 2)), 1000.0, 1.0)
        .unwrap();
    let report = run_simulation(&annual_growth_provider(), &req).unwrap();

    assert!((report.final_value() - 1210.0).abs() < 1e-9);
    assert_eq!(report.outcome.final_shares, report.outcome.initial_shares);
    assert_eq!(report.outcome.growth.len(), 3);
    let cagr = report.cagr.clone().unwrap();
    assert!((cagr - 0.10).abs() < 1e-3, "cagr = {cagr}");
}

#[test]
fn comparator_steady_growth_without_dividends() {
    let req = ComparatorRequest::parse("GROW", d(2020, 1, 1), d(2022, 1, 2), false, 1000.0)
        .unwrap();
    let report = run_comparison(&annual_growth_provider(), &req).unwrap();

    let grow = report.ticker("GROW").unwrap();
    assert_eq!(grow.investment_values[0].value, 1000.0);
    assert!((grow.final_value - 1210.0).abs() < 1e-9);
    let cagr = grow.cagr.clone().unwrap();
    assert!((cagr - 0.10).abs() < 1e-3, "cagr = {cagr}");
    assert!(report.missing.is_empty());
    assert!(report.failures.is_empty());
}

// ── Scenario B: one dividend on a flat price ─────────────────────────

#[test]
fn simulator_reinvests_single_dividend() {
    let provider = InMemoryProvider::new().with_closes(
        "FLAT",
        &[(d(2024, 3, 1), 100.0), (d(2024, 3, 4), 100.0)],
        Some(vec![DividendEvent::new(d(2024, 3, 4), 5.0)]),
    );
    let req =
        SimulationRequest::new("FLAT", d(2024, 3, 1), Some(d(2024, 4, 1)), 1000.0, 1.0).unwrap();
    let report = run_simulation(&provider, &req).unwrap();

    let growth = &report.outcome.growth;
    assert_eq!(growth.len(), 2);
    assert_eq!(growth[1].date, d(2024, 3, 4));
    assert_eq!(growth[1].value, 1000.0);
    assert!((report.outcome.final_shares - 10.5).abs() < 1e-12);
    assert!((report.final_value() - 1050.0).abs() < 1e-9);
}

#[test]
fn additive_model_differs_from_reinvestment() {
    let provider = InMemoryProvider::new().with_closes(
        "FLAT",
        &[(d(2024, 3, 1), 100.0), (d(2024, 3, 4), 100.0)],
        Some(vec![DividendEvent::new(d(2024, 3, 4), 5.0)]),
    );
    let req = ComparatorRequest::parse("FLAT", d(2024, 3, 1), d(2024, 4, 1), true, 1000.0).unwrap();
    let report = run_comparison(&provider, &req).unwrap();

    assert_eq!(report.dividend_model(), Some(ADDITIVE_DIVIDEND_MODEL));
    let flat = report.ticker("FLAT").unwrap();
    // 100 + 5 cumulative on day 2, so the curve reads 1050 on the payment day
    assert_eq!(flat.prices.prices().collect::<Vec<_>>(), vec![100.0, 105.0]);
    assert!((flat.final_value - 1050.0).abs() < 1e-9);
}

// ── Empty data ───────────────────────────────────────────────────────

#[test]
fn unknown_ticker_is_no_data_everywhere() {
    let provider = InMemoryProvider::new();

    let req = ComparatorRequest::parse("ZZZZ", d(2020, 1, 1), d(2021, 1, 1), false, 100.0).unwrap();
    match run_comparison(&provider, &req) {
        Err(PipelineError::NoData { symbols, .. }) => assert_eq!(symbols, vec!["ZZZZ"]),
        other => panic!("expected NoData, got {other:?}"),
    }

    let req =
        SimulationRequest::new("ZZZZ", d(2020, 1, 1), Some(d(2021, 1, 1)), 100.0, 1.0).unwrap();
    assert!(matches!(
        run_simulation(&provider, &req),
        Err(PipelineError::NoData { .. })
    ));
}

#[test]
fn range_outside_history_is_no_data() {
    let req = ComparatorRequest::parse("GROW", d(2010, 1, 1), d(2011, 1, 1), false, 100.0).unwrap();
    assert!(matches!(
        run_comparison(&annual_growth_provider(), &req),
        Err(PipelineError::NoData { .. })
    ));
}

// ── Partially missing batch ──────────────────────────────────────────

#[test]
fn missing_ticker_is_dropped_not_fatal() {
    let provider = InMemoryProvider::new().with_closes(
        "AAPL",
        &[(d(2022, 1, 3), 180.0), (d(2022, 1, 4), 179.0)],
        None,
    );
    let req =
        ComparatorRequest::parse("AAPL, BADTICKER", d(2022, 1, 1), d(2022, 2, 1), false, 1000.0)
            .unwrap();
    let report = run_comparison(&provider, &req).unwrap();

    let symbols: Vec<_> = report.tickers.iter().map(|t| t.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL"]);
    assert_eq!(report.prices.symbols, vec!["AAPL"]);
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].symbol, "BADTICKER");
}

// ── Synthetic provider ───────────────────────────────────────────────

#[test]
fn synthetic_runs_are_flagged_and_reproducible() {
    let provider = SyntheticProvider::new();
    let req = ComparatorRequest::parse("AAA, BBB", d(2021, 1, 1), d(2023, 1, 1), true, 500.0)
        .unwrap();
    let a = run_comparison(&provider, &req).unwrap();
    let b = run_comparison(&provider, &req).unwrap();

    assert!(a.has_synthetic);
    assert_eq!(a.tickers, b.tickers);
    assert_eq!(a.tickers.len(), 2);
    for t in &a.tickers {
        assert_eq!(t.investment_values.len(), t.prices.len());
        assert!(t.cagr.is_ok());
    }

    let sim = SimulationRequest::new("AAA", d(2021, 1, 1), Some(d(2023, 1, 1)), 500.0, 1.0)
        .unwrap();
    let report = run_simulation(&provider, &sim).unwrap();
    assert!(report.outcome.dividends_reinvested > 0);
    assert!(report.outcome.final_shares > report.outcome.initial_shares);
}
