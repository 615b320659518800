//! Yahoo Finance data provider.
//!
//! Fetches daily closes, adjusted closes and dividend events from Yahoo's v8
//! chart API. Handles retries with exponential backoff, response parsing, and
//! the circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV import path is the fallback when Yahoo is unavailable.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DailyRow, DataError, DataProvider, DataSource, PriceHistory};
use crate::domain::DividendEvent;

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
    events: Option<Events>,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct Events {
    dividends: Option<HashMap<String, DividendData>>,
}

#[derive(Debug, Deserialize)]
struct DividendData {
    amount: f64,
    date: i64,
}

/// Tunables for the HTTP client.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>, config: YahooConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: config.max_retries,
            base_delay: config.base_delay,
        })
    }

    /// Query parameters for a symbol and half-open date range.
    fn chart_query(start: NaiveDate, end: NaiveDate, include_actions: bool) -> Vec<(&'static str, String)> {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let mut query = vec![
            ("period1", start_ts.to_string()),
            ("period2", end_ts.to_string()),
            ("interval", "1d".to_string()),
            ("includeAdjustedClose", "true".to_string()),
        ];
        if include_actions {
            query.push(("events", "div".to_string()));
        }
        query
    }

    /// Parse the chart API response into a history.
    fn parse_response(
        symbol: &str,
        resp: ChartResponse,
        include_actions: bool,
    ) -> Result<PriceHistory, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // No timestamps: the symbol exists but has no trading days in range.
        let timestamps = data.timestamp.unwrap_or_default();
        let offset = data.meta.gmtoffset;

        let closes = data
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose)
            .unwrap_or_default();

        let mut rows = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = normalize_timestamp(ts, offset).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;
            let close = closes.get(i).copied().flatten();
            let adj_close = adj_closes.get(i).copied().flatten();

            // Rows with no price at all are non-trading placeholders.
            if close.is_none() && adj_close.is_none() {
                continue;
            }
            rows.push(DailyRow {
                date,
                close,
                adj_close,
            });
        }

        if rows.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let dividends = if include_actions {
            let mut events = Vec::new();
            for div in data
                .events
                .and_then(|e| e.dividends)
                .into_iter()
                .flat_map(|m| m.into_values())
            {
                let date = normalize_timestamp(div.date, offset).ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid dividend timestamp: {}", div.date))
                })?;
                events.push(DividendEvent::new(date, div.amount));
            }
            events.sort_by_key(|e| e.date);
            Some(events)
        } else {
            None
        };

        Ok(PriceHistory {
            symbol: symbol.to_string(),
            rows,
            dividends,
            source: DataSource::YahooFinance,
        })
    }

    /// Execute a single HTTP request with retry and circuit breaker logic.
    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        include_actions: bool,
    ) -> Result<PriceHistory, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let url = format!("{CHART_URL}/{}", encode_symbol(symbol));
        let query = Self::chart_query(start, end, include_actions);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.base_delay, attempt);
                tracing::debug!(symbol, attempt, ?delay, "retrying Yahoo request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(&url).query(&query).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                // Yahoo answers unknown symbols with 404 and a JSON error body.
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let chart: ChartResponse = resp.json().map_err(|e| {
                DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
            })?;

            let history = Self::parse_response(symbol, chart, include_actions)?;
            self.circuit_breaker.record_success();
            return Ok(history);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        include_actions: bool,
    ) -> Result<PriceHistory, DataError> {
        tracing::debug!(symbol, %start, %end, include_actions, "fetching from Yahoo");
        self.fetch_with_retry(symbol, start, end, include_actions)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

/// Delay before retry `attempt` (1-based): `base * 2^(attempt - 1)`, saturating.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

/// Convert a provider epoch timestamp to the exchange's calendar date.
///
/// Yahoo stamps daily bars at the session open in UTC; shifting by the
/// exchange's GMT offset before taking the date keeps a bar on the day it
/// traded. All date arithmetic downstream is on the resulting `NaiveDate`.
pub fn normalize_timestamp(ts: i64, gmtoffset_secs: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(ts.checked_add(gmtoffset_secs)?, 0)
        .map(|dt| dt.naive_utc().date())
}

/// Percent-encode the handful of characters that appear in index and class
/// share tickers (`^GSPC`, `BRK.B`, `RDS/A`).
fn encode_symbol(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    for c in symbol.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' | '_' | '=' => out.push(c),
            other => {
                let mut buf = [0u8; 4];
                for b in other.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{b:02X}"));
                }
            }
        }
    }
    out
}
