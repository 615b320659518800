//! Application state — single-owner, main-thread only.
//!
//! Runs are synchronous: an input handler only marks a run as pending, the
//! main loop draws one frame with the "running" status and then executes it.

use std::collections::VecDeque;

use chrono::{NaiveDate, NaiveDateTime};

use growthlab_core::data::{DataProvider, DataSource};
use growthlab_runner::comparator::{run_comparison, ComparatorRequest, ComparisonReport};
use growthlab_runner::config::{ComparatorDefaults, GrowthConfig, SimulatorDefaults};
use growthlab_runner::simulator::{run_simulation, SimulationReport, SimulationRequest};
use growthlab_runner::{format_cagr, format_currency, PipelineError};

const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Compare,
    Reinvest,
    Chart,
    Help,
}

impl Panel {
    const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            Panel::Compare => 0,
            Panel::Reinvest => 1,
            Panel::Chart => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Compare),
            1 => Some(Panel::Reinvest),
            2 => Some(Panel::Chart),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Compare => "Compare",
            Panel::Reinvest => "Reinvest",
            Panel::Chart => "Chart",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Compare)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Compare)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    /// Short tag: INPUT, NODATA, PRICE, DIV, PROV.
    pub category: &'static str,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    ErrorHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Compare,
    Reinvest,
}

/// What the Chart panel plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    /// Comparator: value of the initial investment per ticker.
    Investment,
    /// Comparator: adjusted close per ticker.
    Price,
    /// Simulator: growth curve with dividends reinvested.
    Reinvestment,
}

impl ChartView {
    pub fn next(self) -> ChartView {
        match self {
            ChartView::Investment => ChartView::Price,
            ChartView::Price => ChartView::Reinvestment,
            ChartView::Reinvestment => ChartView::Investment,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartView::Investment => "Investment value",
            ChartView::Price => "Adjusted close",
            ChartView::Reinvestment => "Reinvested value",
        }
    }
}

/// One plotted line; x is days since `ChartData::origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub origin: NaiveDate,
    pub last: NaiveDate,
    pub series: Vec<ChartSeries>,
}

// ── Forms ────────────────────────────────────────────────────────────

/// Cursor and text access shared by the input forms.
pub trait Form {
    fn labels(&self) -> &'static [&'static str];
    fn cursor(&self) -> usize;
    fn set_cursor(&mut self, cursor: usize);
    /// Text of the focused field, or `None` for a toggle.
    fn text_mut(&mut self) -> Option<&mut String>;
    /// Flip the focused toggle; no-op on text fields.
    fn toggle(&mut self) {}

    fn move_down(&mut self) {
        let last = self.labels().len().saturating_sub(1);
        self.set_cursor((self.cursor() + 1).min(last));
    }

    fn move_up(&mut self) {
        self.set_cursor(self.cursor().saturating_sub(1));
    }
}

fn parse_date_field(label: &str, value: &str) -> Result<NaiveDate, PipelineError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        PipelineError::InvalidInput(format!("{label}: '{value}' is not a YYYY-MM-DD date"))
    })
}

fn parse_amount_field(label: &str, value: &str) -> Result<f64, PipelineError> {
    value
        .trim()
        .replace(',', "")
        .trim_start_matches('$')
        .parse::<f64>()
        .map_err(|_| PipelineError::InvalidInput(format!("{label}: '{value}' is not a number")))
}

#[derive(Debug, Clone)]
pub struct CompareForm {
    pub symbols: String,
    pub start: String,
    pub end: String,
    pub include_dividends: bool,
    pub investment: String,
    pub cursor: usize,
}

impl CompareForm {
    pub const DIVIDENDS_FIELD: usize = 3;

    pub fn from_defaults(defaults: &ComparatorDefaults) -> Self {
        Self {
            symbols: defaults.symbols.clone(),
            start: defaults.start.to_string(),
            end: defaults.end.to_string(),
            include_dividends: defaults.include_dividends,
            investment: format!("{:.2}", defaults.initial_investment),
            cursor: 0,
        }
    }

    pub fn to_request(&self) -> Result<ComparatorRequest, PipelineError> {
        ComparatorRequest::parse(
            &self.symbols,
            parse_date_field("Start date", &self.start)?,
            parse_date_field("End date", &self.end)?,
            self.include_dividends,
            parse_amount_field("Initial investment", &self.investment)?,
        )
    }
}

impl Form for CompareForm {
    fn labels(&self) -> &'static [&'static str] {
        &["Symbols", "Start date", "End date", "Include dividends", "Initial investment"]
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.cursor {
            0 => Some(&mut self.symbols),
            1 => Some(&mut self.start),
            2 => Some(&mut self.end),
            4 => Some(&mut self.investment),
            _ => None,
        }
    }

    fn toggle(&mut self) {
        if self.cursor == Self::DIVIDENDS_FIELD {
            self.include_dividends = !self.include_dividends;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReinvestForm {
    pub symbol: String,
    pub start: String,
    /// Empty means today.
    pub end: String,
    pub investment: String,
    pub min_investment: f64,
    pub cursor: usize,
}

impl ReinvestForm {
    pub fn from_defaults(defaults: &SimulatorDefaults) -> Self {
        Self {
            symbol: defaults.symbol.clone(),
            start: defaults.start.to_string(),
            end: defaults.end.map(|d| d.to_string()).unwrap_or_default(),
            investment: format!("{:.2}", defaults.initial_investment),
            min_investment: defaults.min_investment,
            cursor: 0,
        }
    }

    pub fn to_request(&self) -> Result<SimulationRequest, PipelineError> {
        let end = match self.end.trim() {
            "" => None,
            s => Some(parse_date_field("End date", s)?),
        };
        SimulationRequest::new(
            &self.symbol,
            parse_date_field("Start date", &self.start)?,
            end,
            parse_amount_field("Initial investment", &self.investment)?,
            self.min_investment,
        )
    }
}

impl Form for ReinvestForm {
    fn labels(&self) -> &'static [&'static str] {
        &["Symbol", "Start date", "End date", "Initial investment"]
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.cursor {
            0 => Some(&mut self.symbol),
            1 => Some(&mut self.start),
            2 => Some(&mut self.end),
            3 => Some(&mut self.investment),
            _ => None,
        }
    }
}

// ── App state ────────────────────────────────────────────────────────

/// Top-level application state.
pub struct AppState {
    pub active_panel: Panel,
    pub running: bool,
    /// A text field is being edited; keys go to the field.
    pub editing: bool,
    pub overlay: Overlay,
    pub pending: Option<RunKind>,

    pub compare: CompareForm,
    pub reinvest: ReinvestForm,
    pub comparison: Option<ComparisonReport>,
    pub simulation: Option<SimulationReport>,
    pub chart_view: ChartView,

    pub provider: Result<Box<dyn DataProvider>, String>,
    pub source_label: String,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
}

impl AppState {
    pub fn new(config: &GrowthConfig, provider: Result<Box<dyn DataProvider>, String>) -> Self {
        let source_label = match &provider {
            Ok(p) => p.name().to_string(),
            Err(_) => "unavailable".to_string(),
        };
        Self {
            active_panel: Panel::Compare,
            running: true,
            editing: false,
            overlay: Overlay::None,
            pending: None,
            compare: CompareForm::from_defaults(&config.comparator),
            reinvest: ReinvestForm::from_defaults(&config.simulator),
            comparison: None,
            simulation: None,
            chart_view: ChartView::Investment,
            provider,
            source_label,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: &'static str, message: String, context: String) {
        tracing::warn!(category, context = %context, "{message}");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// Mark a run; the main loop executes it after the next frame.
    pub fn request_run(&mut self, kind: RunKind) {
        self.editing = false;
        self.pending = Some(kind);
        match kind {
            RunKind::Compare => self.set_status("Running comparison..."),
            RunKind::Reinvest => self.set_status("Running reinvestment simulation..."),
        }
    }

    /// True while the provider refuses requests (circuit breaker open).
    pub fn provider_paused(&self) -> bool {
        matches!(&self.provider, Ok(p) if !p.is_available())
    }

    fn ready_provider(&self) -> Result<&dyn DataProvider, (&'static str, String)> {
        match self.provider.as_deref() {
            Ok(provider) if provider.is_available() => Ok(provider),
            Ok(provider) => Err((
                "PROV",
                format!("{} is refusing requests (rate limited); try again later", provider.name()),
            )),
            Err(reason) => Err(("PROV", format!("data provider unavailable: {reason}"))),
        }
    }

    /// Run the pending pipeline to completion, if any.
    pub fn execute_pending(&mut self) {
        let Some(kind) = self.pending.take() else {
            return;
        };
        match kind {
            RunKind::Compare => {
                let result = self.ready_provider().and_then(|provider| {
                    self.compare
                        .to_request()
                        .and_then(|req| run_comparison(provider, &req))
                        .map_err(|e| (e.category(), e.to_string()))
                });
                match result {
                    Ok(report) => self.finish_comparison(report),
                    Err((category, message)) => {
                        self.comparison = None;
                        self.push_error(category, message, "compare".into());
                    }
                }
            }
            RunKind::Reinvest => {
                let result = self.ready_provider().and_then(|provider| {
                    self.reinvest
                        .to_request()
                        .and_then(|req| run_simulation(provider, &req))
                        .map_err(|e| (e.category(), e.to_string()))
                });
                match result {
                    Ok(report) => self.finish_simulation(report),
                    Err((category, message)) => {
                        self.simulation = None;
                        self.push_error(category, message, "reinvest".into());
                    }
                }
            }
        }
    }

    fn finish_comparison(&mut self, report: ComparisonReport) {
        let mut notes = Vec::new();
        if !report.missing.is_empty() {
            let skipped: Vec<&str> = report.missing.iter().map(|m| m.symbol.as_str()).collect();
            notes.push(format!("skipped {}", skipped.join(", ")));
        }
        if !report.failures.is_empty() {
            notes.push(format!("{} could not be normalized", report.failures.len()));
        }
        if report.has_synthetic {
            notes.push("SYNTHETIC data".to_string());
        }

        let summary = format!("Compared {} ticker(s)", report.tickers.len());
        self.chart_view = ChartView::Investment;
        self.comparison = Some(report);
        if notes.is_empty() {
            self.set_status(summary);
        } else {
            self.set_warning(format!("{summary}; {}", notes.join("; ")));
        }
    }

    fn finish_simulation(&mut self, report: SimulationReport) {
        let summary = format!(
            "{}: final {} | CAGR {}",
            report.request.symbol,
            format_currency(report.final_value()),
            format_cagr(&report.cagr)
        );
        let synthetic = report.source == DataSource::Synthetic;
        let unmatched = report.outcome.unmatched_dividends;
        self.chart_view = ChartView::Reinvestment;
        self.simulation = Some(report);

        if synthetic {
            self.set_warning(format!("{summary}; SYNTHETIC data"));
        } else if unmatched > 0 {
            self.set_warning(format!("{summary}; {unmatched} dividend(s) off-calendar"));
        } else {
            self.set_status(summary);
        }
    }

    /// Lines for the Chart panel under the current view.
    pub fn chart_data(&self) -> Option<ChartData> {
        match self.chart_view {
            ChartView::Investment | ChartView::Price => {
                let report = self.comparison.as_ref()?;
                let origin = *report.prices.dates.first()?;
                let last = *report.prices.dates.last()?;
                let series = report
                    .tickers
                    .iter()
                    .map(|t| {
                        let points = if self.chart_view == ChartView::Investment {
                            to_points(origin, t.investment_values.iter().map(|p| (p.date, p.value)))
                        } else {
                            to_points(origin, t.prices.iter().map(|p| (p.date, p.price)))
                        };
                        ChartSeries {
                            label: t.symbol.clone(),
                            points,
                        }
                    })
                    .collect();
                let mut title = self.chart_view.label().to_string();
                if self.chart_view == ChartView::Price && report.request.include_dividends {
                    title.push_str(" + cumulative dividends");
                }
                Some(ChartData {
                    title,
                    origin,
                    last,
                    series,
                })
            }
            ChartView::Reinvestment => {
                let report = self.simulation.as_ref()?;
                let origin = report.first_trade_date;
                Some(ChartData {
                    title: self.chart_view.label().to_string(),
                    origin,
                    last: report.last_trade_date,
                    series: vec![ChartSeries {
                        label: report.request.symbol.clone(),
                        points: to_points(
                            origin,
                            report.outcome.growth.iter().map(|p| (p.date, p.value)),
                        ),
                    }],
                })
            }
        }
    }
}

fn to_points(origin: NaiveDate, values: impl Iterator<Item = (NaiveDate, f64)>) -> Vec<(f64, f64)> {
    values
        .map(|(date, v)| ((date - origin).num_days() as f64, v))
        .collect()
}
