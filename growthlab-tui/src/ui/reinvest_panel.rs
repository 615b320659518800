//! Panel 2 — Reinvest: single-ticker form and simulation summary.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use growthlab_core::data::DataSource;
use growthlab_runner::simulator::SimulationReport;
use growthlab_runner::{format_cagr, format_currency};

use crate::app::AppState;
use crate::theme;
use crate::ui::form::{form_lines, FieldView};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    let form = &app.reinvest;
    let fields = [
        FieldView { label: "Symbol", value: form.symbol.clone(), placeholder: "AAPL" },
        FieldView { label: "Start date", value: form.start.clone(), placeholder: "YYYY-MM-DD" },
        FieldView { label: "End date", value: form.end.clone(), placeholder: "today" },
        FieldView { label: "Initial investment", value: form.investment.clone(), placeholder: "1000" },
    ];
    let mut lines = form_lines(&fields, form.cursor, app.editing);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  [j/k]move [Enter]edit [r]un   minimum investment {}", format_currency(form.min_investment)),
        theme::muted(),
    )));
    f.render_widget(Paragraph::new(lines), chunks[0]);

    let body = match &app.simulation {
        Some(report) => summary_lines(report),
        None => vec![Line::from(Span::styled(
            "Press r to simulate reinvesting every dividend.",
            theme::muted(),
        ))],
    };
    f.render_widget(Paragraph::new(body), chunks[1]);
}

fn row(label: &str, value: String, style: ratatui::style::Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<18}"), theme::muted()),
        Span::styled(value, style),
    ])
}

fn summary_lines(report: &SimulationReport) -> Vec<Line<'static>> {
    let out = &report.outcome;
    let cagr_style = match &report.cagr {
        Ok(rate) => theme::change(*rate),
        Err(_) => theme::warning(),
    };
    let mut lines = vec![
        Line::from(Span::styled(
            format!("── {} ──", report.request.symbol),
            theme::accent_bold(),
        )),
        row(
            "Traded",
            format!(
                "{} to {} ({} days)",
                report.first_trade_date,
                report.last_trade_date,
                out.growth.len()
            ),
            theme::text(),
        ),
        row("Final value", format_currency(out.final_value), theme::accent_bold()),
        row("CAGR", format_cagr(&report.cagr), cagr_style),
        row(
            "Shares",
            format!("{:.4} → {:.4}", out.initial_shares, out.final_shares),
            theme::text(),
        ),
        row(
            "Dividends",
            format!(
                "{} reinvested, {} total",
                out.dividends_reinvested,
                format_currency(out.dividend_cash)
            ),
            theme::text(),
        ),
    ];
    if out.unmatched_dividends > 0 {
        lines.push(Line::from(Span::styled(
            format!(
                "  {} dividend date(s) fell on non-trading days and were ignored",
                out.unmatched_dividends
            ),
            theme::warning(),
        )));
    }
    if report.source == DataSource::Synthetic {
        lines.push(Line::from(Span::styled(
            "  WARNING: results based on SYNTHETIC data",
            theme::warning(),
        )));
    }
    lines
}
