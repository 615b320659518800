//! Panel 1 — Compare: ticker form, CAGR/final value table, raw price table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use growthlab_runner::comparator::ComparisonReport;
use growthlab_runner::{format_cagr, format_currency};

use crate::app::AppState;
use crate::theme;
use crate::ui::form::{checkbox, form_lines, FieldView};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(area);

    render_form(f, chunks[0], app);
    match &app.comparison {
        Some(report) => render_report(f, chunks[1], report),
        None => {
            let hint = Paragraph::new(Span::styled(
                "Press r to compare. Results appear here; press 3 for the chart.",
                theme::muted(),
            ));
            f.render_widget(hint, chunks[1]);
        }
    }
}

fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let form = &app.compare;
    let fields = [
        FieldView { label: "Symbols", value: form.symbols.clone(), placeholder: "AAPL, MSFT" },
        FieldView { label: "Start date", value: form.start.clone(), placeholder: "YYYY-MM-DD" },
        FieldView { label: "End date", value: form.end.clone(), placeholder: "YYYY-MM-DD" },
        FieldView { label: "Include dividends", value: checkbox(form.include_dividends), placeholder: "" },
        FieldView { label: "Initial investment", value: form.investment.clone(), placeholder: "1000" },
    ];
    let mut lines = form_lines(&fields, form.cursor, app.editing);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [j/k]move [Enter]edit [Space]toggle [r]un",
        theme::muted(),
    )));
    f.render_widget(Paragraph::new(lines), area);
}

fn render_report(f: &mut Frame, area: Rect, report: &ComparisonReport) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_summary(f, chunks[0], report);
    render_prices(f, chunks[1], report);
}

fn render_summary(f: &mut Frame, area: Rect, report: &ComparisonReport) {
    let notes = notes(report);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(notes.len() as u16)])
        .split(area);

    let header = Row::new(["Symbol", "Final value", "CAGR"]).style(theme::accent_bold());
    let mut rows: Vec<Row> = report
        .tickers
        .iter()
        .map(|t| {
            let cagr_style = match &t.cagr {
                Ok(rate) => theme::change(*rate),
                Err(_) => theme::warning(),
            };
            Row::new(vec![
                Span::styled(t.symbol.clone(), theme::text()),
                Span::styled(format_currency(t.final_value), theme::text()),
                Span::styled(format_cagr(&t.cagr), cagr_style),
            ])
        })
        .collect();
    rows.extend(report.failures.iter().map(|fail| {
        Row::new(vec![
            Span::styled(fail.symbol.clone(), theme::text()),
            Span::styled("-", theme::muted()),
            Span::styled(fail.error.to_string(), theme::negative()),
        ])
    }));

    let title = format!(
        " {} to {} ({:.2}y) from {} ",
        report.request.start,
        report.request.end,
        report.years,
        format_currency(report.request.initial_investment)
    );
    let table = Table::new(
        rows,
        [Constraint::Length(10), Constraint::Length(16), Constraint::Min(10)],
    )
    .header(header)
    .block(Block::default().borders(Borders::TOP).title(title).title_style(theme::muted()));
    f.render_widget(table, chunks[0]);
    f.render_widget(Paragraph::new(notes), chunks[1]);
}

fn notes(report: &ComparisonReport) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(model) = report.dividend_model() {
        lines.push(Line::from(Span::styled(format!("Dividends: {model}"), theme::neutral())));
    }
    for m in &report.missing {
        lines.push(Line::from(Span::styled(
            format!("Skipped {}: {}", m.symbol, m.reason),
            theme::warning(),
        )));
    }
    if report.has_synthetic {
        lines.push(Line::from(Span::styled(
            "WARNING: results based on SYNTHETIC data",
            theme::warning(),
        )));
    }
    lines
}

/// Tail of the raw adjusted-close table, newest row last.
fn render_prices(f: &mut Frame, area: Rect, report: &ComparisonReport) {
    let table = &report.prices;
    let visible = area.height.saturating_sub(2) as usize;
    let skip = table.row_count().saturating_sub(visible);

    let mut header = vec!["Date".to_string()];
    header.extend(table.symbols.iter().cloned());
    let rows: Vec<Row> = table
        .rows()
        .skip(skip)
        .map(|(date, cells)| {
            let mut row = vec![date.to_string()];
            row.extend(
                cells
                    .into_iter()
                    .map(|c| c.map_or_else(|| "-".to_string(), |p| format!("{p:.2}"))),
            );
            Row::new(row)
        })
        .collect();

    let mut widths = vec![Constraint::Length(11)];
    widths.extend(table.symbols.iter().map(|_| Constraint::Length(10)));

    let widget = Table::new(rows, widths)
        .header(Row::new(header).style(theme::accent_bold()))
        .style(theme::text())
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(format!(" Adjusted close ({} days) ", table.row_count()))
                .title_style(theme::muted()),
        );
    f.render_widget(widget, area);
}
