//! Panel 3 — Chart: one Braille line per ticker, x axis in days.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph};

use growthlab_runner::format_currency;

use crate::app::{AppState, ChartData};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match app.chart_data() {
        Some(data) if data.series.iter().any(|s| !s.points.is_empty()) => {
            render_chart(f, area, &data)
        }
        _ => render_empty(f, area, app),
    }
}

fn render_empty(f: &mut Frame, area: Rect, app: &AppState) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Nothing to plot for \"{}\" yet.", app.chart_view.label()),
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Run a comparison (press 1, then r) or a reinvestment (press 2, then r).",
            theme::muted(),
        )),
        Line::from(Span::styled("Press v to cycle the view.", theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_chart(f: &mut Frame, area: Rect, data: &ChartData) {
    let (min_y, max_y) = data
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(_, y)| y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    let padding = ((max_y - min_y).abs() * 0.05).max(0.01);
    let y_min = min_y - padding;
    let y_max = max_y + padding;
    let x_max = (data.last - data.origin).num_days() as f64;

    let datasets: Vec<Dataset> = data
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Dataset::default()
                .name(s.label.clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(theme::series_color(i)))
                .graph_type(GraphType::Line)
                .data(&s.points)
        })
        .collect();

    let title = format!(" {} [v] cycle view ", data.title);
    let chart = Chart::new(datasets)
        .block(Block::default().title(Span::styled(title, theme::accent_bold())))
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(data.origin.to_string(), theme::muted()),
                    Span::styled(data.last.to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Value", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format_currency(y_min), theme::muted()),
                    Span::styled(format_currency(y_max), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
