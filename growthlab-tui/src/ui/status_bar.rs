//! One-line footer: panel keys, data source, latest status.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, StatusLevel};
use crate::theme;

const HINTS: &str = " 1:Compare 2:Reinvest 3:Chart 4:Help e:errors q:quit";

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let (message, style): (&str, Style) = match (&app.pending, &app.status_message) {
        (Some(_), _) => ("Running…", theme::accent_bold()),
        (None, Some((msg, level))) => (msg.as_str(), level_style(*level)),
        (None, None) => ("", theme::muted()),
    };

    let mut spans = vec![
        Span::styled(HINTS, theme::muted()),
        Span::styled(format!(" │ {}", app.source_label), theme::neutral()),
    ];
    if app.provider_paused() {
        spans.push(Span::styled(" (rate limited)", theme::warning()));
    }
    spans.push(Span::styled(" │ ", theme::neutral()));
    spans.push(Span::styled(message, style));
    let line = Line::from(spans);
    f.render_widget(Paragraph::new(line), area);
}

fn level_style(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => theme::accent(),
        StatusLevel::Warning => theme::warning(),
        StatusLevel::Error => theme::negative(),
    }
}
