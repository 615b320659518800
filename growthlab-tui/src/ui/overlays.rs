//! Error history overlay, newest first.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{AppState, ErrorRecord};
use crate::theme;
use crate::ui::centered_rect;

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    let total = app.error_history.len();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(Span::styled(
            format!(" Errors ({total}) [j/k]scroll [Esc]close "),
            theme::negative(),
        ));
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let lines: Vec<Line> = if total == 0 {
        vec![Line::from(Span::styled("No errors this session.", theme::muted()))]
    } else {
        app.error_history
            .iter()
            .enumerate()
            .skip(app.error_scroll)
            .flat_map(|(i, record)| record_lines(record, i == app.error_scroll))
            .take(inner.height as usize)
            .collect()
    };
    f.render_widget(Paragraph::new(lines), inner);
}

fn record_lines(record: &ErrorRecord, selected: bool) -> Vec<Line<'_>> {
    let message_style = if selected {
        theme::negative().add_modifier(Modifier::BOLD)
    } else {
        theme::text()
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(record.timestamp.format("%H:%M:%S ").to_string(), theme::muted()),
        Span::styled(format!("{:<7}", record.category), theme::warning()),
        Span::styled(record.message.as_str(), message_style),
    ])];
    if !record.context.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("{:>16}{}", "", record.context),
            theme::muted(),
        )));
    }
    lines
}
