//! Input form rendering shared by the Compare and Reinvest panels.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// One form row as shown on screen.
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: String,
    /// Grey hint shown when `value` is empty.
    pub placeholder: &'a str,
}

/// Build lines for a form, highlighting the focused row.
pub fn form_lines<'a>(fields: &[FieldView<'a>], cursor: usize, editing: bool) -> Vec<Line<'a>> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == cursor;
            let marker = if focused { "▸ " } else { "  " };
            let label_style = if focused {
                theme::accent_bold()
            } else {
                theme::muted()
            };
            let mut spans = vec![
                Span::styled(marker, theme::accent()),
                Span::styled(format!("{:<20}", field.label), label_style),
            ];
            if field.value.is_empty() {
                spans.push(Span::styled(field.placeholder.to_string(), theme::muted()));
            } else if focused && editing {
                spans.push(Span::styled(
                    field.value.clone(),
                    theme::text().add_modifier(Modifier::UNDERLINED),
                ));
            } else {
                spans.push(Span::styled(field.value.clone(), theme::text()));
            }
            if focused && editing {
                spans.push(Span::styled("█", theme::accent()));
            }
            Line::from(spans)
        })
        .collect()
}

pub fn checkbox(checked: bool) -> String {
    if checked { "[x]" } else { "[ ]" }.to_string()
}
