//! Panel 4 — Help: keyboard shortcuts and the two models.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use growthlab_runner::ADDITIVE_DIVIDEND_MODEL;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "e", "Open error history overlay");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panels 1 and 2 — Compare / Reinvest");
    key(&mut lines, "j / k", "Move between fields");
    key(&mut lines, "Enter", "Edit the field (Enter or Esc to finish)");
    key(&mut lines, "Ctrl+U", "Clear the field while editing");
    key(&mut lines, "Space", "Toggle include dividends");
    key(&mut lines, "r", "Run");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Chart");
    key(&mut lines, "v", "Cycle investment value / adjusted close / reinvested value");
    lines.push(Line::from(""));

    section(&mut lines, "Models");
    key(
        &mut lines,
        "Compare",
        &format!("Dividends are added to price as a {ADDITIVE_DIVIDEND_MODEL}; no reinvestment"),
    );
    key(
        &mut lines,
        "Reinvest",
        "Each dividend buys more shares at that day's close",
    );
    key(&mut lines, "CAGR", "(final / initial)^(1 / years) - 1, years = days / 365.25");
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Data source: ", theme::muted()),
        Span::styled(app.source_label.clone(), theme::accent()),
    ]));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
