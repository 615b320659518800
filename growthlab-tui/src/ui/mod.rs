//! Screen layout: the active panel above a one-line status bar, with the
//! error history drawn over both when open.

pub mod chart_panel;
pub mod compare_panel;
pub mod form;
pub mod help_panel;
pub mod overlays;
pub mod reinvest_panel;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::widgets::{Block, Borders};

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

pub fn draw(f: &mut Frame, app: &AppState) {
    let [body, status] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(f.area());

    let panel = app.active_panel;
    let frame = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));
    let inner = frame.inner(body);
    f.render_widget(frame, body);

    match panel {
        Panel::Compare => compare_panel::render(f, inner, app),
        Panel::Reinvest => reinvest_panel::render(f, inner, app),
        Panel::Chart => chart_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
    status_bar::render(f, status, app);

    if app.overlay == Overlay::ErrorHistory {
        overlays::render_error_history(f, body, app);
    }
}

/// Sub-rectangle of `area` taking the given percentages, centered both ways.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
