//! Keyboard input dispatch — overlays → field editing → global keys → panel keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Form, Overlay, Panel, RunKind};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ignore input while a run is queued for the next frame.
    if app.pending.is_some() {
        return;
    }

    // 1. Overlays consume input first.
    if app.overlay == Overlay::ErrorHistory {
        handle_error_overlay(app, key);
        return;
    }

    // 2. A field being edited takes every key.
    if app.editing {
        handle_edit_key(app, key);
        return;
    }

    // 3. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Compare; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Reinvest; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Chart; return; }
        KeyCode::Char('4') => { app.active_panel = Panel::Help; return; }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        _ => {}
    }

    // 4. Panel-specific keys.
    match app.active_panel {
        Panel::Compare => {
            if key.code == KeyCode::Char('r') {
                app.request_run(RunKind::Compare);
            } else {
                let editing = handle_form_key(&mut app.compare, key);
                app.editing = editing;
            }
        }
        Panel::Reinvest => {
            if key.code == KeyCode::Char('r') {
                app.request_run(RunKind::Reinvest);
            } else {
                let editing = handle_form_key(&mut app.reinvest, key);
                app.editing = editing;
            }
        }
        Panel::Chart => {
            if key.code == KeyCode::Char('v') {
                app.chart_view = app.chart_view.next();
            }
        }
        Panel::Help => {}
    }
}

/// Navigation on a form. Returns true when a text field enters edit mode.
fn handle_form_key(form: &mut dyn Form, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => form.move_down(),
        KeyCode::Char('k') | KeyCode::Up => form.move_up(),
        KeyCode::Char(' ') => form.toggle(),
        KeyCode::Enter => {
            if form.text_mut().is_some() {
                return true;
            }
            form.toggle();
        }
        _ => {}
    }
    false
}

fn handle_edit_key(app: &mut AppState, key: KeyEvent) {
    let form: &mut dyn Form = match app.active_panel {
        Panel::Compare => &mut app.compare,
        Panel::Reinvest => &mut app.reinvest,
        _ => {
            app.editing = false;
            return;
        }
    };

    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
            app.editing = false;
        }
        KeyCode::Backspace => {
            if let Some(text) = form.text_mut() {
                text.pop();
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(text) = form.text_mut() {
                text.clear();
            }
        }
        KeyCode::Char(c) => {
            if let Some(text) = form.text_mut() {
                text.push(c);
            }
        }
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growthlab_core::data::InMemoryProvider;
    use growthlab_runner::config::GrowthConfig;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> AppState {
        AppState::new(&GrowthConfig::default(), Ok(Box::new(InMemoryProvider::new())))
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn number_keys_switch_panels() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.active_panel, Panel::Chart);
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Help);
    }

    #[test]
    fn editing_captures_q_and_digits() {
        let mut app = app();
        // Enter on the symbols field starts editing.
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.editing);
        for _ in 0..app.compare.symbols.len() {
            handle_key(&mut app, press(KeyCode::Backspace));
        }
        type_str(&mut app, "qqq,1");
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(!app.editing);
        assert!(app.running);
        assert_eq!(app.active_panel, Panel::Compare);
        assert_eq!(app.compare.symbols, "qqq,1");
    }

    #[test]
    fn space_toggles_dividends() {
        let mut app = app();
        for _ in 0..3 {
            handle_key(&mut app, press(KeyCode::Char('j')));
        }
        let before = app.compare.include_dividends;
        handle_key(&mut app, press(KeyCode::Char(' ')));
        assert_ne!(app.compare.include_dividends, before);
        assert!(!app.editing);
    }

    #[test]
    fn r_queues_a_run_and_blocks_input() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('2')));
        handle_key(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.pending, Some(RunKind::Reinvest));
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.running);
    }

    #[test]
    fn chart_view_cycles() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('3')));
        let before = app.chart_view;
        handle_key(&mut app, press(KeyCode::Char('v')));
        assert_eq!(app.chart_view, before.next());
    }

    #[test]
    fn q_quits_outside_edit_mode() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }
}
