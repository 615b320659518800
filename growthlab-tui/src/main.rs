//! GrowthLab TUI — four-panel terminal interface with vim-style navigation.
//!
//! Panels:
//! 1. Compare — multi-ticker growth of an initial investment, CAGR table
//! 2. Reinvest — single-ticker dividend reinvestment simulation
//! 3. Chart — investment value, adjusted close or reinvested growth
//! 4. Help — keyboard shortcuts and model notes

mod app;
mod input;
mod theme;
mod ui;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;

use growthlab_core::logging::{LogConfig, LogTarget, init_logging};
use growthlab_runner::{GrowthConfig, build_provider};

use crate::app::AppState;

/// ~20 frames per second while idle.
const TICK: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    init_file_logging();

    let (config, config_error) = match GrowthConfig::load(None) {
        Ok(config) => (config, None),
        Err(e) => (GrowthConfig::default(), Some(e.to_string())),
    };
    let provider = build_provider(&config.provider).map_err(|e| e.to_string());
    let mut app = AppState::new(&config, provider);
    if let Some(err) = config_error {
        app.push_error("INPUT", err, "config file ignored, using defaults".into());
    }

    // Raw mode, alternate screen and a panic hook that undoes both.
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app);
    ratatui::restore();
    result
}

/// The terminal owns stderr, so logs go to `<cache_dir>/growthlab/tui.log`.
/// Logging stays off if that file can't be opened.
fn init_file_logging() {
    let Some(dir) = dirs::cache_dir() else {
        return;
    };
    let target = LogTarget::File(dir.join("growthlab").join("tui.log"));
    let _ = init_logging(LogConfig::from_env().with_target(target));
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut AppState) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        // The frame just drawn shows "Running…"; now do the work.
        if app.pending.is_some() {
            app.execute_pending();
            continue;
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }
    }
    Ok(())
}
