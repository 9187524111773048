//! Live terminal UI for an interactive session.
//!
//! Feature-gated behind `tui`. Launch with `--tui` on the CLI.

mod controls;
mod layout;
/// Application state and timers.
pub mod runtime;
mod style;

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::ScenarioConfig;
use runtime::App;

/// Launches the TUI event loop for a scenario.
///
/// Sets up the terminal (raw mode, alternate screen), runs the event loop,
/// and restores the terminal on exit.
///
/// # Errors
///
/// Returns an error if the session cannot be built or the terminal fails.
pub fn run(scenario: ScenarioConfig, export_dir: PathBuf) -> io::Result<()> {
    let mut app = App::new(scenario, export_dir, Instant::now()).map_err(io::Error::other)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    let result = Terminal::new(CrosstermBackend::new(stdout)).and_then(|mut terminal| {
        let result = event_loop(&mut terminal, &mut app);
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();
        result
    });

    // Teardown: raw mode is restored on every path
    let _ = disable_raw_mode();
    result
}

/// Core event loop: poll input until the next timer is due, fire timers, draw.
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| layout::render(frame, app))?;

        if app.quit {
            return Ok(());
        }

        let poll_timeout = app.next_deadline().saturating_duration_since(Instant::now());
        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                controls::handle_key(app, key, Instant::now());
            }
        }

        app.update(Instant::now());
    }
}
