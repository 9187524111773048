//! Keyboard input handling for the TUI.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;
use crate::cells::Chemistry;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char(' ') => app.toggle_running(),
        KeyCode::Char('t') => app.manual_tick(),
        KeyCode::Char('l') => app.add_cell(Chemistry::Lfp),
        KeyCode::Char('n') => app.add_cell(Chemistry::Nmc),
        KeyCode::Char('c') => app.clear_cells(),
        KeyCode::Char('h') => app.clear_history(),
        KeyCode::Char('a') => app.add_idle_task(),
        KeyCode::Char('s') => app.start_pending(),
        KeyCode::Char('d') => app.delete_completed(),
        KeyCode::Char('e') => app.export(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.speed_up(now),
        KeyCode::Char('-') | KeyCode::Left => app.speed_down(now),
        KeyCode::Char('r') => app.restart(now),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::from(code), Instant::now());
    }

    #[test]
    fn keys_drive_the_session() {
        let mut app = App::new(ScenarioConfig::empty(), std::env::temp_dir(), Instant::now())
            .unwrap();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.session.history().len(), 2);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.session.is_running());

        press(&mut app, KeyCode::Char('c'));
        assert!(app.session.cells().is_empty());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }

    #[test]
    fn ctrl_c_quits_without_clearing() {
        let mut app = App::new(ScenarioConfig::demo(), std::env::temp_dir(), Instant::now())
            .unwrap();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        handle_key(&mut app, key, Instant::now());
        assert!(app.quit);
        assert_eq!(app.session.cells().len(), 4);
    }
}
