//! Key decoding and terminal mode management.

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::io;
use std::time::Duration;

use crate::controller::Action;
use crate::tui::settings;

/// Map one key press to a controller action.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Char(' ') => Some(Action::Toggle),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

/// Wait briefly for the next key and decode it.
///
/// Returns `Ok(None)` when the poll window elapsed or the event was not a
/// bound key.
pub fn next_action() -> io::Result<Option<Action>> {
    if !event::poll(Duration::from_millis(settings::EVENT_POLL_MS))? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(action_for(key)),
        _ => Ok(None),
    }
}

/// Raw mode plus alternate screen on stderr, restored on drop.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stderr = io::stderr();
        if let Err(e) = stderr
            .execute(EnterAlternateScreen)
            .and_then(|out| out.execute(Hide))
        {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stderr = io::stderr();
        let _ = stderr.execute(Show);
        let _ = stderr.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
