//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Actions that need network
//! work return the effects for the caller to hand to the effect runner.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::feed::Effect;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    if key.kind != KeyEventKind::Press {
        return Vec::new();
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Tab => app.next_feed(),
        KeyCode::BackTab => app.prev_feed(),
        KeyCode::Right | KeyCode::Char('n') => return app.next_page(),
        KeyCode::Left | KeyCode::Char('p') => return app.prev_page(),
        KeyCode::Char('r') => return app.reload(),
        KeyCode::Enter | KeyCode::Char('m') => return app.merge_pending(),
        _ => {}
    }
    Vec::new()
}
