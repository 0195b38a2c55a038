//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

use super::state::AppState;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
}

/// Handles key input and updates state.
///
/// Scrolling past either end is ignored without touching the viewport.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::None;
    }
    match key.code {
        KeyCode::F(1) | KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        KeyCode::Left | KeyCode::Char('h') => {
            let moved = state.viewport.scroll_left();
            trace!(moved, offset = state.viewport.scroll_offset(), "scroll left");
            KeyAction::None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let moved = state.viewport.scroll_right();
            trace!(moved, offset = state.viewport.scroll_offset(), "scroll right");
            KeyAction::None
        }

        _ => KeyAction::None,
    }
}
