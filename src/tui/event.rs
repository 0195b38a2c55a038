//! Event handling for TUI.
//!
//! Input is polled once per tick without blocking; the loop itself decides
//! whether to sleep afterwards.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize (width, height).
    Resize(u16, u16),
}

/// Source of at most one pending event per call.
pub trait EventSource {
    /// Returns the next pending event, or `None` right away if there is none.
    fn poll_event(&mut self) -> io::Result<Option<Event>>;
}

/// Reads events from the controlling terminal via crossterm.
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll_event(&mut self) -> io::Result<Option<Event>> {
        if !event::poll(Duration::ZERO)? {
            return Ok(None);
        }
        let event = match event::read()? {
            CrosstermEvent::Key(key) => Some(Event::Key(key)),
            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
            _ => None,
        };
        Ok(event)
    }
}
