//! Raw keyboard input
//!
//! The engine only ever asks two questions of its input: "is a key waiting?"
//! (never blocking) and "give me that key". [`TerminalInput`] answers them
//! from the crossterm event queue.

use crate::error::PvtError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// A keypress as seen by the trial engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Enter / line feed, the only key that ends a reaction
    Enter,
    /// Ctrl+C, which abandons the session in raw mode
    Interrupt,
    /// Any printable character
    Char(char),
    /// Anything else (arrows, function keys, ...)
    Other,
}

impl Key {
    /// Whether this key terminates the reaction window
    pub fn is_terminator(self) -> bool {
        matches!(self, Key::Enter | Key::Char('\n'))
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        match event.code {
            KeyCode::Enter => Key::Enter,
            // Ctrl+J is a literal line feed
            KeyCode::Char('j') if ctrl => Key::Enter,
            KeyCode::Char('c') if ctrl => Key::Interrupt,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// Source of raw keypresses
pub trait InputSource {
    /// Zero-timeout check for a pending key
    fn poll(&mut self) -> Result<bool, PvtError>;

    /// Read one key, blocking if none is pending
    fn read_key(&mut self) -> Result<Key, PvtError>;
}

/// Input from the controlling terminal via crossterm
#[derive(Debug, Default)]
pub struct TerminalInput {
    /// Key already pulled off the event queue by `poll`
    pending: Option<Key>,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key_press(event: Event) -> Option<Key> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Key::from(key)),
        _ => None,
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Result<bool, PvtError> {
        if self.pending.is_some() {
            return Ok(true);
        }
        // Resize, focus and release events are skipped so a reported key is
        // always readable without blocking
        while event::poll(Duration::ZERO).map_err(PvtError::PollFailure)? {
            let event = event::read().map_err(PvtError::PollFailure)?;
            if let Some(key) = key_press(event) {
                self.pending = Some(key);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn read_key(&mut self) -> Result<Key, PvtError> {
        if let Some(key) = self.pending.take() {
            return Ok(key);
        }
        loop {
            if let Some(key) = key_press(event::read()?) {
                return Ok(key);
            }
        }
    }
}
