//! Full-screen terminal surface
//!
//! Owns raw mode and the alternate screen for its lifetime. Dropping the
//! surface (including during unwinding from a fatal error) restores the
//! terminal.

use super::surface::{Surface, VisualState};
use super::theme::ThemeColors;
use super::widgets::{summary_rows, CenteredText, SummaryPanel};
use crate::engine::SessionSummary;
use crate::error::PvtError;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout, Stdout};

/// Leave raw mode and the alternate screen.
///
/// Safe to call more than once and from a signal handler thread.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, Show)
}

/// Surface drawing on the controlling terminal via ratatui
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    colors: ThemeColors,
    state: VisualState,
    restored: bool,
}

impl TerminalSurface {
    /// Enter raw mode and the alternate screen
    pub fn init() -> Result<Self, PvtError> {
        let init = || -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
            enable_raw_mode()?;
            let mut stdout = stdout();
            execute!(stdout, EnterAlternateScreen, Hide)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            terminal.clear()?;
            Ok(terminal)
        };

        match init() {
            Ok(terminal) => Ok(Self {
                terminal,
                colors: ThemeColors::default(),
                state: VisualState::Normal,
                restored: false,
            }),
            Err(e) => {
                let _ = restore_terminal();
                Err(PvtError::resource("could not initialize terminal", e))
            }
        }
    }

    /// Restore the terminal now rather than on drop
    pub fn restore(&mut self) -> Result<(), PvtError> {
        if !self.restored {
            self.restored = true;
            restore_terminal()?;
        }
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn set_visual_state(&mut self, state: VisualState) {
        self.state = state;
    }

    fn show_text(&mut self, text: &str) -> Result<(), PvtError> {
        let style = self.colors.screen(self.state);
        self.terminal.draw(|frame| {
            frame.render_widget(CenteredText::new(text, style), frame.area());
        })?;
        Ok(())
    }

    fn show_summary(&mut self, summary: &SessionSummary) -> Result<(), PvtError> {
        let rows = summary_rows(summary);
        let colors = self.colors;
        self.terminal.draw(|frame| {
            frame.render_widget(SummaryPanel::new(&rows, colors), frame.area());
        })?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if !self.restored {
            let _ = restore_terminal();
        }
    }
}
