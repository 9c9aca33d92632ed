//! Terminal User Interface components

mod surface;
mod terminal;
pub mod theme;
mod widgets;

pub use surface::{Surface, VisualState, WAIT_MESSAGE};
pub use terminal::{restore_terminal, TerminalSurface};
pub use theme::ThemeColors;
pub use widgets::*;
