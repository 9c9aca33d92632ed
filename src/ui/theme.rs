//! Colour definitions for the test screen
//!
//! The whole screen is repainted in one of two palettes: the neutral waiting
//! palette and the green stimulus palette.

use super::surface::VisualState;
use ratatui::style::{Color, Modifier, Style};

/// Colours used by the terminal surface
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Screen background in both states
    pub bg: Color,
    /// Waiting text
    pub fg: Color,
    /// Stimulus counter
    pub stimulus: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Headings on the summary screen
    pub heading: Color,
    /// Values within normal limits
    pub ok: Color,
    /// Lapses, false starts and extraneous keys
    pub warn: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            stimulus: Color::Green,
            dim: Color::DarkGray,
            heading: Color::Cyan,
            ok: Color::Green,
            warn: Color::Yellow,
        }
    }
}

impl ThemeColors {
    /// Full-screen style for a visual state
    pub fn screen(&self, state: VisualState) -> Style {
        match state {
            VisualState::Normal => Style::default().fg(self.fg).bg(self.bg),
            VisualState::Stimulus => Style::default()
                .fg(self.stimulus)
                .bg(self.bg)
                .add_modifier(Modifier::BOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stimulus_palette_differs_from_waiting() {
        let colors = ThemeColors::default();
        assert_ne!(
            colors.screen(VisualState::Normal),
            colors.screen(VisualState::Stimulus)
        );
    }

    #[test]
    fn stimulus_is_green_on_black() {
        let style = ThemeColors::default().screen(VisualState::Stimulus);
        assert_eq!(style.fg, Some(Color::Green));
        assert_eq!(style.bg, Some(Color::Black));
    }

    #[test]
    fn waiting_is_white_on_black() {
        let style = ThemeColors::default().screen(VisualState::Normal);
        assert_eq!(style.fg, Some(Color::White));
        assert_eq!(style.bg, Some(Color::Black));
    }
}
