//! Display surface consumed by the trial engine

use crate::engine::SessionSummary;
use crate::error::PvtError;

/// Message shown between stimuli
pub const WAIT_MESSAGE: &str = "Wait...";

/// Colour scheme of the whole screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualState {
    /// Subject is waiting for the next stimulus
    #[default]
    Normal,
    /// Stimulus is showing and a response is expected
    Stimulus,
}

/// Something the engine can draw on
pub trait Surface {
    /// Switch the screen palette; takes effect on the next draw
    fn set_visual_state(&mut self, state: VisualState);

    /// Clear the screen and draw `text` centred in the current palette
    fn show_text(&mut self, text: &str) -> Result<(), PvtError>;

    /// Replace the screen with the end-of-session summary
    fn show_summary(&mut self, summary: &SessionSummary) -> Result<(), PvtError>;
}
