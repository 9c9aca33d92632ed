//! PVT - terminal psychomotor vigilance test
//!
//! Presents randomly timed stimuli, measures how quickly the subject presses
//! Enter, penalizes premature keypresses, and appends one summary record per
//! session to a plain-text log.

pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod record;
pub mod report;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod ui;

pub use config::Configuration;
pub use error::PvtError;
