//! Error taxonomy for a vigilance session
//!
//! Every variant is fatal: nothing is retried and nothing is appended to the
//! session log once one of these has been raised.

use crate::config::ConfigError;
use std::io;
use thiserror::Error;

/// Errors raised while setting up, running or persisting a session
#[derive(Debug, Error)]
pub enum PvtError {
    /// A numeric argument or cross-field constraint was violated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The display surface or output file could not be acquired
    #[error("{resource}: {source}")]
    ResourceInit {
        resource: String,
        #[source]
        source: io::Error,
    },

    /// The non-blocking input check reported a genuine error
    #[error("input poll failed: {0}")]
    PollFailure(#[source] io::Error),

    /// The rendered statistics record did not fit its buffer
    #[error("stats record of {len} bytes does not fit a {capacity}-byte buffer")]
    FormatOverflow { len: usize, capacity: usize },

    /// The subject aborted the session from the keyboard
    #[error("session interrupted")]
    Interrupted,

    /// Any other I/O failure, including short writes to the log
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PvtError {
    /// Wrap an I/O error raised while acquiring `resource`
    pub fn resource(resource: impl Into<String>, source: io::Error) -> Self {
        Self::ResourceInit {
            resource: resource.into(),
            source,
        }
    }
}
