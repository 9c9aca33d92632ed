//! Deterministic collaborators for driving sessions without a terminal
//!
//! [`ManualClock`] only moves when something sleeps on it, [`ScriptedInput`]
//! releases keys at fixed offsets on that clock, and [`RecordingSurface`]
//! keeps what would have been drawn.
//!
//! Built for unit tests and with the `testing` feature.

use crate::clock::Clock;
use crate::engine::SessionSummary;
use crate::error::PvtError;
use crate::input::{InputSource, Key};
use crate::ui::{Surface, VisualState};
use std::cell::Cell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// How long scripted input tolerates an empty script before failing the
/// poll, so a missing response cannot spin a test forever
const IDLE_LIMIT: Duration = Duration::from_secs(120);

/// Clock whose time advances only through `sleep` and `advance`.
///
/// Clones share the same timeline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Input that makes each key available once the clock reaches its offset
#[derive(Debug)]
pub struct ScriptedInput {
    clock: ManualClock,
    script: VecDeque<(Duration, Key)>,
    fail_polls: bool,
    reads: usize,
}

impl ScriptedInput {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            script: VecDeque::new(),
            fail_polls: false,
            reads: 0,
        }
    }

    /// Schedule `key` to become readable at `at` since clock creation.
    /// Keys must be scheduled in non-decreasing order.
    pub fn key_at(mut self, at: Duration, key: Key) -> Self {
        debug_assert!(self.script.back().map_or(true, |(last, _)| *last <= at));
        self.script.push_back((at, key));
        self
    }

    /// Make every poll report an I/O error
    pub fn fail_polls(mut self) -> Self {
        self.fail_polls = true;
        self
    }

    /// Keys not yet read
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Keys read so far
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<bool, PvtError> {
        if self.fail_polls {
            return Err(PvtError::PollFailure(io::Error::other("scripted poll failure")));
        }
        let now = self.clock.elapsed();
        match self.script.front() {
            Some((at, _)) => Ok(*at <= now),
            None if now > IDLE_LIMIT => Err(PvtError::PollFailure(io::Error::other(
                "scripted input exhausted",
            ))),
            None => Ok(false),
        }
    }

    fn read_key(&mut self) -> Result<Key, PvtError> {
        let (at, key) = self.script.pop_front().ok_or_else(|| {
            PvtError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "scripted input exhausted",
            ))
        })?;
        // A blocking read waits for the key to arrive
        let now = self.clock.elapsed();
        if at > now {
            self.clock.advance(at - now);
        }
        self.reads += 1;
        Ok(key)
    }
}

/// Surface that records draws instead of rendering them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    state: VisualState,
    /// Every palette switch, in order
    pub state_changes: Vec<VisualState>,
    /// Last text drawn and the palette it was drawn in
    pub last_text: Option<(VisualState, String)>,
    /// Number of text draws made in the stimulus palette
    pub stimulus_frames: usize,
    pub summary: Option<SessionSummary>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> VisualState {
        self.state
    }
}

impl Surface for RecordingSurface {
    fn set_visual_state(&mut self, state: VisualState) {
        self.state = state;
        self.state_changes.push(state);
    }

    fn show_text(&mut self, text: &str) -> Result<(), PvtError> {
        if self.state == VisualState::Stimulus {
            self.stimulus_frames += 1;
        }
        self.last_text = Some((self.state, text.to_string()));
        Ok(())
    }

    fn show_summary(&mut self, summary: &SessionSummary) -> Result<(), PvtError> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}
