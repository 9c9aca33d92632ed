//! Trial driver
//!
//! A [`Session`] owns everything that used to be process-wide in a vigilance
//! test: the configuration, the random source and the event log. Trials run
//! back to back until the session duration has elapsed or the log is full.

use super::capture::ReactionCapture;
use super::interval::IntervalSchedule;
use super::event_log::EventLog;
use super::stats::{LatencySummary, Stats};
use crate::clock::Clock;
use crate::config::Configuration;
use crate::error::PvtError;
use crate::input::InputSource;
use crate::ui::{Surface, VisualState, WAIT_MESSAGE};
use rand::Rng;

/// Everything the end-of-session screen and report need
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub configuration: Configuration,
    pub stats: Stats,
    pub latency: LatencySummary,
}

/// One run of the test
#[derive(Debug)]
pub struct Session<R: Rng> {
    config: Configuration,
    rng: R,
    log: EventLog,
}

impl<R: Rng> Session<R> {
    /// Create a session over a validated configuration
    pub fn new(config: Configuration, rng: R) -> Result<Self, PvtError> {
        Self::with_log(config, rng, EventLog::new())
    }

    /// Create a session recording into a caller-supplied (possibly smaller) log
    pub fn with_log(config: Configuration, rng: R, log: EventLog) -> Result<Self, PvtError> {
        config.validate()?;
        Ok(Self { config, rng, log })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Run trials until the duration elapses or the log fills, then reduce.
    ///
    /// The duration is checked between trials only; a trial in progress is
    /// always allowed to finish.
    pub fn run<C, I, S>(&mut self, clock: &C, input: &mut I, surface: &mut S) -> Result<Stats, PvtError>
    where
        C: Clock + ?Sized,
        I: InputSource + ?Sized,
        S: Surface + ?Sized,
    {
        let mut schedule = IntervalSchedule::new(
            self.config.interval_mode,
            self.config.interval_min_secs,
            self.config.interval_max_secs,
            &mut self.rng,
        )?;

        surface.set_visual_state(VisualState::Normal);
        surface.show_text(WAIT_MESSAGE)?;

        let duration = self.config.duration();
        let start = clock.now();
        log::info!(
            "session started: config={} mode={:?}",
            self.config,
            schedule.mode()
        );

        while clock.now().saturating_duration_since(start) < duration && !self.log.is_full() {
            let interval = schedule.next_interval(&mut self.rng)?;
            let event = ReactionCapture::new(interval, self.config.penalize_stimulus_keys)
                .run(clock, input, surface)?;
            if self.log.push(event).is_err() {
                break;
            }
        }

        if self.log.is_full() {
            log::warn!("event log reached {} events", self.log.capacity());
        }
        let stats = self.stats();
        log::info!(
            "session finished: events={} lapses={} false_starts={} errors={}",
            stats.stimuli_count,
            stats.lapses,
            stats.false_starts,
            stats.errors
        );
        Ok(stats)
    }

    /// Reduce the events recorded so far
    pub fn stats(&self) -> Stats {
        Stats::compute(self.log.events(), &self.config)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            configuration: self.config.clone(),
            stats: self.stats(),
            latency: LatencySummary::compute(self.log.events()),
        }
    }
}
