//! Reaction capture: one stimulus, one response
//!
//! A trial is a two-state machine. In `Waiting` the interstimulus interval
//! elapses and buffered keys are drained as commission errors; the stimulus
//! is then shown and the machine moves to `Observing`, which busy-polls for
//! the terminating key on a 1 ms tick.
//!
//! The on-screen counter advances by [`COUNTER_STEP`] every tick regardless
//! of how long the tick really took. It is feedback for the subject only; the
//! recorded latency is the monotonic delta between onset and response.

use super::commission::drain_commission_errors;
use super::event_log::Event;
use crate::clock::Clock;
use crate::error::PvtError;
use crate::input::{InputSource, Key};
use crate::ui::{Surface, VisualState, WAIT_MESSAGE};
use std::time::{Duration, Instant};

/// Sleep between polls while observing
pub const TICK: Duration = Duration::from_millis(1);

/// Amount the displayed counter advances per tick
pub const COUNTER_STEP: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Observing { onset: Instant, counter: u64 },
}

/// Runs a single trial against the supplied collaborators
#[derive(Debug)]
pub struct ReactionCapture {
    interval: Duration,
    penalize_stimulus_keys: bool,
    phase: Phase,
    errors: u32,
}

impl ReactionCapture {
    pub fn new(interval: Duration, penalize_stimulus_keys: bool) -> Self {
        Self {
            interval,
            penalize_stimulus_keys,
            phase: Phase::Waiting,
            errors: 0,
        }
    }

    /// Drive the trial to completion.
    ///
    /// Returns only once the terminator key is read; there is no timeout.
    /// Poll failures and Ctrl+C end the trial with an error and no event.
    pub fn run<C, I, S>(mut self, clock: &C, input: &mut I, surface: &mut S) -> Result<Event, PvtError>
    where
        C: Clock + ?Sized,
        I: InputSource + ?Sized,
        S: Surface + ?Sized,
    {
        loop {
            if let Some(event) = self.step(clock, input, surface)? {
                return Ok(event);
            }
        }
    }

    fn step<C, I, S>(
        &mut self,
        clock: &C,
        input: &mut I,
        surface: &mut S,
    ) -> Result<Option<Event>, PvtError>
    where
        C: Clock + ?Sized,
        I: InputSource + ?Sized,
        S: Surface + ?Sized,
    {
        match self.phase {
            Phase::Waiting => {
                clock.sleep(self.interval);
                self.errors += drain_commission_errors(input)?;

                surface.set_visual_state(VisualState::Stimulus);
                self.phase = Phase::Observing {
                    onset: clock.now(),
                    counter: 0,
                };
                Ok(None)
            }
            Phase::Observing { onset, counter } => {
                surface.show_text(&counter.to_string())?;

                if input.poll()? {
                    match input.read_key()? {
                        key if key.is_terminator() => {
                            let response = clock.now();
                            return self.finish(onset, response, surface).map(Some);
                        }
                        Key::Interrupt => return Err(PvtError::Interrupted),
                        _ if self.penalize_stimulus_keys => self.errors += 1,
                        _ => {}
                    }
                }

                clock.sleep(TICK);
                self.phase = Phase::Observing {
                    onset,
                    counter: counter + COUNTER_STEP,
                };
                Ok(None)
            }
        }
    }

    fn finish<S: Surface + ?Sized>(
        &self,
        onset: Instant,
        response: Instant,
        surface: &mut S,
    ) -> Result<Event, PvtError> {
        surface.set_visual_state(VisualState::Normal);
        surface.show_text(WAIT_MESSAGE)?;

        let event = Event::new(
            self.interval,
            response.saturating_duration_since(onset),
            self.errors,
        );
        log::debug!(
            "trial complete: interval={:?} latency={}ms errors={}",
            event.interval,
            event.latency_ms(),
            event.errors
        );
        Ok(event)
    }
}
