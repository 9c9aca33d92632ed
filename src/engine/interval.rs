//! Interstimulus interval generation

use crate::config::{ConfigError, IntervalMode};
use rand::Rng;
use std::time::Duration;

/// Draw a whole-second interval from `[lower, upper)`.
///
/// The draw is `lower + r mod (upper - lower)` for a uniform 32-bit `r`, so
/// `upper` itself is never produced unless `lower == upper`, in which case
/// that constant is returned without consuming entropy.
pub fn draw_interval<R: Rng + ?Sized>(
    rng: &mut R,
    lower: u32,
    upper: u32,
) -> Result<u32, ConfigError> {
    if lower > upper {
        return Err(ConfigError::Constraint("n <= m"));
    }
    if lower == upper {
        return Ok(lower);
    }
    Ok(lower + rng.random::<u32>() % (upper - lower))
}

/// Supplies the wait before each stimulus according to an [`IntervalMode`]
#[derive(Debug, Clone)]
pub struct IntervalSchedule {
    mode: IntervalMode,
    lower: u32,
    upper: u32,
    /// Interval reused by every trial in fixed mode
    fixed: Option<Duration>,
}

impl IntervalSchedule {
    /// Validate the bounds and, in fixed mode, draw the session interval
    pub fn new<R: Rng + ?Sized>(
        mode: IntervalMode,
        lower: u32,
        upper: u32,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let fixed = match mode {
            IntervalMode::Fixed => Some(secs(draw_interval(rng, lower, upper)?)),
            IntervalMode::PerTrial => {
                if lower > upper {
                    return Err(ConfigError::Constraint("n <= m"));
                }
                None
            }
        };
        Ok(Self {
            mode,
            lower,
            upper,
            fixed,
        })
    }

    pub fn mode(&self) -> IntervalMode {
        self.mode
    }

    /// Interval for the next trial
    pub fn next_interval<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Duration, ConfigError> {
        match self.fixed {
            Some(interval) => Ok(interval),
            None => draw_interval(rng, self.lower, self.upper).map(secs),
        }
    }
}

fn secs(s: u32) -> Duration {
    Duration::from_secs(u64::from(s))
}
