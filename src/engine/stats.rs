//! Reduction of an event log into session metrics

use super::event_log::{Event, EVENT_CAPACITY};
use crate::config::Configuration;
use serde::{Deserialize, Serialize};

/// Aggregate vigilance metrics for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Extraneous keypresses summed over all trials
    pub errors: u64,
    /// Trials at or above the lapse threshold
    pub lapses: u32,
    /// Trials at or below the false-start threshold
    pub false_starts: u32,
    /// Number of trials scanned
    pub stimuli_count: u32,
}

impl Stats {
    /// Scan `events` in trial order, stopping at the log ceiling.
    ///
    /// Pure: the result depends only on the events and the two thresholds.
    pub fn compute(events: &[Event], config: &Configuration) -> Self {
        let lapse = u64::from(config.lapse_threshold_ms);
        let false_start = u64::from(config.false_start_threshold_ms);

        let mut stats = Self::default();
        for event in events.iter().take(EVENT_CAPACITY) {
            let ms = event.latency_ms();
            if ms >= lapse {
                stats.lapses += 1;
            }
            if ms <= false_start {
                stats.false_starts += 1;
            }
            stats.errors += u64::from(event.errors);
            stats.stimuli_count += 1;
        }
        stats
    }
}

/// Descriptive reaction-time figures shown alongside [`Stats`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatencySummary {
    pub mean_ms: Option<f64>,
    pub median_ms: Option<f64>,
    pub fastest_ms: Option<u64>,
    pub slowest_ms: Option<u64>,
}

impl LatencySummary {
    pub fn compute(events: &[Event]) -> Self {
        let mut samples: Vec<u64> = events
            .iter()
            .take(EVENT_CAPACITY)
            .map(Event::latency_ms)
            .collect();
        if samples.is_empty() {
            return Self::default();
        }
        samples.sort_unstable();

        let n = samples.len();
        let mean = samples.iter().sum::<u64>() as f64 / n as f64;
        let median = if n % 2 == 1 {
            samples[n / 2] as f64
        } else {
            (samples[n / 2 - 1] + samples[n / 2]) as f64 / 2.0
        };

        Self {
            mean_ms: Some(mean),
            median_ms: Some(median),
            fastest_ms: samples.first().copied(),
            slowest_ms: samples.last().copied(),
        }
    }
}
