//! Per-trial events and the bounded log that holds them

use std::time::Duration;
use thiserror::Error;

/// Maximum number of trials recorded in one session
pub const EVENT_CAPACITY: usize = 2048;

/// Outcome of a single stimulus presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Interstimulus interval that preceded the stimulus
    pub interval: Duration,
    /// Monotonic delta between stimulus onset and the terminating key
    pub latency: Duration,
    /// Extraneous keypresses attributed to this trial
    pub errors: u32,
}

impl Event {
    pub fn new(interval: Duration, latency: Duration, errors: u32) -> Self {
        Self {
            interval,
            latency,
            errors,
        }
    }

    /// Reaction latency truncated to whole milliseconds
    pub fn latency_ms(&self) -> u64 {
        self.latency.as_millis() as u64
    }
}

/// Returned when pushing into a log that has reached its capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event log is full ({capacity} events)")]
pub struct LogFull {
    pub capacity: usize,
}

/// Ordered, append-only sequence of events with a hard ceiling.
///
/// Occupancy is the explicit length of the log; no latency value is
/// treated as a marker, so a zero-latency event is still a recorded trial.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Vec<Event>,
    capacity: usize,
}

impl EventLog {
    /// Create a log with the standard capacity
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CAPACITY)
    }

    /// Create a log holding at most `capacity` events, never more than
    /// [`EVENT_CAPACITY`]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(EVENT_CAPACITY);
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event, refusing once the ceiling is reached
    pub fn push(&mut self, event: Event) -> Result<(), LogFull> {
        if self.is_full() {
            return Err(LogFull {
                capacity: self.capacity,
            });
        }
        self.events.push(event);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.events.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Recorded events in trial order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(latency_ms: u64) -> Event {
        Event::new(Duration::from_secs(2), Duration::from_millis(latency_ms), 0)
    }

    #[test]
    fn new_log_is_empty_with_standard_capacity() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert!(!log.is_full());
        assert_eq!(log.capacity(), EVENT_CAPACITY);
    }

    #[test]
    fn push_preserves_order() {
        let mut log = EventLog::new();
        for ms in [300, 250, 410] {
            log.push(event(ms)).unwrap();
        }
        let latencies: Vec<u64> = log.iter().map(Event::latency_ms).collect();
        assert_eq!(latencies, vec![300, 250, 410]);
    }

    #[test]
    fn push_refuses_past_capacity() {
        let mut log = EventLog::with_capacity(2);
        log.push(event(1)).unwrap();
        log.push(event(2)).unwrap();
        assert!(log.is_full());
        assert_eq!(log.push(event(3)), Err(LogFull { capacity: 2 }));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn capacity_is_clamped_to_ceiling() {
        let log = EventLog::with_capacity(10_000);
        assert_eq!(log.capacity(), EVENT_CAPACITY);
    }

    #[test]
    fn zero_latency_event_is_still_counted() {
        let mut log = EventLog::new();
        log.push(event(0)).unwrap();
        log.push(event(250)).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn latency_ms_truncates() {
        let e = Event::new(Duration::ZERO, Duration::from_micros(354_999), 0);
        assert_eq!(e.latency_ms(), 354);
    }
}
