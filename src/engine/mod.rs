//! Trial engine: interval generation, reaction capture, event log and
//! statistics

mod capture;
mod commission;
mod event_log;
mod interval;
mod session;
mod stats;

pub use capture::{ReactionCapture, COUNTER_STEP, TICK};
pub use commission::drain_commission_errors;
pub use event_log::{Event, EventLog, LogFull, EVENT_CAPACITY};
pub use interval::{draw_interval, IntervalSchedule};
pub use session::{Session, SessionSummary};
pub use stats::{LatencySummary, Stats};
