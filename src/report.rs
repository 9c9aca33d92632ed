//! Detailed session report and export functionality
//!
//! The pipe-delimited record keeps only aggregates. The JSON report written
//! by `--report` additionally carries every trial.

use crate::config::Configuration;
use crate::engine::{Event, LatencySummary, Stats};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete session report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Parameters the session ran with
    pub configuration: Configuration,
    /// Aggregate metrics, identical to the persisted record
    pub stats: Stats,
    /// Descriptive reaction-time figures
    pub latency: LatencySummary,
    /// Per-trial detail in trial order
    pub trials: Vec<TrialEntry>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Session start, RFC 3339 local time
    pub started_at: String,
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
}

/// Single trial entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialEntry {
    pub interval_secs: f64,
    pub latency_ms: u64,
    pub errors: u32,
}

impl From<&Event> for TrialEntry {
    fn from(event: &Event) -> Self {
        Self {
            interval_secs: event.interval.as_secs_f64(),
            latency_ms: event.latency_ms(),
            errors: event.errors,
        }
    }
}

impl SessionReport {
    /// Create a new session report
    pub fn new(started_at: DateTime<Local>, configuration: &Configuration, events: &[Event]) -> Self {
        Self {
            metadata: ReportMetadata {
                started_at: started_at.to_rfc3339(),
                generated_at: Local::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            configuration: configuration.clone(),
            stats: Stats::compute(events, configuration),
            latency: LatencySummary::compute(events),
            trials: events.iter().map(TrialEntry::from).collect(),
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
