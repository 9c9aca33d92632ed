//! Persisted session record
//!
//! Each completed session appends exactly one pipe-delimited line:
//!
//! ```text
//! date|config|errors|lapses|false_starts|events
//! 2026-10-19 09:30 +02:00|(1,4,30000,180,355,100)|3|2|0|41
//! ```
//!
//! The header is written only when the file is empty at the moment a record
//! is appended, so a log accumulates any number of sessions under one header.

use crate::config::Configuration;
use crate::engine::Stats;
use crate::error::PvtError;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column header line
pub const HEADER: &str = "date|config|errors|lapses|false_starts|events\n";

/// Field separator of a record line
pub const DELIMITER: char = '|';

/// Size of the record buffer, including room for a terminator
pub const RECORD_CAPACITY: usize = 128;

/// Date format of the first column
pub const DATE_FORMAT: &str = "%F %R %Z";

/// Render one record line (with trailing newline) into a buffer of
/// `capacity` bytes.
///
/// Fails with [`PvtError::FormatOverflow`] if the line does not leave room for
/// a terminator.
pub fn format_record_bounded<Tz>(
    start: &DateTime<Tz>,
    config: &Configuration,
    stats: &Stats,
    capacity: usize,
) -> Result<String, PvtError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let line = format!(
        "{}|{}|{}|{}|{}|{}\n",
        start.format(DATE_FORMAT),
        config,
        stats.errors,
        stats.lapses,
        stats.false_starts,
        stats.stimuli_count
    );
    if line.len() >= capacity {
        return Err(PvtError::FormatOverflow {
            len: line.len(),
            capacity,
        });
    }
    Ok(line)
}

/// Render one record line into the standard [`RECORD_CAPACITY`] buffer
pub fn format_record<Tz>(
    start: &DateTime<Tz>,
    config: &Configuration,
    stats: &Stats,
) -> Result<String, PvtError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format_record_bounded(start, config, stats, RECORD_CAPACITY)
}

/// A record read back from a log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub date: String,
    pub config: [u32; 6],
    pub stats: Stats,
}

/// Split a record line on [`DELIMITER`]; `None` for the header or a
/// malformed line
pub fn parse_record(line: &str) -> Option<ParsedRecord> {
    let fields: Vec<&str> = line.trim_end_matches('\n').split(DELIMITER).collect();
    let [date, config, errors, lapses, false_starts, events] = fields.as_slice() else {
        return None;
    };

    let inner = config.strip_prefix('(')?.strip_suffix(')')?;
    let values = inner
        .split(',')
        .map(|v| v.parse::<u32>().ok())
        .collect::<Option<Vec<u32>>>()?;
    let config: [u32; 6] = values.try_into().ok()?;

    Some(ParsedRecord {
        date: date.to_string(),
        config,
        stats: Stats {
            errors: errors.parse().ok()?,
            lapses: lapses.parse().ok()?,
            false_starts: false_starts.parse().ok()?,
            stimuli_count: events.parse().ok()?,
        },
    })
}

/// Append-only session log file
#[derive(Debug)]
pub struct LogSink {
    file: File,
    path: PathBuf,
}

impl LogSink {
    /// Open (creating if needed) `path` for appending.
    ///
    /// New files are readable and writable by the owner only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PvtError> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.read(true).append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let file = options
            .open(&path)
            .map_err(|e| PvtError::resource(path.display().to_string(), e))?;

        log::debug!("opened session log {}", path.display());
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a formatted record, preceded by the header if the file is
    /// empty at the moment of writing
    pub fn append(&mut self, record: &str) -> Result<(), PvtError> {
        if self.file.metadata()?.len() == 0 {
            self.file.write_all(HEADER.as_bytes())?;
        }
        self.file.write_all(record.as_bytes())?;
        self.file.flush()?;
        log::info!("appended session record to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use std::env;
    use std::fs;

    fn temp_log_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("pvt-record-{}-{}.log", name, std::process::id()))
    }

    fn sample_stats() -> Stats {
        Stats {
            errors: 3,
            lapses: 2,
            false_starts: 1,
            stimuli_count: 41,
        }
    }

    fn start() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-19T09:30:12+02:00").unwrap()
    }

    #[test]
    fn record_layout() {
        let line = format_record(&start(), &Configuration::default(), &sample_stats()).unwrap();
        assert_eq!(line, "2026-10-19 09:30 +02:00|(1,4,30000,180,355,100)|3|2|1|41\n");
    }

    #[test]
    fn record_fields_roundtrip() {
        let config = Configuration::default();
        let stats = sample_stats();
        let line = format_record(&Utc::now(), &config, &stats).unwrap();

        let parsed = parse_record(&line).expect("record should parse");
        assert_eq!(parsed.config, config.tuple());
        assert_eq!(parsed.stats, stats);
    }

    #[test]
    fn header_is_not_a_record() {
        assert_eq!(parse_record(HEADER), None);
    }

    #[test]
    fn overflow_is_detected() {
        let err = format_record_bounded(&start(), &Configuration::default(), &sample_stats(), 32)
            .unwrap_err();
        assert!(matches!(err, PvtError::FormatOverflow { capacity: 32, .. }));
    }

    #[test]
    fn line_exactly_filling_buffer_overflows() {
        let line = format_record(&start(), &Configuration::default(), &sample_stats()).unwrap();
        let result =
            format_record_bounded(&start(), &Configuration::default(), &sample_stats(), line.len());
        assert!(result.is_err());
        assert!(format_record_bounded(
            &start(),
            &Configuration::default(),
            &sample_stats(),
            line.len() + 1
        )
        .is_ok());
    }

    #[test]
    fn largest_configuration_fits_standard_buffer() {
        let mut config = Configuration::default();
        config.interval_min_secs = 2048;
        config.interval_max_secs = 2048;
        config.timeout_ms = i32::MAX as u32;
        config.duration_secs = 2048;
        config.lapse_threshold_ms = 2048;
        config.false_start_threshold_ms = 2048;
        let stats = Stats {
            errors: u32::MAX as u64,
            lapses: 2048,
            false_starts: 2048,
            stimuli_count: 2048,
        };
        assert!(format_record(&start(), &config, &stats).is_ok());
    }

    #[test]
    fn header_written_once_for_empty_file() {
        let path = temp_log_path("fresh");
        let _ = fs::remove_file(&path);

        let mut sink = LogSink::open(&path).unwrap();
        sink.append("a|(1,1,1,1,1,1)|0|0|0|0\n").unwrap();
        sink.append("b|(1,1,1,1,1,1)|0|0|0|0\n").unwrap();
        drop(sink);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches(HEADER).count(), 1);
        assert!(contents.starts_with(HEADER));
        assert_eq!(contents.lines().count(), 3);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn no_header_for_existing_content() {
        let path = temp_log_path("existing");
        fs::write(&path, "previous line\n").unwrap();

        let mut sink = LogSink::open(&path).unwrap();
        sink.append("x|(1,1,1,1,1,1)|0|0|0|0\n").unwrap();
        drop(sink);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "previous line\nx|(1,1,1,1,1,1)|0|0|0|0\n");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn reopening_appends_without_second_header() {
        let path = temp_log_path("reopen");
        let _ = fs::remove_file(&path);

        LogSink::open(&path).unwrap().append("first\n").unwrap();
        LogSink::open(&path).unwrap().append("second\n").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, format!("{}first\nsecond\n", HEADER));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn sinks_opened_on_one_empty_file_share_a_header() {
        let path = temp_log_path("shared");
        let _ = fs::remove_file(&path);

        let mut first = LogSink::open(&path).unwrap();
        let mut second = LogSink::open(&path).unwrap();
        first.append("a|(1,1,1,1,1,1)|0|0|0|0\n").unwrap();
        second.append("b|(1,1,1,1,1,1)|0|0|0|0\n").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches(HEADER).count(), 1);
        assert_eq!(
            contents,
            format!("{}a|(1,1,1,1,1,1)|0|0|0|0\nb|(1,1,1,1,1,1)|0|0|0|0\n", HEADER)
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unopenable_path_is_resource_error() {
        let result = LogSink::open("/nonexistent/dir/pvt.log");
        assert!(matches!(result, Err(PvtError::ResourceInit { .. })));
    }
}
