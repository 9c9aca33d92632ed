//! Command line surface
//!
//! ```text
//! pvt [-p] [-l lapse_threshold] [-d duration] [-n interval_min]
//!     [-m interval_max] [-f falsestart_threshold] [-t timeout] [file]
//! ```

use crate::config::{
    check_range, ConfigError, Configuration, FileConfig, IntervalMode, Preset, SMALL_MAX,
    TIMEOUT_MAX,
};
use clap::Parser;
use std::path::PathBuf;

/// Environment variable naming the session log
pub const FILE_ENV: &str = "PVT_FILE";

/// Psychomotor vigilance test
#[derive(Debug, Parser)]
#[command(name = "pvt")]
#[command(about = "Psychomotor vigilance test", long_about = None)]
pub struct Cli {
    /// Run the standard 10 minute PVT instead of the 3 minute PVT-B.
    /// Applied before the other flags wherever it appears, so `-l 400 -p`
    /// keeps the lapse threshold of 400
    #[arg(short = 'p')]
    pub standard: bool,

    /// Lapse threshold in milliseconds
    #[arg(short = 'l', value_name = "LAPSE_THRESHOLD", value_parser = bounded("l", 0, SMALL_MAX))]
    pub lapse_threshold: Option<u32>,

    /// Test duration in seconds
    #[arg(short = 'd', value_name = "DURATION", value_parser = bounded("d", 0, SMALL_MAX))]
    pub duration: Option<u32>,

    /// Shortest interstimulus interval in seconds
    #[arg(short = 'n', value_name = "INTERVAL_MIN", value_parser = bounded("n", 0, SMALL_MAX))]
    pub interval_min: Option<u32>,

    /// Longest interstimulus interval in seconds (exclusive)
    #[arg(short = 'm', value_name = "INTERVAL_MAX", value_parser = bounded("m", 0, SMALL_MAX))]
    pub interval_max: Option<u32>,

    /// False start threshold in milliseconds
    #[arg(short = 'f', value_name = "FALSESTART_THRESHOLD", value_parser = bounded("f", 0, SMALL_MAX))]
    pub false_start_threshold: Option<u32>,

    /// Stimulus timeout in milliseconds
    #[arg(short = 't', value_name = "TIMEOUT", value_parser = bounded("t", 0, TIMEOUT_MAX))]
    pub timeout: Option<u32>,

    /// Draw one interval for the whole session instead of one per stimulus
    #[arg(long)]
    pub fixed_interval: bool,

    /// Do not count extra keys pressed while the stimulus is showing
    #[arg(long)]
    pub no_stimulus_penalty: bool,

    /// Seed for the interval generator (defaults to the wall clock)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Defaults file to read instead of the per-user config
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write a JSON report with every trial
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Session log to append to (overrides PVT_FILE)
    pub file: Option<PathBuf>,
}

/// Parse a base-10 integer and check it against `[min, max]`
pub fn parse_number(s: &str, min: i64, max: i64, name: &'static str) -> Result<u32, ConfigError> {
    let value: i64 = s
        .trim_start()
        .parse()
        .map_err(|_| ConfigError::NotNumeric { name })?;
    check_range(name, value, min, max)
}

fn bounded(
    name: &'static str,
    min: i64,
    max: i64,
) -> impl Fn(&str) -> Result<u32, ConfigError> + Clone + Send + Sync + 'static {
    move |s: &str| parse_number(s, min, max, name)
}

impl Cli {
    /// Build and validate the run configuration.
    ///
    /// Precedence, lowest first: PVT-B preset, defaults file, `-p`, flags.
    /// The position of `-p` on the command line does not matter.
    pub fn configuration(&self, defaults: Option<&FileConfig>) -> Result<Configuration, ConfigError> {
        let mut config = Configuration::from(Preset::Brief);
        if let Some(defaults) = defaults {
            defaults.validate()?;
            config = defaults.apply(config);
        }
        if self.standard {
            let base = config.clone();
            config = Configuration {
                interval_mode: base.interval_mode,
                penalize_stimulus_keys: base.penalize_stimulus_keys,
                ..Configuration::from(Preset::Standard)
            };
        }

        let overrides = [
            (self.interval_min, &mut config.interval_min_secs),
            (self.interval_max, &mut config.interval_max_secs),
            (self.timeout, &mut config.timeout_ms),
            (self.duration, &mut config.duration_secs),
            (self.lapse_threshold, &mut config.lapse_threshold_ms),
            (self.false_start_threshold, &mut config.false_start_threshold_ms),
        ];
        for (value, slot) in overrides {
            if let Some(v) = value {
                *slot = v;
            }
        }
        if self.fixed_interval {
            config.interval_mode = IntervalMode::Fixed;
        }
        if self.no_stimulus_penalty {
            config.penalize_stimulus_keys = false;
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolve the session log: argument, then `PVT_FILE`, then defaults file
    pub fn output_file(&self, env: Option<PathBuf>, defaults: Option<&FileConfig>) -> Option<PathBuf> {
        self.file
            .clone()
            .or(env)
            .or_else(|| defaults.and_then(|d| d.log_file.clone()))
    }
}
