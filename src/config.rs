//! Test configuration
//!
//! A [`Configuration`] is assembled once per run: start from a [`Preset`],
//! layer an optional defaults file on top, then apply command line overrides.
//! After [`Configuration::validate`] succeeds the value is handed to the
//! session by value and never changes again.
//!
//! ## Defaults File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/pvt/config.toml` |
//! | macOS | `~/Library/Application Support/pvt/config.toml` |
//! | Windows | `%APPDATA%\pvt\config.toml` |
//!
//! ## Example
//!
//! ```
//! use pvt::config::{Configuration, Preset};
//!
//! let mut config = Configuration::from(Preset::Brief);
//! config.lapse_threshold_ms = 400;
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration assembly and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Argument was not an integer
    #[error("constraint ({name} : numeric) failed")]
    NotNumeric { name: &'static str },
    /// Argument fell outside its declared range
    #[error("constraint {min} <= {name} <= {max} failed")]
    OutOfRange {
        name: &'static str,
        min: i64,
        max: i64,
    },
    /// Cross-field constraint violated
    #[error("constraint {0} failed")]
    Constraint(&'static str),
    /// Failed to determine config directory
    #[error("could not determine config directory")]
    NoConfigDir,
    /// IO error reading the defaults file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse the defaults file
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Named parameter sets for the two standard test variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 3 minute PVT-B
    Brief,
    /// 10 minute PVT
    Standard,
}

/// How interstimulus intervals are drawn over a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntervalMode {
    /// A fresh interval before every stimulus
    #[default]
    PerTrial,
    /// One interval drawn at session start and reused for every stimulus
    Fixed,
}

/// Immutable parameters of one test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Lower interstimulus interval bound in seconds (`n`)
    pub interval_min_secs: u32,
    /// Upper interstimulus interval bound in seconds (`m`)
    pub interval_max_secs: u32,
    /// Stimulus timeout in milliseconds (`t`)
    pub timeout_ms: u32,
    /// Session duration in seconds (`d`)
    pub duration_secs: u32,
    /// Reactions at or above this many ms are lapses (`l`)
    pub lapse_threshold_ms: u32,
    /// Reactions at or below this many ms are false starts (`f`)
    pub false_start_threshold_ms: u32,
    /// Interval drawing strategy
    pub interval_mode: IntervalMode,
    /// Count non-terminator keys pressed during the stimulus as errors
    pub penalize_stimulus_keys: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Preset::Brief.into()
    }
}

impl From<Preset> for Configuration {
    fn from(preset: Preset) -> Self {
        let (n, m, t, d, l, f) = match preset {
            Preset::Brief => (1, 4, 30 * 1000, 3 * 60, 355, 100),
            Preset::Standard => (2, 10, 30 * 1000, 10 * 60, 500, 100),
        };
        Self {
            interval_min_secs: n,
            interval_max_secs: m,
            timeout_ms: t,
            duration_secs: d,
            lapse_threshold_ms: l,
            false_start_threshold_ms: f,
            interval_mode: IntervalMode::PerTrial,
            penalize_stimulus_keys: true,
        }
    }
}

impl Configuration {
    /// Check the cross-field constraints, in the order they are reported
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_min_secs > self.interval_max_secs {
            return Err(ConfigError::Constraint("n <= m"));
        }
        if self.interval_max_secs >= self.duration_secs {
            return Err(ConfigError::Constraint("m < d"));
        }
        if self.lapse_threshold_ms >= self.timeout_ms {
            return Err(ConfigError::Constraint("l < t"));
        }
        if i64::from(self.false_start_threshold_ms) >= i64::from(self.lapse_threshold_ms) - 1 {
            return Err(ConfigError::Constraint("f < l - 1"));
        }
        Ok(())
    }

    /// Session duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }

    /// The six numeric parameters in record order `(n, m, t, d, l, f)`
    pub fn tuple(&self) -> [u32; 6] {
        [
            self.interval_min_secs,
            self.interval_max_secs,
            self.timeout_ms,
            self.duration_secs,
            self.lapse_threshold_ms,
            self.false_start_threshold_ms,
        ]
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [n, m, t, d, l, fs] = self.tuple();
        write!(f, "({},{},{},{},{},{})", n, m, t, d, l, fs)
    }
}

/// Upper bound for the second- and threshold-valued parameters
pub const SMALL_MAX: i64 = 2048;

/// Upper bound for the stimulus timeout
pub const TIMEOUT_MAX: i64 = i32::MAX as i64;

/// Check one named parameter against `[min, max]`
pub fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<u32, ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange { name, min, max });
    }
    u32::try_from(value).map_err(|_| ConfigError::OutOfRange { name, min, max })
}

/// Returns the path of the defaults file. The directory is not created.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("pvt").join("config.toml"))
}

/// Optional per-user defaults, every key may be omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub preset: Option<Preset>,
    pub n: Option<u32>,
    pub m: Option<u32>,
    pub t: Option<u32>,
    pub d: Option<u32>,
    pub l: Option<u32>,
    pub f: Option<u32>,
    pub interval_mode: Option<IntervalMode>,
    pub penalize_stimulus_keys: Option<bool>,
    /// Session log used when neither the argument nor `PVT_FILE` names one
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    /// Load the defaults file from its platform location.
    ///
    /// Returns `None` if no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Load defaults from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let file: Self = toml::from_str(&contents)?;
        file.validate()?;
        Ok(file)
    }

    /// Range-check every numeric key that is present, with the same bounds
    /// as the matching command line flag
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("n", self.n, SMALL_MAX),
            ("m", self.m, SMALL_MAX),
            ("t", self.t, TIMEOUT_MAX),
            ("d", self.d, SMALL_MAX),
            ("l", self.l, SMALL_MAX),
            ("f", self.f, SMALL_MAX),
        ];
        for (name, value, max) in fields {
            if let Some(v) = value {
                check_range(name, i64::from(v), 0, max)?;
            }
        }
        Ok(())
    }

    /// Layer these defaults over a base configuration
    pub fn apply(&self, mut config: Configuration) -> Configuration {
        if let Some(preset) = self.preset {
            config = preset.into();
        }
        let overrides = [
            (self.n, &mut config.interval_min_secs),
            (self.m, &mut config.interval_max_secs),
            (self.t, &mut config.timeout_ms),
            (self.d, &mut config.duration_secs),
            (self.l, &mut config.lapse_threshold_ms),
            (self.f, &mut config.false_start_threshold_ms),
        ];
        for (value, slot) in overrides {
            if let Some(v) = value {
                *slot = v;
            }
        }
        if let Some(mode) = self.interval_mode {
            config.interval_mode = mode;
        }
        if let Some(penalize) = self.penalize_stimulus_keys {
            config.penalize_stimulus_keys = penalize;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!("pvt-config-test-{}.toml", std::process::id()))
    }

    #[test]
    fn brief_preset_values() {
        let config = Configuration::from(Preset::Brief);
        assert_eq!(config.tuple(), [1, 4, 30_000, 180, 355, 100]);
        assert_eq!(config.interval_mode, IntervalMode::PerTrial);
        assert!(config.penalize_stimulus_keys);
    }

    #[test]
    fn standard_preset_values() {
        let config = Configuration::from(Preset::Standard);
        assert_eq!(config.tuple(), [2, 10, 30_000, 600, 500, 100]);
    }

    #[test]
    fn default_is_brief() {
        assert_eq!(Configuration::default(), Configuration::from(Preset::Brief));
    }

    #[test]
    fn presets_are_valid() {
        assert!(Configuration::from(Preset::Brief).validate().is_ok());
        assert!(Configuration::from(Preset::Standard).validate().is_ok());
    }

    #[test]
    fn rejects_inverted_interval_bounds() {
        let mut config = Configuration::default();
        config.interval_min_secs = 5;
        config.interval_max_secs = 4;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "constraint n <= m failed");
    }

    #[test]
    fn rejects_interval_not_shorter_than_session() {
        let mut config = Configuration::default();
        config.interval_max_secs = 180;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "constraint m < d failed");
    }

    #[test]
    fn rejects_lapse_threshold_at_timeout() {
        let mut config = Configuration::default();
        config.lapse_threshold_ms = config.timeout_ms;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "constraint l < t failed");
    }

    #[test]
    fn false_start_must_sit_two_below_lapse() {
        let mut config = Configuration::default();
        config.lapse_threshold_ms = 102;
        config.false_start_threshold_ms = 100;
        assert!(config.validate().is_ok());

        config.lapse_threshold_ms = 101;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "constraint f < l - 1 failed");
    }

    #[test]
    fn zero_lapse_threshold_does_not_underflow() {
        let mut config = Configuration::default();
        config.lapse_threshold_ms = 0;
        config.false_start_threshold_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Constraint("f < l - 1"))
        ));
    }

    #[test]
    fn equal_interval_bounds_are_allowed() {
        let mut config = Configuration::default();
        config.interval_min_secs = 3;
        config.interval_max_secs = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn display_renders_record_tuple() {
        let config = Configuration::default();
        assert_eq!(config.to_string(), "(1,4,30000,180,355,100)");
    }

    #[test]
    fn duration_in_seconds() {
        assert_eq!(Configuration::default().duration(), Duration::from_secs(180));
    }

    #[test]
    fn file_config_overrides_selected_fields() {
        let file: FileConfig = toml::from_str(
            r#"
l = 400
d = 300
interval_mode = "fixed"
"#,
        )
        .expect("Failed to deserialize");

        let config = file.apply(Configuration::default());
        assert_eq!(config.tuple(), [1, 4, 30_000, 300, 400, 100]);
        assert_eq!(config.interval_mode, IntervalMode::Fixed);
    }

    #[test]
    fn file_config_preset_applies_before_fields() {
        let file: FileConfig = toml::from_str(
            r#"
preset = "standard"
f = 150
"#,
        )
        .expect("Failed to deserialize");

        let config = file.apply(Configuration::default());
        assert_eq!(config.tuple(), [2, 10, 30_000, 600, 500, 150]);
    }

    #[test]
    fn file_config_values_are_range_checked() {
        let file: FileConfig = toml::from_str("d = 100000\nl = 9000\nf = 5000\n")
            .expect("Failed to deserialize");
        assert!(matches!(
            file.validate(),
            Err(ConfigError::OutOfRange {
                name: "d",
                min: 0,
                max: 2048
            })
        ));

        let file = FileConfig {
            t: Some(i32::MAX as u32 + 1),
            ..FileConfig::default()
        };
        assert_eq!(
            file.validate().unwrap_err().to_string(),
            "constraint 0 <= t <= 2147483647 failed"
        );

        let file = FileConfig {
            t: Some(i32::MAX as u32),
            d: Some(2048),
            ..FileConfig::default()
        };
        assert!(file.validate().is_ok());
    }

    #[test]
    fn file_config_load_rejects_out_of_range_values() {
        let path = env::temp_dir().join(format!("pvt-config-range-{}.toml", std::process::id()));
        fs::write(&path, "l = 9000\n").expect("write");

        let result = FileConfig::load_from(&path);
        assert!(matches!(
            result,
            Err(ConfigError::OutOfRange { name: "l", .. })
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn check_range_bounds() {
        assert_eq!(check_range("n", 0, 0, SMALL_MAX).unwrap(), 0);
        assert_eq!(check_range("n", 2048, 0, SMALL_MAX).unwrap(), 2048);
        assert!(check_range("n", 2049, 0, SMALL_MAX).is_err());
        assert!(check_range("n", -1, 0, SMALL_MAX).is_err());
    }

    #[test]
    fn file_config_rejects_unknown_keys() {
        let result: Result<FileConfig, _> = toml::from_str("lapse = 3");
        assert!(result.is_err());
    }

    #[test]
    fn file_config_load_from_roundtrip() {
        let path = temp_config_path();
        fs::write(&path, "t = 20000\nlog_file = \"/var/tmp/pvt.log\"\n").expect("write");

        let loaded = FileConfig::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded.t, Some(20_000));
        assert_eq!(loaded.log_file, Some(PathBuf::from("/var/tmp/pvt.log")));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_config_load_missing_path_fails() {
        let result = FileConfig::load_from(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn config_path_is_namespaced() {
        if let Ok(path) = config_path() {
            assert!(path.to_string_lossy().contains("pvt"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
