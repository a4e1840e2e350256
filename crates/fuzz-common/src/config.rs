//! Configuration structures for the fuzzer.
//!
//! Supports TOML deserialization with defaults matching the stock
//! toolchain layout (`./bin/aetherc`, `./crashes`, 5 second deadline).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default path of the compiler under test.
pub const DEFAULT_COMPILER_PATH: &str = "./bin/aetherc";

/// Default crash corpus directory.
pub const DEFAULT_CRASH_DIR: &str = "./crashes";

/// Stderr substrings that mark abnormal termination out of the box.
pub const DEFAULT_FAULT_MARKERS: &[&str] = &[
    "SIGSEGV",
    "SIGABRT",
    "SIGBUS",
    "SIGILL",
    "SIGFPE",
    "Segmentation fault",
    "core dumped",
    "AddressSanitizer",
];

/// Top-level fuzzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzConfig {
    /// Path of the target binary.
    pub compiler: PathBuf,

    /// Hard wall-clock deadline per invocation.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Directory receiving crash records. Created on first write.
    pub crash_dir: PathBuf,

    /// Extension for materialized inputs and crash records.
    pub source_extension: String,

    /// Maximum stderr characters kept in a crash record header.
    pub stderr_excerpt_len: usize,

    /// Emit a throughput line every N iterations (0 disables).
    pub progress_interval: u64,

    /// Treat timeouts as failures for the final exit code.
    pub fail_on_timeout: bool,

    /// Stderr substrings classified as crashes regardless of exit status.
    pub fault_markers: Vec<String>,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from(DEFAULT_COMPILER_PATH),
            timeout: Duration::from_secs(5),
            crash_dir: PathBuf::from(DEFAULT_CRASH_DIR),
            source_extension: String::from("aether"),
            stderr_excerpt_len: 500,
            progress_interval: 100,
            fail_on_timeout: false,
            fault_markers: DEFAULT_FAULT_MARKERS
                .iter()
                .map(|m| (*m).to_string())
                .collect(),
        }
    }
}

impl FuzzConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the values are unusable.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Reject values the harness cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be non-zero".into()));
        }
        if self.source_extension.is_empty()
            || self
                .source_extension
                .contains(|c: char| c == '/' || c == '.' || c.is_whitespace())
        {
            return Err(ConfigError::Invalid(format!(
                "source_extension {:?} is not a plain extension",
                self.source_extension
            )));
        }
        if self.fault_markers.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid(
                "fault_markers must not contain empty strings".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Semantically invalid value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
