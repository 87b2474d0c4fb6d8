//! Runtime configuration.
//!
//! # Responsibility
//! - Hold defaults for storage, autosave, status and preview behavior.
//! - Apply `NOTEPAD_*` environment overrides.
//!
//! # Invariants
//! - Unset or blank variables keep the default.
//! - Unparseable values are rejected instead of silently ignored.

use crate::logging::default_log_level;
use crate::repo::note_store::DEFAULT_STORAGE_KEY;
use crate::search::projection::PREVIEW_CHARS;
use crate::service::autosave::DEFAULT_AUTOSAVE_SECS;
use crate::service::status::DEFAULT_STATUS_SECS;
use chrono::Duration;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const DB_FILE_NAME: &str = "notepad.sqlite3";

pub const ENV_DB_PATH: &str = "NOTEPAD_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "NOTEPAD_STORAGE_KEY";
pub const ENV_AUTOSAVE_SECS: &str = "NOTEPAD_AUTOSAVE_SECS";
pub const ENV_QUOTA_BYTES: &str = "NOTEPAD_QUOTA_BYTES";
pub const ENV_LOG_LEVEL: &str = "NOTEPAD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTEPAD_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, value, reason } => {
                write!(f, "invalid {var}=`{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings consumed by [`crate::service::session::NoteSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub autosave_interval: Duration,
    pub status_duration: Duration,
    pub preview_chars: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            autosave_interval: Duration::seconds(DEFAULT_AUTOSAVE_SECS),
            status_duration: Duration::seconds(DEFAULT_STATUS_SECS),
            preview_chars: PREVIEW_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotepadConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
    /// Byte budget for the key-value backend, `None` for unlimited.
    pub quota_bytes: Option<usize>,
    pub log_level: String,
    /// Absolute directory for log files; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub session: SessionSettings,
}

impl Default for NotepadConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            quota_bytes: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            session: SessionSettings::default(),
        }
    }
}

impl NotepadConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| {
            lookup(var)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = read(ENV_STORAGE_KEY) {
            config.storage_key = key;
        }
        if let Some(raw) = read(ENV_AUTOSAVE_SECS) {
            let secs = parse_positive(ENV_AUTOSAVE_SECS, &raw)?;
            config.session.autosave_interval = Duration::seconds(i64::from(secs));
        }
        if let Some(raw) = read(ENV_QUOTA_BYTES) {
            config.quota_bytes = Some(parse_positive(ENV_QUOTA_BYTES, &raw)? as usize);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: "must be greater than zero",
        }),
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: "expected a positive integer",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, NotepadConfig, ENV_AUTOSAVE_SECS, ENV_QUOTA_BYTES, ENV_STORAGE_KEY};
    use chrono::Duration;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn empty_environment_keeps_defaults() {
        let config = NotepadConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, NotepadConfig::default());
        assert_eq!(config.storage_key, "notePadPro_notes");
        assert_eq!(config.session.autosave_interval, Duration::seconds(30));
    }

    #[test]
    fn overrides_are_trimmed_and_parsed() {
        let config = NotepadConfig::from_lookup(lookup(&[
            (ENV_STORAGE_KEY, " scratch "),
            (ENV_AUTOSAVE_SECS, "5"),
            (ENV_QUOTA_BYTES, "4096"),
        ]))
        .unwrap();
        assert_eq!(config.storage_key, "scratch");
        assert_eq!(config.session.autosave_interval, Duration::seconds(5));
        assert_eq!(config.quota_bytes, Some(4096));
    }

    #[test]
    fn zero_or_garbage_numbers_are_rejected() {
        let err = NotepadConfig::from_lookup(lookup(&[(ENV_AUTOSAVE_SECS, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var, .. } if var == ENV_AUTOSAVE_SECS));

        let err = NotepadConfig::from_lookup(lookup(&[(ENV_QUOTA_BYTES, "lots")])).unwrap_err();
        assert!(err.to_string().contains("positive integer"));
    }
}
