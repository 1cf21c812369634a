//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work and break durations, long-break spacing
//! - First day of the week for weekly views
//! - An optional ledger file location
//!
//! Configuration is stored at `~/.config/focusledger/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{data_dir, LEDGER_FILE_NAME};
use crate::calendar::{parse_weekday, Calendar};
use crate::error::{ConfigError, StorageError};
use crate::timer::Schedule;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Timer durations and cycling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
}

/// Calendar settings for period views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Weekday name, e.g. `sat` or `monday`.
    #[serde(default = "default_first_weekday")]
    pub first_weekday: String,
}

/// Ledger file location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusledger/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

// Default functions
fn default_work_minutes() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_first_weekday() -> String {
    "sat".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
            auto_start_breaks: true,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            first_weekday: default_first_weekday(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |part| part.is_empty()) {
            return Err(invalid("config key is empty".into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| invalid("unknown config key".into()))?;
                let new_value = match obj.get(part) {
                    Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    Some(serde_json::Value::Number(_)) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    Some(serde_json::Value::Object(_)) | Some(serde_json::Value::Array(_)) => {
                        return Err(invalid("not a leaf key".into()))
                    }
                    Some(_) => serde_json::Value::String(value.into()),
                    // Optional keys are absent from the serialized form.
                    None if key == "ledger.path" => serde_json::Value::String(value.into()),
                    None => return Err(invalid("unknown config key".into())),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| invalid("unknown config key".into()))?;
        }

        Err(invalid("unknown config key".into()))
    }

    /// `<data dir>/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, StorageError> {
        Ok(data_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load from the data directory, writing defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path().map_err(|err| ConfigError::LoadFailed {
            path: PathBuf::from(CONFIG_FILE_NAME),
            message: err.to_string(),
        })?;
        Self::load_from(&path)
    }

    /// Load from an explicit path, writing defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|err| ConfigError::ParseFailed(err.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().map_err(|err| ConfigError::SaveFailed {
            path: PathBuf::from(CONFIG_FILE_NAME),
            message: err.to_string(),
        })?;
        self.save_to(&path)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|err| save_failed(err.to_string()))?;
        std::fs::write(path, content).map_err(|err| save_failed(err.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type
    /// or fails validation.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|err| ConfigError::ParseFailed(err.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first invalid key found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("timer.work_minutes", self.timer.work_minutes),
            ("timer.short_break_minutes", self.timer.short_break_minutes),
            ("timer.long_break_minutes", self.timer.long_break_minutes),
            ("timer.sessions_before_long_break", self.timer.sessions_before_long_break),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be greater than zero".into(),
                });
            }
        }
        self.calendar().map(|_| ())
    }

    /// Timer schedule derived from `[timer]`.
    pub fn schedule(&self) -> Schedule {
        Schedule {
            work_secs: u64::from(self.timer.work_minutes.max(1)) * 60,
            short_break_secs: u64::from(self.timer.short_break_minutes.max(1)) * 60,
            long_break_secs: u64::from(self.timer.long_break_minutes.max(1)) * 60,
            long_break_every: self.timer.sessions_before_long_break.max(1),
            auto_start_breaks: self.timer.auto_start_breaks,
        }
    }

    /// Calendar derived from `[calendar]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `first_weekday` is not a weekday name.
    pub fn calendar(&self) -> Result<Calendar, ConfigError> {
        parse_weekday(&self.calendar.first_weekday)
            .map(Calendar::new)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "calendar.first_weekday".into(),
                message: format!("'{}' is not a weekday", self.calendar.first_weekday),
            })
    }

    /// Ledger file: `[ledger] path` when set, else `<data dir>/ledger.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn ledger_path(&self) -> Result<PathBuf, StorageError> {
        match &self.ledger.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(LEDGER_FILE_NAME)),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            warn!(%err, "using default configuration");
            Self::default()
        })
    }
}
