//! TOML-based application configuration.
//!
//! Stores user preferences only:
//! - Session length
//! - Watchdog self-check interval and inactivity threshold
//! - Mood flash / alarm pulse durations
//! - Free-plan task quota
//! - Statistics averaging window
//!
//! Configuration is stored at `~/.config/focuspet/config.toml`. Session
//! state itself is never written to disk.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};

/// Session-length configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_focus_duration_secs")]
    pub focus_duration_secs: u64,
}

/// Activity watchdog configuration.
///
/// The two values are independent; no relationship between them is enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchdogConfig {
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default = "default_inactivity_threshold_secs")]
    pub inactivity_threshold_secs: u64,
}

/// Pet mood presentation timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodConfig {
    #[serde(default = "default_celebrate_flash_ms")]
    pub celebrate_flash_ms: u64,
    #[serde(default = "default_alarm_pulse_ms")]
    pub alarm_pulse_ms: u64,
}

/// Task quota supplied by the paywall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_free_task_limit")]
    pub free_task_limit: usize,
    #[serde(default)]
    pub unlocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_average_window_days")]
    pub average_window_days: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focuspet/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub watchdog: WatchdogConfig,
    #[serde(default)]
    pub mood: MoodConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Upper bound for every second-based timing value: one day.
pub const MAX_TIMING_SECS: u64 = 24 * 60 * 60;
/// Upper bound for the millisecond-based mood timings: one minute.
pub const MAX_MOOD_MS: u64 = 60 * 1000;
/// Upper bound for the statistics window.
pub const MAX_WINDOW_DAYS: u32 = 366;

// Values outside `1..=max` are clamped, so a hand-built config can never
// yield a zero, negative or out-of-range duration.
fn bounded_secs(secs: u64) -> Duration {
    let secs = secs.clamp(1, MAX_TIMING_SECS);
    i64::try_from(secs).map_or(Duration::seconds(1), Duration::seconds)
}

fn bounded_millis(ms: u64) -> Duration {
    let ms = ms.clamp(1, MAX_MOOD_MS);
    i64::try_from(ms).map_or(Duration::milliseconds(1), Duration::milliseconds)
}

impl WatchdogConfig {
    pub fn check_interval(&self) -> Duration {
        bounded_secs(self.check_interval_secs)
    }

    pub fn inactivity_threshold(&self) -> Duration {
        bounded_secs(self.inactivity_threshold_secs)
    }
}

impl MoodConfig {
    pub fn celebrate_flash(&self) -> Duration {
        bounded_millis(self.celebrate_flash_ms)
    }

    pub fn alarm_pulse(&self) -> Duration {
        bounded_millis(self.alarm_pulse_ms)
    }
}

// Default functions
fn default_focus_duration_secs() -> u64 {
    25 * 60
}
fn default_check_interval_secs() -> u64 {
    10
}
fn default_inactivity_threshold_secs() -> u64 {
    30
}
fn default_celebrate_flash_ms() -> u64 {
    1500
}
fn default_alarm_pulse_ms() -> u64 {
    1000
}
fn default_free_task_limit() -> usize {
    4
}
fn default_average_window_days() -> u32 {
    7
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            focus_duration_secs: default_focus_duration_secs(),
        }
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            inactivity_threshold_secs: default_inactivity_threshold_secs(),
        }
    }
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            celebrate_flash_ms: default_celebrate_flash_ms(),
            alarm_pulse_ms: default_alarm_pulse_ms(),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_task_limit: default_free_task_limit(),
            unlocked: false,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            average_window_days: default_average_window_days(),
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
        let mut current = root;
        while let Some(part) = parts.next() {
            if part.is_empty() {
                break;
            }
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(ConfigError::UnknownKey(key.to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default location: `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or is
    /// invalid, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounded = [
            ("session.focus_duration_secs", self.session.focus_duration_secs, MAX_TIMING_SECS),
            ("watchdog.check_interval_secs", self.watchdog.check_interval_secs, MAX_TIMING_SECS),
            (
                "watchdog.inactivity_threshold_secs",
                self.watchdog.inactivity_threshold_secs,
                MAX_TIMING_SECS,
            ),
            ("mood.celebrate_flash_ms", self.mood.celebrate_flash_ms, MAX_MOOD_MS),
            ("mood.alarm_pulse_ms", self.mood.alarm_pulse_ms, MAX_MOOD_MS),
            (
                "stats.average_window_days",
                u64::from(self.stats.average_window_days),
                u64::from(MAX_WINDOW_DAYS),
            ),
        ];
        for (key, value, max) in bounded {
            if !(1..=max).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be between 1 and {max}"),
                });
            }
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The change is validated but
    /// not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// as the key's type, or the result fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.focus_duration_secs, 1500);
        assert_eq!(parsed.quota.free_task_limit, 4);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.session.focus_duration_secs, 1500);
        assert_eq!(cfg.watchdog.check_interval_secs, 10);
        assert_eq!(cfg.watchdog.inactivity_threshold_secs, 30);
        assert_eq!(cfg.mood.celebrate_flash_ms, 1500);
        assert_eq!(cfg.mood.alarm_pulse_ms, 1000);
        assert!(!cfg.quota.unlocked);
        assert_eq!(cfg.stats.average_window_days, 7);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let parsed: Config = toml::from_str("[watchdog]\ninactivity_threshold_secs = 45\n").unwrap();
        assert_eq!(parsed.watchdog.inactivity_threshold_secs, 45);
        assert_eq!(parsed.watchdog.check_interval_secs, 10);
        assert_eq!(parsed.session.focus_duration_secs, 1500);
    }

    #[test]
    fn break_length_key_is_gone() {
        let parsed: Config = toml::from_str("[session]\nshort_break_secs = 300\n").unwrap();
        assert_eq!(parsed.session.focus_duration_secs, 1500);
        assert!(parsed.get("session.short_break_secs").is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("quota.unlocked").as_deref(), Some("false"));
        assert_eq!(cfg.get("session.focus_duration_secs").as_deref(), Some("1500"));
        assert!(cfg.get("session.missing_key").is_none());
        assert!(cfg.get("session").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("quota.unlocked", "true").unwrap();
        cfg.set("watchdog.check_interval_secs", "5").unwrap();
        assert!(cfg.quota.unlocked);
        assert_eq!(cfg.watchdog.check_interval_secs, 5);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("watchdog.nonexistent", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("", "1").is_err());
        assert!(cfg.set("session", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_type_and_zero() {
        let mut cfg = Config::default();
        assert!(cfg.set("quota.unlocked", "maybe").is_err());
        assert!(cfg.set("session.focus_duration_secs", "-3").is_err());
        assert!(cfg.set("session.focus_duration_secs", "0").is_err());
        assert_eq!(cfg.session.focus_duration_secs, 1500);
    }

    #[test]
    fn set_rejects_values_beyond_upper_bound() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("watchdog.inactivity_threshold_secs", "100000000000000000"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(cfg.set("watchdog.check_interval_secs", "18446744073709551615").is_err());
        assert!(cfg.set("mood.celebrate_flash_ms", "18446744073709551615").is_err());
        assert!(cfg.set("session.focus_duration_secs", "86401").is_err());
        assert!(cfg.set("stats.average_window_days", "367").is_err());
        cfg.set("session.focus_duration_secs", "86400").unwrap();

        assert_eq!(cfg.watchdog.inactivity_threshold_secs, 30);
        assert_eq!(cfg.watchdog.check_interval_secs, 10);
        assert_eq!(cfg.mood.celebrate_flash_ms, 1500);
    }

    #[test]
    fn durations_are_clamped_for_hand_built_configs() {
        let watchdog = WatchdogConfig {
            check_interval_secs: u64::MAX,
            inactivity_threshold_secs: 0,
        };
        assert_eq!(watchdog.check_interval(), Duration::seconds(86_400));
        assert_eq!(watchdog.inactivity_threshold(), Duration::seconds(1));

        let mood = MoodConfig {
            celebrate_flash_ms: u64::MAX,
            alarm_pulse_ms: 250,
        };
        assert_eq!(mood.celebrate_flash(), Duration::milliseconds(60_000));
        assert_eq!(mood.alarm_pulse(), Duration::milliseconds(250));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.session.focus_duration_secs, 1500);
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("mood.celebrate_flash_ms", "900").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.mood.celebrate_flash_ms, 900);
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nfocus_duration_secs = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "not toml [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
