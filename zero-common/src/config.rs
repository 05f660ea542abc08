//! Configuration management for Zero session services.
//!
//! All Zero services share a unified configuration file at `~/.codecoder/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (ZERO_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `ZERO_LOG_LEVEL` → observability.log_level
//! - `ZERO_LOG_FORMAT` → observability.log_format
//! - `ZERO_WORKSPACE_DIR` → memory.workspace_dir
//! - `ZERO_MEMORY_TIMEZONE` → memory.timezone
//!
//! # Session reset policies
//!
//! ```json
//! {
//!   "session": {
//!     "reset": { "mode": "daily", "at_hour": 4 },
//!     "reset_by_type": {
//!       "group": { "mode": "idle", "idle_minutes": 120 },
//!       "thread": { "mode": "never" }
//!     },
//!     "reset_by_channel": {
//!       "telegram": { "mode": "idle", "idle_minutes": 30 }
//!     }
//!   }
//! }
//! ```
//!
//! A policy entry that fails to parse is dropped with a warning and treated
//! as absent; it never fails the whole configuration load.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::timezone::Zone;

/// Hour of day used when no reset policy is configured anywhere.
pub const DEFAULT_RESET_AT_HOUR: u32 = 4;

/// Idle timeout used when an `idle` policy omits `idle_minutes`.
pub const DEFAULT_IDLE_MINUTES: i64 = 60;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".codecoder"),
        |dirs| dirs.home_dir().join(".codecoder"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Session Reset Policy
// ============================================================================

/// When a persisted session stops being treated as a continuation.
///
/// Fields of other modes are ignored on input: `{"mode": "never",
/// "idle_minutes": 5}` is simply `Never`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SessionResetPolicy {
    /// Sessions never expire.
    Never,
    /// Sessions expire at `at_hour:00:00` every day (0-23).
    Daily {
        #[serde(default = "default_at_hour", alias = "atHour")]
        at_hour: u32,
    },
    /// Sessions expire `idle_minutes` after their last update.
    Idle {
        #[serde(default = "default_idle_minutes", alias = "idleMinutes")]
        idle_minutes: i64,
    },
}

impl SessionResetPolicy {
    /// Mode name as it appears in config files.
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Daily { .. } => "daily",
            Self::Idle { .. } => "idle",
        }
    }
}

impl Default for SessionResetPolicy {
    fn default() -> Self {
        Self::Daily {
            at_hour: DEFAULT_RESET_AT_HOUR,
        }
    }
}

impl fmt::Display for SessionResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "never"),
            Self::Daily { at_hour } => write!(f, "daily@{at_hour:02}:00"),
            Self::Idle { idle_minutes } => write!(f, "idle {idle_minutes}m"),
        }
    }
}

fn default_at_hour() -> u32 {
    DEFAULT_RESET_AT_HOUR
}

fn default_idle_minutes() -> i64 {
    DEFAULT_IDLE_MINUTES
}

// ============================================================================
// Session Configuration
// ============================================================================

/// Layered session reset configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Global reset policy
    #[serde(
        default,
        deserialize_with = "lenient_policy",
        skip_serializing_if = "Option::is_none"
    )]
    pub reset: Option<SessionResetPolicy>,

    /// Reset policy per session kind ("direct", "group", "thread", ...)
    #[serde(
        default,
        alias = "resetByType",
        deserialize_with = "lenient_policy_map",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub reset_by_type: HashMap<String, SessionResetPolicy>,

    /// Reset policy per channel ("telegram", "slack", ...)
    #[serde(
        default,
        alias = "resetByChannel",
        deserialize_with = "lenient_policy_map",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub reset_by_channel: HashMap<String, SessionResetPolicy>,
}

fn parse_policy(field: &str, value: Value) -> Option<SessionResetPolicy> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(policy) => Some(policy),
        Err(e) => {
            tracing::warn!(field = %field, error = %e, "Ignoring malformed session reset policy");
            None
        }
    }
}

fn lenient_policy<'de, D>(deserializer: D) -> std::result::Result<Option<SessionResetPolicy>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_policy("session.reset", value))
}

fn lenient_policy_map<'de, D>(
    deserializer: D,
) -> std::result::Result<HashMap<String, SessionResetPolicy>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let entries = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(HashMap::new()),
        other => {
            tracing::warn!(value = %other, "Ignoring session reset map that is not an object");
            return Ok(HashMap::new());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| parse_policy(&key, value).map(|policy| (key, policy)))
        .collect())
}

// ============================================================================
// Memory Configuration
// ============================================================================

/// Memory workspace configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Workspace directory holding `memory/<YYYY-MM-DD>.md` archives.
    /// Supports `~` and `$VAR` expansion. Default: `~/.codecoder/workspace`
    #[serde(default, alias = "workspaceDir")]
    pub workspace_dir: Option<String>,

    /// Time zone for archive date stamps ("local", "utc", or an IANA name).
    /// Default: system local
    #[serde(default)]
    pub timezone: Option<String>,
}

impl MemoryConfig {
    /// Resolved workspace directory.
    pub fn workspace_path(&self) -> PathBuf {
        match self.workspace_dir.as_deref() {
            Some(raw) => PathBuf::from(shellexpand::full(raw).map_or_else(
                |_| raw.to_string(),
                std::borrow::Cow::into_owned,
            )),
            None => config_dir().join("workspace"),
        }
    }

    /// Resolved time zone; unknown names fall back to system local.
    pub fn zone(&self) -> Zone {
        Zone::parse_or_local(self.timezone.as_deref())
    }
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Aliases: "level" for backward compatibility with existing config files
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    /// Aliases: "format" for backward compatibility with existing config files
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration for Zero session services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Session reset policies
    #[serde(default)]
    pub session: SessionConfig,

    /// Memory archive workspace
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Logging
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("ZERO_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("ZERO_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(dir) = lookup("ZERO_WORKSPACE_DIR") {
            self.memory.workspace_dir = Some(dir);
        }
        if let Some(tz) = lookup("ZERO_MEMORY_TIMEZONE") {
            self.memory.timezone = Some(tz);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_policy_is_daily_at_four() {
        assert_eq!(
            SessionResetPolicy::default(),
            SessionResetPolicy::Daily { at_hour: 4 }
        );
    }

    #[test]
    fn test_policy_modes_deserialize() {
        let never: SessionResetPolicy = serde_json::from_value(json!({"mode": "never"})).unwrap();
        let daily: SessionResetPolicy =
            serde_json::from_value(json!({"mode": "daily", "atHour": 6})).unwrap();
        let idle: SessionResetPolicy =
            serde_json::from_value(json!({"mode": "idle", "idle_minutes": 30})).unwrap();

        assert_eq!(never, SessionResetPolicy::Never);
        assert_eq!(daily, SessionResetPolicy::Daily { at_hour: 6 });
        assert_eq!(idle, SessionResetPolicy::Idle { idle_minutes: 30 });
    }

    #[test]
    fn test_foreign_fields_are_ignored() {
        let policy: SessionResetPolicy =
            serde_json::from_value(json!({"mode": "never", "idle_minutes": 5})).unwrap();
        assert_eq!(policy, SessionResetPolicy::Never);
    }

    #[test]
    fn test_missing_parameters_use_defaults() {
        let daily: SessionResetPolicy = serde_json::from_value(json!({"mode": "daily"})).unwrap();
        let idle: SessionResetPolicy = serde_json::from_value(json!({"mode": "idle"})).unwrap();

        assert_eq!(daily, SessionResetPolicy::Daily { at_hour: 4 });
        assert_eq!(idle, SessionResetPolicy::Idle { idle_minutes: 60 });
    }

    #[test]
    fn test_policy_serializes_with_mode_tag() {
        let value = serde_json::to_value(SessionResetPolicy::Idle { idle_minutes: 15 }).unwrap();
        assert_eq!(value, json!({"mode": "idle", "idle_minutes": 15}));
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let config = Config::from_json(
            r#"{
                "session": {
                    "reset": {"mode": "weekly"},
                    "resetByType": {
                        "group": {"mode": "idle", "idleMinutes": 120},
                        "direct": "sometimes"
                    },
                    "reset_by_channel": 42
                }
            }"#,
        )
        .unwrap();

        assert!(config.session.reset.is_none());
        assert_eq!(config.session.reset_by_type.len(), 1);
        assert_eq!(
            config.session.reset_by_type["group"],
            SessionResetPolicy::Idle { idle_minutes: 120 }
        );
        assert!(config.session.reset_by_channel.is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.memory.zone(), Zone::Local);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{"session": {"reset": {"mode": "never"}}, "memory": {"timezone": "UTC"}}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.session.reset, Some(SessionResetPolicy::Never));
        assert_eq!(config.memory.zone(), Zone::Utc);
    }

    #[test]
    fn test_load_from_missing_file_fails_with_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("absent.json");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        let env: HashMap<&str, &str> = [
            ("ZERO_LOG_LEVEL", "debug"),
            ("ZERO_WORKSPACE_DIR", "/srv/agent"),
            ("ZERO_MEMORY_TIMEZONE", "Asia/Tokyo"),
        ]
        .into_iter()
        .collect();

        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, "pretty");
        assert_eq!(config.memory.workspace_path(), PathBuf::from("/srv/agent"));
        assert_eq!(config.memory.zone(), Zone::Named(chrono_tz::Asia::Tokyo));
    }
}
