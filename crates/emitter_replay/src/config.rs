//! Configuration management for the replay harness.
//!
//! Loads and validates the replay script from a TOML file: how the emitter
//! dispatches, which listeners to register and which events to emit.

use event_emitter::EmitterConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::info;

fn default_settle_ms() -> u64 {
    100
}

fn default_capture_all() -> bool {
    true
}

fn default_repeat() -> u32 {
    1
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Emitter dispatch configuration
    #[serde(default)]
    pub emitter: EmitterConfig,
    /// Logging configuration settings
    pub logging: LoggingSettings,
    /// Replay behaviour
    #[serde(default)]
    pub replay: ReplaySettings,
    /// Listeners registered before any event is emitted, in order
    #[serde(default)]
    pub listeners: Vec<ListenerEntry>,
    /// Events emitted, in order
    #[serde(default)]
    pub events: Vec<EventEntry>,
}

/// Logging system configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

/// Replay behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySettings {
    /// How long to wait for detached handlers before reporting (milliseconds)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Register a capturer that counts every emitted event
    #[serde(default = "default_capture_all")]
    pub capture_all: bool,
    /// Register a capturer that only sees the first emitted event
    #[serde(default)]
    pub capture_once: bool,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            capture_all: default_capture_all(),
            capture_once: false,
        }
    }
}

/// One `[[listeners]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerEntry {
    /// Event id to listen on
    pub event: String,
    /// Register with `listen_once` instead of `add_listener`
    #[serde(default)]
    pub once: bool,
}

/// One `[[events]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    /// Event id to emit
    pub event: String,
    /// Arguments passed to every handler
    #[serde(default)]
    pub args: Vec<Value>,
    /// Number of consecutive emissions
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            emitter: EmitterConfig::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            },
            replay: ReplaySettings::default(),
            listeners: vec![
                ListenerEntry {
                    event: "test event A".to_string(),
                    once: false,
                },
                ListenerEntry {
                    event: "test event A".to_string(),
                    once: true,
                },
            ],
            events: vec![
                EventEntry {
                    event: "test event A".to_string(),
                    args: vec![Value::from("test"), Value::from(123), Value::from(true)],
                    repeat: 3,
                },
                EventEntry {
                    event: "test event B".to_string(),
                    args: vec![Value::from(1)],
                    repeat: 1,
                },
            ],
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes the default configuration to `path`
    /// and returns it.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let (config, created) = Self::load_or_create(path).await?;
        if created {
            info!("Created default configuration file: {}", path.display());
        }
        Ok(config)
    }

    /// Same as [`load_from_file`](Self::load_from_file) without logging;
    /// the flag tells whether the default file was written.
    pub async fn load_or_create(path: &Path) -> Result<(Self, bool), Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok((config, false))
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            Ok((default_config, true))
        }
    }

    /// Total number of emissions the script performs.
    pub fn total_emissions(&self) -> u64 {
        self.events.iter().map(|entry| u64::from(entry.repeat)).sum()
    }

    /// Validates the configuration settings.
    pub fn validate(&self) -> Result<(), String> {
        self.emitter.validate().map_err(|e| e.to_string())?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        if let Some(index) = self.listeners.iter().position(|entry| entry.event.is_empty()) {
            return Err(format!("listeners[{index}].event cannot be empty"));
        }

        for (index, entry) in self.events.iter().enumerate() {
            if entry.event.is_empty() {
                return Err(format!("events[{index}].event cannot be empty"));
            }
            if entry.repeat == 0 {
                return Err(format!("events[{index}].repeat must be at least 1"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_emitter::ExecutorKind;
    use serde_json::json;
    use tempfile::NamedTempFile;
    use tokio::fs;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert!(!config.emitter.async_dispatch);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert_eq!(config.replay.settle_ms, 100);
        assert!(config.replay.capture_all);
        assert!(!config.replay.capture_once);
        assert_eq!(config.listeners.len(), 2);
        assert_eq!(config.events[0].args, vec![json!("test"), json!(123), json!(true)]);
        assert_eq!(config.total_emissions(), 4);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config, AppConfig::default());

        // The default was written out and reads back the same.
        assert!(path.exists());
        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded, config);
    }

    #[tokio::test]
    async fn test_load_or_create_reports_creation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.toml");

        let (_, created) = AppConfig::load_or_create(&path).await.unwrap();
        assert!(created);
        let (_, created) = AppConfig::load_or_create(&path).await.unwrap();
        assert!(!created);
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[emitter]
async_dispatch = true
executor = "tokio"

[logging]
level = "debug"

[replay]
settle_ms = 250
capture_once = true

[[listeners]]
event = "rootevent"

[[listeners]]
event = "subevent"
once = true

[[events]]
event = "rootevent"
args = ["test", 1.5, { nested = [1, 2] }]
repeat = 2

[[events]]
event = "subevent"
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), toml_content).await.unwrap();

        let config = AppConfig::load_from_file(temp_file.path()).await.unwrap();

        assert!(config.emitter.async_dispatch);
        assert_eq!(config.emitter.executor, ExecutorKind::Tokio);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json_format);
        assert_eq!(config.replay.settle_ms, 250);
        assert!(config.replay.capture_all);
        assert!(config.replay.capture_once);
        assert_eq!(config.listeners, vec![
            ListenerEntry { event: "rootevent".to_string(), once: false },
            ListenerEntry { event: "subevent".to_string(), once: true },
        ]);
        assert_eq!(config.events[0].args, vec![json!("test"), json!(1.5), json!({ "nested": [1, 2] })]);
        assert_eq!(config.events[0].repeat, 2);
        assert!(config.events[1].args.is_empty());
        assert_eq!(config.events[1].repeat, 1);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_malformed_file() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[logging\nlevel = ").await.unwrap();

        assert!(AppConfig::load_from_file(temp_file.path()).await.is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().unwrap_err().contains("Invalid log level"));

        let mut config = AppConfig::default();
        config.events[1].repeat = 0;
        assert_eq!(config.validate().unwrap_err(), "events[1].repeat must be at least 1");

        let mut config = AppConfig::default();
        config.events[0].event.clear();
        assert_eq!(config.validate().unwrap_err(), "events[0].event cannot be empty");

        let mut config = AppConfig::default();
        config.listeners[1].event.clear();
        assert_eq!(config.validate().unwrap_err(), "listeners[1].event cannot be empty");

        let mut config = AppConfig::default();
        config.emitter.thread_name = String::new();
        assert!(config.validate().unwrap_err().contains("thread_name"));
    }
}
