//! Emitter configuration.
//!
//! Selects the dispatch mode of an emitter from TOML or code. The mode is
//! fixed when the emitter is built; nothing here is consulted afterwards.

use crate::dispatch::DEFAULT_THREAD_NAME;
use crate::error::EmitterError;
use serde::{Deserialize, Serialize};

fn default_thread_name() -> String {
    DEFAULT_THREAD_NAME.to_string()
}

/// Scheduling facility used when `async_dispatch` is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    /// One OS thread per handler invocation
    #[default]
    Thread,
    /// The blocking pool of the current tokio runtime
    Tokio,
}

/// Configuration for building an [`Emitter`](crate::Emitter).
///
/// ```toml
/// async_dispatch = true
/// executor = "thread"
/// thread_name = "emitter-dispatch"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Run handlers on independent execution units instead of inline
    #[serde(default)]
    pub async_dispatch: bool,
    /// Facility used for asynchronous dispatch
    #[serde(default)]
    pub executor: ExecutorKind,
    /// Name given to dispatch threads when `executor = "thread"`
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            async_dispatch: false,
            executor: ExecutorKind::default(),
            thread_name: default_thread_name(),
        }
    }
}

impl EmitterConfig {
    /// Configuration for a synchronous emitter.
    pub fn synchronous() -> Self {
        Self::default()
    }

    /// Configuration for an asynchronous emitter on the given executor.
    pub fn asynchronous(executor: ExecutorKind) -> Self {
        Self {
            async_dispatch: true,
            executor,
            ..Self::default()
        }
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, EmitterError> {
        let config: EmitterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, EmitterError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks the configuration for values that cannot be honoured.
    pub fn validate(&self) -> Result<(), EmitterError> {
        if self.thread_name.trim().is_empty() {
            return Err(EmitterError::InvalidConfig(
                "thread_name cannot be empty".to_string(),
            ));
        }

        if self.thread_name.contains('\0') {
            return Err(EmitterError::InvalidConfig(
                "thread_name cannot contain NUL bytes".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_synchronous() {
        let config = EmitterConfig::default();
        assert!(!config.async_dispatch);
        assert_eq!(config.executor, ExecutorKind::Thread);
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_with_defaults() {
        let config = EmitterConfig::from_toml_str("async_dispatch = true").unwrap();
        assert!(config.async_dispatch);
        assert_eq!(config.executor, ExecutorKind::Thread);
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn test_from_toml_full() {
        let toml_content = r#"
async_dispatch = true
executor = "tokio"
thread_name = "handlers"
"#;
        let config = EmitterConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config, EmitterConfig {
            async_dispatch: true,
            executor: ExecutorKind::Tokio,
            thread_name: "handlers".to_string(),
        });
    }

    #[test]
    fn test_unknown_executor_is_parse_error() {
        let result = EmitterConfig::from_toml_str(r#"executor = "rayon""#);
        assert!(matches!(result, Err(EmitterError::Parse(_))));
    }

    #[test]
    fn test_validation_empty_thread_name() {
        let mut config = EmitterConfig::asynchronous(ExecutorKind::Thread);
        config.thread_name = "   ".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("thread_name cannot be empty"));
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut temp_file, b"async_dispatch = true\nthread_name = \"from-file\"\n").unwrap();

        let config = EmitterConfig::from_file(temp_file.path()).unwrap();
        assert!(config.async_dispatch);
        assert_eq!(config.thread_name, "from-file");
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EmitterConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(EmitterError::Io(_))));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = EmitterConfig::asynchronous(ExecutorKind::Tokio);
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(EmitterConfig::from_toml_str(&text).unwrap(), config);
    }
}
