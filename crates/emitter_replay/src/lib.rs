//! # Emitter Replay
//!
//! Replays a scripted sequence of events through an [`event_emitter::Emitter`]
//! and reports how often each handler fired. Useful for checking dispatch
//! modes against each other and for eyeballing handler logs.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration (writes replay.toml if missing)
//! emitter_replay
//!
//! # Specify custom configuration
//! emitter_replay --config scenario.toml
//!
//! # Same script, detached handlers, verbose JSON logs
//! emitter_replay --async --log-level debug --json-logs
//! ```

use tracing::{error, info};

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Entry point shared by the binary.
///
/// Parses the CLI, loads the config file once, sets up logging from it (with
/// CLI overrides), then builds and runs the application. Exits the process
/// with status 1 on failure.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Logging comes first, so a broken config file still gets logged with
    // default settings before exiting.
    let loaded = AppConfig::load_or_create(&args.config_path).await;
    let mut logging_settings = match &loaded {
        Ok((config, _)) => config.logging.clone(),
        Err(_) => AppConfig::default().logging,
    };
    if let Some(level) = &args.log_level {
        logging_settings.level = level.clone();
    }

    if let Err(e) = logging::setup_logging(&logging_settings, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    let config = match loaded {
        Ok((config, created)) => {
            if created {
                info!("Created default configuration file: {}", args.config_path.display());
            }
            config
        }
        Err(e) => {
            error!("❌ Failed to load {}: {e}", args.config_path.display());
            std::process::exit(1);
        }
    };

    match Application::from_loaded(args, config) {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Replay error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

pub use app::{ListenerReport, ReplayReport};
pub use config::{EventEntry, ListenerEntry, LoggingSettings, ReplaySettings};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_written_default_config_replays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.toml").to_string_lossy().into_owned();
        let args = CliArgs::try_parse_from(["emitter_replay", "--config", path.as_str()]).unwrap();

        let report = Application::new(args).await.unwrap().run().await.unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["listeners"][0]["invocations"], 3);
        assert_eq!(json["listeners"][1]["once"], true);
        assert_eq!(json["stats"]["events_emitted"], 4);
    }
}
