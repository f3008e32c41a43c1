//! Main application logic and lifecycle management.
//!
//! `Application` builds an emitter from the loaded configuration, registers
//! the scripted listeners and capturers, replays the scripted events and
//! reports what fired.

use crate::{cli::CliArgs, config::AppConfig, logging::display_banner};
use event_emitter::{Arguments, Emitter, EmitterStats};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Invocation count of one scripted listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerReport {
    pub event: String,
    pub once: bool,
    pub invocations: u64,
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// One entry per `[[listeners]]` item, in configuration order
    pub listeners: Vec<ListenerReport>,
    /// Events seen by the catch-all capturer (0 when disabled)
    pub captured: u64,
    /// Events seen by the once-capturer (0 or 1)
    pub captured_once: u64,
    /// Emitter statistics after the replay settled
    pub stats: EmitterStats,
}

/// Main application struct.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let config = AppConfig::load_from_file(&args.config_path).await?;
        Self::from_loaded(args, config)
    }

    /// Creates an application from a configuration the caller already
    /// loaded from `args.config_path`, applying the CLI overrides.
    pub fn from_loaded(args: CliArgs, mut config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        if args.async_dispatch {
            config.emitter.async_dispatch = true;
        }

        let app = Self::with_config(config)?;
        display_banner();
        info!("📂 Config: {}", args.config_path.display());
        Ok(app)
    }

    /// Creates an application from an already loaded configuration.
    pub fn with_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        Ok(Self { config })
    }

    /// Configuration the application runs with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replays the configured events and reports what fired.
    ///
    /// Must be called from within a tokio runtime; the `tokio` executor
    /// dispatches onto it.
    pub async fn run(self) -> Result<ReplayReport, Box<dyn std::error::Error>> {
        info!("🌟 Starting replay");

        let emitter = Arc::new(Emitter::from_config(&self.config.emitter)?);
        info!(
            "⚙️ Emitter dispatch: {} | {} listeners | {} emissions scheduled",
            emitter.dispatcher_name(),
            self.config.listeners.len(),
            self.config.total_emissions()
        );

        let listener_counts: Vec<Arc<AtomicU64>> = self
            .config
            .listeners
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let count = Arc::new(AtomicU64::new(0));
                let counter = count.clone();
                let event = entry.event.clone();
                let handler = move |args: &[serde_json::Value]| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    debug!("👂 listener #{} on '{}' got {:?}", index, event, args);
                };
                if entry.once {
                    emitter.listen_once(entry.event.as_str(), handler);
                } else {
                    emitter.add_listener(entry.event.as_str(), handler);
                }
                count
            })
            .collect();

        let captured = Arc::new(AtomicU64::new(0));
        if self.config.replay.capture_all {
            let counter = captured.clone();
            emitter.add_capturer(move |event, args| {
                counter.fetch_add(1, Ordering::SeqCst);
                debug!("📡 captured '{}' {:?}", event, args);
            });
        }

        let captured_once = Arc::new(AtomicU64::new(0));
        if self.config.replay.capture_once {
            let counter = captured_once.clone();
            emitter.capture_once(move |event, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                info!("🥇 first event: '{}'", event);
            });
        }

        for entry in &self.config.events {
            let args = Arguments::from(entry.args.as_slice());
            for _ in 0..entry.repeat {
                emitter.emit_event(entry.event.as_str(), args.clone());
            }
        }

        if emitter.is_async() {
            let settle = Duration::from_millis(self.config.replay.settle_ms);
            debug!("⏳ Waiting {:?} for detached handlers", settle);
            tokio::time::sleep(settle).await;
        }

        let listeners = self
            .config
            .listeners
            .iter()
            .zip(&listener_counts)
            .map(|(entry, count)| ListenerReport {
                event: entry.event.clone(),
                once: entry.once,
                invocations: count.load(Ordering::SeqCst),
            })
            .collect();

        let report = ReplayReport {
            listeners,
            captured: captured.load(Ordering::SeqCst),
            captured_once: captured_once.load(Ordering::SeqCst),
            stats: emitter.stats(),
        };

        log_report(&report);
        if report.stats.events_emitted != self.config.total_emissions() {
            warn!(
                "⚠️ Emitted {} events, expected {}",
                report.stats.events_emitted,
                self.config.total_emissions()
            );
        }

        Ok(report)
    }
}

fn log_report(report: &ReplayReport) {
    info!("📊 Replay finished:");
    for (index, listener) in report.listeners.iter().enumerate() {
        info!(
            "  - listener #{} '{}'{}: {} invocations",
            index,
            listener.event,
            if listener.once { " (once)" } else { "" },
            listener.invocations
        );
    }
    info!("  - captured: {} | captured once: {}", report.captured, report.captured_once);
    info!(
        "  - emitted: {} | listener calls: {} | capturer calls: {} | expired: {}",
        report.stats.events_emitted,
        report.stats.listener_invocations,
        report.stats.capturer_invocations,
        report.stats.once_expired
    );
}
