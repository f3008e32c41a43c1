//! Command-line interface handling for the replay harness.
//!
//! Flags given here override the matching settings of the configuration file.

use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Whether to force asynchronous dispatch
    pub async_dispatch: bool,
}

impl CliArgs {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses an explicit argument list, first item being the program name.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            // Always present thanks to the default value.
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_default(),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            async_dispatch: matches.get_flag("async"),
        }
    }
}

fn command() -> Command {
    Command::new("Emitter Replay")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Replays scripted events through an event emitter and reports handler counts")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("replay.toml"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("async")
                .long("async")
                .help("Dispatch handlers asynchronously regardless of the config file")
                .action(clap::ArgAction::SetTrue),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["emitter_replay"]).unwrap();
        assert_eq!(args.config_path, PathBuf::from("replay.toml"));
        assert!(args.log_level.is_none());
        assert!(!args.json_logs);
        assert!(!args.async_dispatch);
    }

    #[test]
    fn test_all_flags() {
        let args = CliArgs::try_parse_from([
            "emitter_replay",
            "--config",
            "custom.toml",
            "-l",
            "debug",
            "--json-logs",
            "--async",
        ])
        .unwrap();

        assert_eq!(args.config_path, PathBuf::from("custom.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_logs);
        assert!(args.async_dispatch);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(CliArgs::try_parse_from(["emitter_replay", "--bind", "0.0.0.0:80"]).is_err());
    }
}
