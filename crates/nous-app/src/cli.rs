//! CLI argument definitions for the NousSense console harness.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// NousSense — voice assistant core with a console harness.
#[derive(Parser, Debug)]
#[command(name = "noussense", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Data directory for the SQLite database.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > NOUS_CONFIG env var > ~/.noussense/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("NOUS_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory.
    ///
    /// Priority: --data-dir flag > NOUS_DATA_DIR env var > config file value.
    pub fn resolve_data_dir(&self, config_dir: &str) -> PathBuf {
        if let Some(ref p) = self.data_dir {
            return p.clone();
        }
        if let Ok(p) = std::env::var("NOUS_DATA_DIR") {
            return PathBuf::from(p);
        }
        PathBuf::from(config_dir)
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > NOUS_LOG env var > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(level) = std::env::var("NOUS_LOG") {
            return level;
        }
        config_level.to_string()
    }
}

fn default_config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".noussense").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> CliArgs {
        CliArgs {
            config: None,
            data_dir: None,
            log_level: None,
        }
    }

    #[test]
    fn test_flag_beats_config_value() {
        let args = CliArgs {
            log_level: Some("debug".to_string()),
            ..bare_args()
        };
        assert_eq!(args.resolve_log_level("info"), "debug");
    }

    #[test]
    fn test_config_value_is_fallback() {
        let args = bare_args();
        if std::env::var("NOUS_LOG").is_err() {
            assert_eq!(args.resolve_log_level("warn"), "warn");
        }
    }

    #[test]
    fn test_explicit_config_path() {
        let args = CliArgs {
            config: Some(PathBuf::from("/tmp/nous.toml")),
            ..bare_args()
        };
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/nous.toml"));
    }

    #[test]
    fn test_data_dir_flag() {
        let args = CliArgs {
            data_dir: Some(PathBuf::from("/var/nous")),
            ..bare_args()
        };
        assert_eq!(
            args.resolve_data_dir("/home/u/.noussense"),
            PathBuf::from("/var/nous")
        );
    }
}
