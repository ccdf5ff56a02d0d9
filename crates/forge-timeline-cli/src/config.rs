//! Configuration for the forge-timeline command
//!
//! This module provides the command-line configuration, including the
//! snapshot path, the project and window to aggregate, and logging options.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use forge_timeline::{DEFAULT_CONCURRENCY, FailurePolicy, TimeWindow, TimelineOptions};

/// Forge Timeline - merge requests and orphan commits for a time window
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "forge-timeline")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path to the JSON snapshot of the remote project
    ///
    /// The snapshot holds the merge requests, commits and diffs the
    /// timeline is built from.
    #[arg(short, long, env = "FORGE_TIMELINE_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Numeric id of the project to aggregate
    #[arg(short, long)]
    pub project: u64,

    /// Start of the window (RFC 3339, inclusive)
    #[arg(long)]
    pub start: DateTime<Utc>,

    /// End of the window (RFC 3339, exclusive)
    #[arg(long)]
    pub end: DateTime<Utc>,

    /// Maximum number of remote calls in flight at once
    #[arg(short, long, env = "FORGE_TIMELINE_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Record failed merge requests and commits instead of aborting
    ///
    /// Listing failures still abort the run.
    #[arg(long, default_value = "false")]
    pub skip_failed: bool,

    /// Output format written to stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the timeline
    /// written to stdout.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// How the finished timeline is printed
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON document
    #[default]
    Json,
    /// Human-readable summary, one line per merge request and commit
    Summary,
}

impl Config {
    /// The aggregation window
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWindow`] if `end` is before `start`.
    pub fn window(&self) -> Result<TimeWindow, ConfigError> {
        TimeWindow::new(self.start, self.end).map_err(|_| ConfigError::InvalidWindow {
            start: self.start,
            end: self.end,
        })
    }

    /// Failure policy selected by `--skip-failed`
    #[must_use]
    pub fn policy(&self) -> FailurePolicy {
        if self.skip_failed {
            FailurePolicy::SkipFailed
        } else {
            FailurePolicy::FailFast
        }
    }

    /// Builder options derived from the command line
    #[must_use]
    pub fn timeline_options(&self) -> TimelineOptions {
        TimelineOptions::default()
            .with_concurrency(self.concurrency)
            .with_policy(self.policy())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The snapshot path doesn't exist or is not a file
    /// - The window ends before it starts
    /// - The concurrency limit is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.snapshot.exists() {
            return Err(ConfigError::SnapshotNotFound(self.snapshot.clone()));
        }
        if !self.snapshot.is_file() {
            return Err(ConfigError::SnapshotNotFile(self.snapshot.clone()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        self.window()?;
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Snapshot path not found
    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(PathBuf),

    /// Snapshot path is a directory or other non-file
    #[error("Snapshot path is not a file: {0}")]
    SnapshotNotFile(PathBuf),

    /// Window ends before it starts
    #[error("Invalid window: end {end} is before start {start}")]
    InvalidWindow {
        /// Requested start
        start: DateTime<Utc>,
        /// Requested end
        end: DateTime<Utc>,
    },

    /// Concurrency limit of zero
    #[error("Concurrency must be at least 1")]
    InvalidConcurrency,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.verbose);
        assert!(!config.quiet);
        assert!(!config.skip_failed);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_log_level_default() {
        let config = Config::default();
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_verbose_wins_over_quiet() {
        let config = Config {
            verbose: true,
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_window_valid() {
        let config = Config {
            start: day(1),
            end: day(8),
            ..Default::default()
        };
        let window = config.window().expect("valid window");
        assert_eq!(window.start, day(1));
        assert_eq!(window.end, day(8));
    }

    #[test]
    fn test_window_reversed() {
        let config = Config {
            start: day(8),
            end: day(1),
            ..Default::default()
        };
        assert!(matches!(
            config.window(),
            Err(ConfigError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(Config::default().policy(), FailurePolicy::FailFast);
        let config = Config {
            skip_failed: true,
            ..Default::default()
        };
        assert_eq!(config.policy(), FailurePolicy::SkipFailed);
    }

    #[test]
    fn test_timeline_options() {
        let config = Config {
            concurrency: 3,
            skip_failed: true,
            ..Default::default()
        };
        let options = config.timeline_options();
        assert_eq!(options.concurrency, 3);
        assert_eq!(options.policy, FailurePolicy::SkipFailed);
    }

    #[test]
    fn test_validate_nonexistent_snapshot() {
        let config = Config {
            snapshot: PathBuf::from("/nonexistent/path/12345.json"),
            concurrency: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnapshotNotFound(_))
        ));
    }

    #[test]
    fn test_validate_directory_snapshot() {
        let config = Config {
            snapshot: std::env::temp_dir(),
            concurrency: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnapshotNotFile(_))
        ));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
