//! forge-timeline-cli: command-line access to forge-timeline
//!
//! The binary reads a project snapshot, builds the timeline for the
//! requested window, and prints it. This library exposes the pieces the
//! binary is made of so they can be tested directly.

#![warn(missing_docs)]

pub mod config;
pub mod output;
pub mod snapshot;

pub use config::{Config, ConfigError, OutputFormat};
pub use snapshot::{SnapshotError, SnapshotSource};
