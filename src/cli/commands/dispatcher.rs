//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;

use crate::cli::args::{Cli, Commands};
use crate::config::{parse_duration, DetectorConfig};
use crate::detector::FeatureDetector;
use crate::error::Result;
use crate::probe::{HostProvider, ProbeProvider};

/// Trait for command implementations.
pub trait Command {
    /// Execute the command against a detector, writing to `out`.
    fn execute<P: ProbeProvider>(
        &self,
        detector: &FeatureDetector<P>,
        out: &mut dyn Write,
    ) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Exit code as a process status byte. Codes outside `0..=255` become 1.
    pub fn process_exit_code(&self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }
}

/// Build the detector configuration from the config file and global flags.
///
/// Flags override values from the file.
pub fn resolve_config(cli: &Cli) -> Result<DetectorConfig> {
    let mut config = match &cli.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::default(),
    };

    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir.clone());
    }
    if let Some(ttl) = &cli.ttl {
        config = config.with_ttl(parse_duration(ttl)?);
    }
    if let Some(timeout) = &cli.probe_timeout {
        config = config.with_probe_timeout(parse_duration(timeout)?);
    }

    Ok(config)
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher<P: ProbeProvider = HostProvider> {
    detector: FeatureDetector<P>,
}

impl CommandDispatcher<HostProvider> {
    /// Create a dispatcher that probes the current host.
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            detector: FeatureDetector::new(config),
        }
    }
}

impl<P: ProbeProvider> CommandDispatcher<P> {
    /// Create a dispatcher over an existing detector.
    pub fn with_detector(detector: FeatureDetector<P>) -> Self {
        Self { detector }
    }

    pub fn detector(&self) -> &FeatureDetector<P> {
        &self.detector
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, command: &Commands, out: &mut dyn Write) -> Result<CommandResult> {
        match command {
            Commands::Snapshot(args) => {
                let cmd = super::snapshot::SnapshotCommand::new(args.clone());
                cmd.execute(&self.detector, out)
            }
            Commands::Detect(args) => {
                let cmd = super::detect::DetectCommand::new(args.clone());
                cmd.execute(&self.detector, out)
            }
            Commands::Clear => super::clear::ClearCommand.execute(&self.detector, out),
        }
    }
}
