//! Command-line interface for devkit-detect.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, DetectArgs, SnapshotArgs};
pub use commands::{resolve_config, Command, CommandDispatcher, CommandResult};
