//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// devkit-detect - Cached detection of developer machine features.
#[derive(Debug, Parser)]
#[command(name = "devkit-detect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the cache file
    #[arg(long, global = true, env = "DEVKIT_DETECT_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// How long cached results stay fresh (e.g. 24h, 30m, 0)
    #[arg(long, global = true)]
    pub ttl: Option<String>,

    /// Time budget for each external command (e.g. 30s)
    #[arg(long, global = true)]
    pub probe_timeout: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect every category and print a snapshot
    Snapshot(SnapshotArgs),

    /// Detect a single category
    Detect(DetectArgs),

    /// Delete the cache file
    Clear,
}

/// Arguments for the `snapshot` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SnapshotArgs {
    /// Ignore cached results and probe again
    #[arg(long)]
    pub refresh: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `detect` command.
#[derive(Debug, Clone, Args)]
pub struct DetectArgs {
    /// Category to detect (system, windows_features, software, office)
    pub category: String,

    /// Ignore cached results and probe again
    #[arg(long)]
    pub refresh: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
