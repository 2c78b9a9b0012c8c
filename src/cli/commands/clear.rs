//! `devkit-detect clear` command.

use std::io::Write;

use crate::detector::FeatureDetector;
use crate::error::Result;
use crate::probe::ProbeProvider;

use super::dispatcher::{Command, CommandResult};

/// Empty the cache and delete the cache file.
pub struct ClearCommand;

impl Command for ClearCommand {
    fn execute<P: ProbeProvider>(
        &self,
        detector: &FeatureDetector<P>,
        out: &mut dyn Write,
    ) -> Result<CommandResult> {
        let path = detector.cache_path().display().to_string();
        if detector.clear_cache() {
            writeln!(out, "Removed {}", path)?;
        } else {
            writeln!(out, "No cache file at {}", path)?;
        }
        Ok(CommandResult::success())
    }
}
