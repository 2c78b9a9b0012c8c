//! `devkit-detect detect <category>` command.

use std::io::Write;

use crate::cli::args::DetectArgs;
use crate::detector::FeatureDetector;
use crate::error::Result;
use crate::probe::ProbeProvider;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// Detect a single category by name.
pub struct DetectCommand {
    args: DetectArgs,
}

impl DetectCommand {
    pub fn new(args: DetectArgs) -> Self {
        Self { args }
    }
}

impl Command for DetectCommand {
    fn execute<P: ProbeProvider>(
        &self,
        detector: &FeatureDetector<P>,
        out: &mut dyn Write,
    ) -> Result<CommandResult> {
        let data = detector.detect_by_name(&self.args.category, self.args.refresh)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&data).map_err(anyhow::Error::from)?;
            writeln!(out, "{}", json)?;
        } else {
            display::show_category(out, &data)?;
        }

        Ok(CommandResult::success())
    }
}
