//! `devkit-detect snapshot` command.

use chrono::Utc;
use std::io::Write;

use crate::cli::args::SnapshotArgs;
use crate::detector::FeatureDetector;
use crate::error::Result;
use crate::probe::ProbeProvider;
use crate::records::Category;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// Detect every category and print the consolidated snapshot.
pub struct SnapshotCommand {
    args: SnapshotArgs,
}

impl SnapshotCommand {
    pub fn new(args: SnapshotArgs) -> Self {
        Self { args }
    }
}

impl Command for SnapshotCommand {
    fn execute<P: ProbeProvider>(
        &self,
        detector: &FeatureDetector<P>,
        out: &mut dyn Write,
    ) -> Result<CommandResult> {
        let snapshot = detector.get_all_features(self.args.refresh);

        if self.args.json {
            let json = serde_json::to_string_pretty(&snapshot).map_err(anyhow::Error::from)?;
            writeln!(out, "{}", json)?;
            return Ok(CommandResult::success());
        }

        display::show_system(out, &snapshot.system)?;
        writeln!(out)?;
        display::show_features(out, &snapshot.windows_features)?;
        writeln!(out)?;
        display::show_software(out, &snapshot.software)?;
        writeln!(out)?;
        display::show_office(out, &snapshot.office)?;
        writeln!(out)?;

        let now = Utc::now();
        for category in Category::ALL {
            writeln!(
                out,
                "{:<18} {}",
                category,
                display::age_label(detector.fetched_at(category), now)
            )?;
        }

        Ok(CommandResult::success())
    }
}
