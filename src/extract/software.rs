//! Developer tool table and version parsing.

use std::path::PathBuf;

use super::{capture, capture_pair, Field};
use crate::probe::RawResult;
use crate::records::{SoftwareRecord, VisualStudioInstall};

/// Inventory key for the Visual Studio IDE.
pub const VISUAL_STUDIO_ID: &str = "visual_studio";

/// A command-line tool detected by locating it and asking for its version.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    /// Key in the software inventory.
    pub id: &'static str,
    /// Executable name looked up on `PATH`.
    pub program: &'static str,
    pub args: &'static [&'static str],
    pub version_field: Field,
}

const fn tool(
    id: &'static str,
    program: &'static str,
    version_field: Field,
) -> ToolSpec {
    ToolSpec {
        id,
        program,
        args: &["--version"],
        version_field,
    }
}

/// Tools detected on every refresh.
pub const TOOLS: &[ToolSpec] = &[
    tool("git", "git", Field::GitVersion),
    tool("node", "node", Field::NodeVersion),
    tool("npm", "npm", Field::NpmVersion),
    tool("python", "python", Field::PythonVersion),
    tool("dotnet", "dotnet", Field::DotnetVersion),
    tool("vscode", "code", Field::VsCodeVersion),
];

/// Build the record for one tool from its locate and version probes.
///
/// A tool is installed when it was located and its version command
/// succeeded. The version is absent when the output does not match.
pub fn tool_record(
    tool_spec: &ToolSpec,
    located: &RawResult,
    version: Option<&RawResult>,
) -> SoftwareRecord {
    let Some(path) = located.ok_output().map(str::trim).filter(|p| !p.is_empty()) else {
        return SoftwareRecord::missing();
    };
    let Some(output) = version.and_then(RawResult::ok_output) else {
        return SoftwareRecord::missing();
    };

    SoftwareRecord {
        installed: true,
        version: capture(tool_spec.version_field, output),
        path: Some(path.to_string()),
        installations: Vec::new(),
    }
}

/// Parse one Visual Studio edition directory.
pub fn parse_visual_studio_path(path: &str) -> Option<VisualStudioInstall> {
    let (year, edition) = capture_pair(Field::VisualStudioInstall, path)?;
    Some(VisualStudioInstall {
        year,
        edition,
        path: path.to_string(),
    })
}

/// Summarise Visual Studio installs; the newest year supplies version and path.
pub fn visual_studio_record(installs: &[PathBuf]) -> SoftwareRecord {
    let mut installations: Vec<VisualStudioInstall> = installs
        .iter()
        .filter_map(|p| parse_visual_studio_path(&p.to_string_lossy()))
        .collect();
    installations.sort_by(|a, b| b.year.cmp(&a.year));

    let Some(newest) = installations.first() else {
        return SoftwareRecord::missing();
    };

    SoftwareRecord {
        installed: true,
        version: Some(newest.year.clone()),
        path: Some(newest.path.clone()),
        installations,
    }
}
