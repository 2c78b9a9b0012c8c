//! Executable lookup on `PATH`.
//!
//! Tools are located by walking `PATH` directly. On Windows each bare name is
//! tried with every `PATHEXT` extension (`npm` is really `npm.cmd`).

use std::path::{Path, PathBuf};

/// Extensions tried when `PATHEXT` is unset.
const DEFAULT_PATHEXT: &str = ".COM;.EXE;.BAT;.CMD";

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// File names to look for when resolving `tool`.
///
/// With `pathext` set (Windows), a name without an extension expands to one
/// candidate per extension, followed by the bare name.
pub fn candidate_names(tool: &str, pathext: Option<&str>) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(exts) = pathext {
        if Path::new(tool).extension().is_none() {
            names.extend(
                exts.split(';')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(|e| format!("{}{}", tool, e.to_lowercase())),
            );
        }
    }
    names.push(tool.to_string());
    names
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(
    tool: &str,
    path_entries: &[PathBuf],
    pathext: Option<&str>,
) -> Option<PathBuf> {
    let names = candidate_names(tool, pathext);
    for dir in path_entries {
        for name in &names {
            let candidate = dir.join(name);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// `PATHEXT` for the current platform (`None` off Windows).
pub fn system_pathext() -> Option<String> {
    if cfg!(windows) {
        Some(std::env::var("PATHEXT").unwrap_or_else(|_| DEFAULT_PATHEXT.to_string()))
    } else {
        None
    }
}
