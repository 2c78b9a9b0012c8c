//! Provider backed by the real machine.
//!
//! Windows facts come from `dism`, `reg query` and `cscript`; hardware comes
//! from `sysinfo`. Off Windows, the Windows-only probes report
//! `Unavailable` without spawning anything.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::command::run_with_timeout;
use super::path::{parse_system_path, resolve_tool_path, system_pathext};
use super::{hardware, OfficeKey, ProbeProvider, RawResult};
use crate::config::DetectorConfig;
use crate::error::{DetectError, Result};
use crate::records::{CpuInfo, DriveInfo, MemoryInfo, OsInfo};

const WINDOWS_VERSION_KEY: &str = r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion";
const APP_MODEL_UNLOCK_KEY: &str =
    r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\AppModelUnlock";
const DEVELOPER_MODE_VALUE: &str = "AllowDevelopmentWithoutDevLicense";

/// Visual Studio years and editions probed on disk, newest first.
const VS_YEARS: &[&str] = &["2022", "2019", "2017", "2015"];
const VS_EDITIONS: &[&str] = &["Enterprise", "Professional", "Community"];

/// Provider that probes the current host.
#[derive(Debug, Clone)]
pub struct HostProvider {
    timeout: Duration,
    path: Vec<PathBuf>,
    pathext: Option<String>,
}

impl HostProvider {
    /// Create a provider with the given per-command time budget.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            path: parse_system_path(),
            pathext: system_pathext(),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.probe_timeout)
    }

    /// Replace the directories searched by `locate_tool`.
    pub fn with_path(mut self, path: Vec<PathBuf>) -> Self {
        self.path = path;
        self
    }

    fn run(&self, program: &str, args: &[&str]) -> RawResult {
        run_with_timeout(program, args, self.timeout)
    }

    fn run_windows(&self, program: &str, args: &[&str]) -> RawResult {
        if !cfg!(windows) {
            return RawResult::unavailable(format!("{} requires Windows", program));
        }
        self.run(program, args)
    }

    fn reg_query(&self, key: &str, value: Option<&str>) -> RawResult {
        match value {
            Some(value) => self.run_windows("reg", &["query", key, "/v", value]),
            None => self.run_windows("reg", &["query", key]),
        }
    }
}

/// `Program Files` roots from the environment.
fn program_files_dirs() -> Vec<PathBuf> {
    ["ProgramFiles(x86)", "ProgramFiles"]
        .iter()
        .filter_map(|var| env::var_os(var))
        .map(PathBuf::from)
        .fold(Vec::new(), |mut dirs, dir| {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
            dirs
        })
}

/// Edition directories under `<root>\Microsoft Visual Studio\<year>\<edition>`
/// that contain `Common7`.
pub fn find_visual_studio(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for root in roots {
        let vs_root = root.join("Microsoft Visual Studio");
        if !vs_root.is_dir() {
            continue;
        }
        for year in VS_YEARS {
            for edition in VS_EDITIONS {
                let edition_path = vs_root.join(year).join(edition);
                if edition_path.join("Common7").is_dir() {
                    found.push(edition_path);
                }
            }
        }
    }
    found
}

fn ospp_script() -> Option<PathBuf> {
    env::var_os("ProgramFiles(x86)").map(|root| {
        Path::new(&root)
            .join("Microsoft Office")
            .join("Office16")
            .join("OSPP.VBS")
    })
}

impl ProbeProvider for HostProvider {
    fn list_features(&self) -> RawResult {
        self.run_windows("dism", &["/online", "/get-features", "/format:list"])
    }

    fn feature_info(&self, feature: &str) -> RawResult {
        let name_arg = format!("/featurename:{}", feature);
        self.run_windows("dism", &["/online", "/get-featureinfo", &name_arg])
    }

    fn locate_tool(&self, program: &str) -> RawResult {
        match resolve_tool_path(program, &self.path, self.pathext.as_deref()) {
            Some(path) => RawResult::ok(path.to_string_lossy()),
            None => RawResult::unavailable(format!("{} not found on PATH", program)),
        }
    }

    fn run_tool(&self, program: &str, args: &[&str]) -> RawResult {
        self.run(program, args)
    }

    fn visual_studio_installs(&self) -> Result<Vec<PathBuf>> {
        let roots = program_files_dirs();
        if roots.is_empty() {
            return Err(DetectError::ProbeUnavailable {
                probe: "visual_studio".to_string(),
                reason: "no Program Files directory in environment".to_string(),
            });
        }
        Ok(find_visual_studio(&roots))
    }

    fn os_version_facts(&self) -> RawResult {
        self.reg_query(WINDOWS_VERSION_KEY, None)
    }

    fn developer_mode(&self) -> RawResult {
        self.reg_query(APP_MODEL_UNLOCK_KEY, Some(DEVELOPER_MODE_VALUE))
    }

    fn cpu_info(&self) -> Result<CpuInfo> {
        hardware::cpu_info()
    }

    fn memory_info(&self) -> Result<MemoryInfo> {
        hardware::memory_info()
    }

    fn disk_inventory(&self) -> Result<Vec<DriveInfo>> {
        hardware::disk_inventory()
    }

    fn os_info(&self) -> Result<OsInfo> {
        hardware::os_info()
    }

    fn office_registry(&self, key: OfficeKey) -> RawResult {
        self.reg_query(&key.registry_path(), None)
    }

    fn office_license_status(&self) -> RawResult {
        let Some(script) = ospp_script().filter(|p| p.is_file()) else {
            return RawResult::unavailable("OSPP.VBS not found");
        };
        let script = script.to_string_lossy();
        self.run_windows("cscript", &["//nologo", &script, "/dstatus"])
    }
}
