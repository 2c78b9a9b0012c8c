//! Probe providers: the capabilities that gather raw facts from the host.
//!
//! A probe never panics and never returns an error for an expected failure.
//! Text probes report a [`RawResult`] whose status tells whether the
//! underlying tool exists ([`ProbeStatus::Unavailable`]) or ran and failed
//! ([`ProbeStatus::Failed`]). Structured hardware probes return a
//! [`Result`](crate::error::Result) carrying the same distinction as
//! `ProbeUnavailable` / `ProbeFailed`.
//!
//! # Modules
//!
//! - [`command`] - Run an external command with a time budget
//! - [`path`] - Locate executables on `PATH`
//! - [`host`] - Provider backed by the real machine
//! - [`mock`] - Provider with canned outputs for tests and embedding hosts

pub mod command;
pub mod hardware;
pub mod host;
pub mod mock;
pub mod path;

pub use host::HostProvider;
pub use mock::MockProvider;

use std::path::PathBuf;

use crate::error::{DetectError, Result};
use crate::records::{CpuInfo, DriveInfo, MemoryInfo, OsInfo};

/// Outcome class of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The probe ran and succeeded.
    Ok,
    /// The tool or API behind the probe does not exist on this host.
    Unavailable,
    /// The probe ran but reported an error.
    Failed,
}

/// Raw output of a text-producing probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult {
    pub status: ProbeStatus,
    pub output: String,
    pub error: Option<String>,
}

impl RawResult {
    /// Create a successful result.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Ok,
            output: output.into(),
            error: None,
        }
    }

    /// Create a result for a missing capability.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Unavailable,
            output: String::new(),
            error: Some(reason.into()),
        }
    }

    /// Create a failure result.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::failed_with_output(String::new(), reason)
    }

    /// Create a failure result that still carries whatever was printed.
    pub fn failed_with_output(output: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Failed,
            output: output.into(),
            error: Some(reason.into()),
        }
    }

    /// Whether the probe succeeded.
    pub fn is_ok(&self) -> bool {
        self.status == ProbeStatus::Ok
    }

    /// Output of a successful probe.
    pub fn ok_output(&self) -> Option<&str> {
        self.is_ok().then_some(self.output.as_str())
    }

    /// Convert into the output text, or the matching probe error.
    pub fn into_output(self, probe: &str) -> Result<String> {
        let reason = self.error.unwrap_or_else(|| "no reason given".to_string());
        match self.status {
            ProbeStatus::Ok => Ok(self.output),
            ProbeStatus::Unavailable => Err(DetectError::ProbeUnavailable {
                probe: probe.to_string(),
                reason,
            }),
            ProbeStatus::Failed => Err(DetectError::ProbeFailed {
                probe: probe.to_string(),
                reason,
            }),
        }
    }
}

/// Office releases that are detected through their `InstallRoot` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfficeRelease {
    Office2016,
    Office2013,
    Office2010,
}

impl OfficeRelease {
    /// Newest first.
    pub const ALL: [OfficeRelease; 3] = [
        OfficeRelease::Office2016,
        OfficeRelease::Office2013,
        OfficeRelease::Office2010,
    ];

    /// Internal Office version number used in registry paths.
    pub fn registry_version(&self) -> &'static str {
        match self {
            OfficeRelease::Office2016 => "16.0",
            OfficeRelease::Office2013 => "15.0",
            OfficeRelease::Office2010 => "14.0",
        }
    }

    /// Marketing year.
    pub fn year(&self) -> &'static str {
        match self {
            OfficeRelease::Office2016 => "2016",
            OfficeRelease::Office2013 => "2013",
            OfficeRelease::Office2010 => "2010",
        }
    }
}

/// Registry keys consulted for Office detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfficeKey {
    /// Click-to-Run configuration (365, 2019, 2021, LTSC).
    ClickToRun,
    /// MSI-era install root.
    InstallRoot(OfficeRelease),
}

impl OfficeKey {
    /// Full `HKLM` path of the key.
    pub fn registry_path(&self) -> String {
        match self {
            OfficeKey::ClickToRun => {
                r"HKLM\SOFTWARE\Microsoft\Office\ClickToRun\Configuration".to_string()
            }
            OfficeKey::InstallRoot(release) => format!(
                r"HKLM\SOFTWARE\Microsoft\Office\{}\Common\InstallRoot",
                release.registry_version()
            ),
        }
    }
}

/// Fact sources the detector consumes.
///
/// One method per fact. Implementations must capture every failure as data;
/// nothing here retries.
pub trait ProbeProvider: Send + Sync {
    /// List optional OS features with their states.
    fn list_features(&self) -> RawResult;

    /// Detailed information for a single OS feature.
    fn feature_info(&self, feature: &str) -> RawResult;

    /// Resolve a tool to the path of its executable.
    fn locate_tool(&self, program: &str) -> RawResult;

    /// Run a tool (usually with a version flag) and capture its output.
    fn run_tool(&self, program: &str, args: &[&str]) -> RawResult;

    /// Visual Studio edition directories present on disk.
    fn visual_studio_installs(&self) -> Result<Vec<PathBuf>>;

    /// OS version values (product name, build, display version).
    fn os_version_facts(&self) -> RawResult;

    /// Developer mode switch.
    fn developer_mode(&self) -> RawResult;

    fn cpu_info(&self) -> Result<CpuInfo>;

    fn memory_info(&self) -> Result<MemoryInfo>;

    fn disk_inventory(&self) -> Result<Vec<DriveInfo>>;

    fn os_info(&self) -> Result<OsInfo>;

    /// Values under one of the Office registry keys.
    fn office_registry(&self, key: OfficeKey) -> RawResult;

    /// Office licensing status report.
    fn office_license_status(&self) -> RawResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_result_exposes_output() {
        let result = RawResult::ok("git version 2.43.0");
        assert!(result.is_ok());
        assert_eq!(result.ok_output(), Some("git version 2.43.0"));
        assert_eq!(result.into_output("git").unwrap(), "git version 2.43.0");
    }

    #[test]
    fn unavailable_maps_to_probe_unavailable() {
        let result = RawResult::unavailable("dism not found");
        assert_eq!(result.ok_output(), None);
        match result.into_output("dism") {
            Err(DetectError::ProbeUnavailable { probe, reason }) => {
                assert_eq!(probe, "dism");
                assert_eq!(reason, "dism not found");
            }
            other => panic!("expected ProbeUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn failed_keeps_partial_output() {
        let result = RawResult::failed_with_output("partial", "exit code 2");
        assert_eq!(result.status, ProbeStatus::Failed);
        assert_eq!(result.output, "partial");
        assert!(matches!(
            result.into_output("reg"),
            Err(DetectError::ProbeFailed { .. })
        ));
    }

    #[test]
    fn office_key_paths() {
        assert!(OfficeKey::ClickToRun
            .registry_path()
            .ends_with(r"ClickToRun\Configuration"));
        assert_eq!(
            OfficeKey::InstallRoot(OfficeRelease::Office2013).registry_path(),
            r"HKLM\SOFTWARE\Microsoft\Office\15.0\Common\InstallRoot"
        );
    }

    #[test]
    fn office_releases_are_newest_first() {
        let years: Vec<_> = OfficeRelease::ALL.iter().map(|r| r.year()).collect();
        assert_eq!(years, vec!["2016", "2013", "2010"]);
    }
}
