//! Mock provider for testing.
//!
//! `MockProvider` implements [`ProbeProvider`] with canned outputs and counts
//! every call per probe key, so tests can assert how often a category was
//! actually probed. Unconfigured probes report `Unavailable`.
//!
//! # Example
//!
//! ```
//! use devkit_detect::probe::{MockProvider, ProbeProvider};
//!
//! let provider = MockProvider::new().with_tool("git", "git version 2.43.0");
//!
//! let located = provider.locate_tool("git");
//! assert!(located.is_ok());
//! assert_eq!(provider.calls("locate:git"), 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use super::{OfficeKey, ProbeProvider, RawResult};
use crate::error::{DetectError, Result};
use crate::records::{CpuInfo, DriveInfo, MemoryInfo, OsInfo};

/// Key under which the feature list is configured and counted.
pub const LIST_FEATURES: &str = "list_features";
pub const OS_VERSION_FACTS: &str = "os_version_facts";
pub const DEVELOPER_MODE: &str = "developer_mode";
pub const VISUAL_STUDIO: &str = "visual_studio";
pub const CPU_INFO: &str = "cpu_info";
pub const MEMORY_INFO: &str = "memory_info";
pub const DISK_INVENTORY: &str = "disk_inventory";
pub const OS_INFO: &str = "os_info";
pub const OFFICE_LICENSE: &str = "office_license";

/// Key for a feature detail probe.
pub fn feature_key(feature: &str) -> String {
    format!("feature_info:{}", feature)
}

/// Key for locating a tool.
pub fn locate_key(program: &str) -> String {
    format!("locate:{}", program)
}

/// Key for running a tool (by program name or located path).
pub fn run_key(program: &str) -> String {
    format!("run:{}", program)
}

/// Key for an Office registry probe.
pub fn office_key(key: OfficeKey) -> String {
    format!("office:{}", key.registry_path())
}

/// Provider with canned outputs.
#[derive(Debug, Default)]
pub struct MockProvider {
    results: HashMap<String, RawResult>,
    visual_studio: Vec<PathBuf>,
    cpu: Option<CpuInfo>,
    memory: Option<MemoryInfo>,
    drives: Option<Vec<DriveInfo>>,
    os: Option<OsInfo>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockProvider {
    /// Create a provider where every probe is unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the result for a probe key.
    pub fn with_result(mut self, key: impl Into<String>, result: RawResult) -> Self {
        self.results.insert(key.into(), result);
        self
    }

    /// Set a successful output for a probe key.
    pub fn with_output(self, key: impl Into<String>, output: &str) -> Self {
        self.with_result(key, RawResult::ok(output))
    }

    /// Make a tool locatable at `/mock/bin/<program>` and answer its version flag.
    pub fn with_tool(self, program: &str, version_output: &str) -> Self {
        let path = format!("/mock/bin/{}", program);
        self.with_output(locate_key(program), &path)
            .with_output(run_key(&path), version_output)
    }

    /// Set the feature list and one detail output per feature.
    pub fn with_features(mut self, list: &str, details: &[(&str, &str)]) -> Self {
        self = self.with_output(LIST_FEATURES, list);
        for (name, detail) in details {
            self = self.with_output(feature_key(name), detail);
        }
        self
    }

    pub fn with_visual_studio(mut self, installs: Vec<PathBuf>) -> Self {
        self.visual_studio = installs;
        self
    }

    pub fn with_cpu(mut self, cpu: CpuInfo) -> Self {
        self.cpu = Some(cpu);
        self
    }

    pub fn with_memory(mut self, memory: MemoryInfo) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_drives(mut self, drives: Vec<DriveInfo>) -> Self {
        self.drives = Some(drives);
        self
    }

    pub fn with_os(mut self, os: OsInfo) -> Self {
        self.os = Some(os);
        self
    }

    /// Number of calls made for a probe key.
    pub fn calls(&self, key: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// Total number of probe calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    fn record(&self, key: &str) {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_insert(0) += 1;
    }

    fn respond(&self, key: &str) -> RawResult {
        self.record(key);
        self.results
            .get(key)
            .cloned()
            .unwrap_or_else(|| RawResult::unavailable(format!("{} not configured", key)))
    }

    fn structured<T: Clone>(&self, key: &str, value: &Option<T>) -> Result<T> {
        self.record(key);
        value.clone().ok_or_else(|| DetectError::ProbeUnavailable {
            probe: key.to_string(),
            reason: "not configured".to_string(),
        })
    }
}

impl ProbeProvider for MockProvider {
    fn list_features(&self) -> RawResult {
        self.respond(LIST_FEATURES)
    }

    fn feature_info(&self, feature: &str) -> RawResult {
        self.respond(&feature_key(feature))
    }

    fn locate_tool(&self, program: &str) -> RawResult {
        self.respond(&locate_key(program))
    }

    fn run_tool(&self, program: &str, _args: &[&str]) -> RawResult {
        self.respond(&run_key(program))
    }

    fn visual_studio_installs(&self) -> Result<Vec<PathBuf>> {
        self.record(VISUAL_STUDIO);
        Ok(self.visual_studio.clone())
    }

    fn os_version_facts(&self) -> RawResult {
        self.respond(OS_VERSION_FACTS)
    }

    fn developer_mode(&self) -> RawResult {
        self.respond(DEVELOPER_MODE)
    }

    fn cpu_info(&self) -> Result<CpuInfo> {
        self.structured(CPU_INFO, &self.cpu)
    }

    fn memory_info(&self) -> Result<MemoryInfo> {
        self.structured(MEMORY_INFO, &self.memory)
    }

    fn disk_inventory(&self) -> Result<Vec<DriveInfo>> {
        self.structured(DISK_INVENTORY, &self.drives)
    }

    fn os_info(&self) -> Result<OsInfo> {
        self.structured(OS_INFO, &self.os)
    }

    fn office_registry(&self, key: OfficeKey) -> RawResult {
        self.respond(&office_key(key))
    }

    fn office_license_status(&self) -> RawResult {
        self.respond(OFFICE_LICENSE)
    }
}
