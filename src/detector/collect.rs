//! Per-category collectors: run the probes and extract a record.
//!
//! A collector returns `Err` only when the category as a whole could not be
//! read. Sub-probes that fail leave their fields absent and are logged.

use std::collections::BTreeMap;
use tracing::debug;

use crate::cache::Cached;
use crate::config::DetectorConfig;
use crate::error::{DetectError, Result};
use crate::extract::{features, office, software, system};
use crate::probe::{OfficeKey, OfficeRelease, ProbeProvider, ProbeStatus, RawResult};
use crate::records::{
    FeatureInventory, OfficeRecord, SoftwareInventory, SoftwareRecord, SystemConfigRecord,
};

/// A record that can be collected from a [`ProbeProvider`].
pub trait Detectable: Cached {
    fn collect(provider: &dyn ProbeProvider, config: &DetectorConfig) -> Result<Self>;
}

impl Detectable for FeatureInventory {
    fn collect(provider: &dyn ProbeProvider, config: &DetectorConfig) -> Result<Self> {
        let output = provider.list_features().into_output("dism")?;
        let listed = features::parse_feature_list(&output)?;
        debug!("DISM listed {} features", listed.len());

        let records = listed
            .iter()
            .map(|feature| {
                let info = config
                    .feature_details
                    .then(|| provider.feature_info(&feature.name));
                if let Some(RawResult {
                    error: Some(reason),
                    ..
                }) = &info
                {
                    debug!("No details for {}: {}", feature.name, reason);
                }
                let detail = info.as_ref().and_then(RawResult::ok_output);
                features::feature_record(feature, detail)
            })
            .collect();

        Ok(FeatureInventory(records))
    }
}

impl Detectable for SoftwareInventory {
    fn collect(provider: &dyn ProbeProvider, _config: &DetectorConfig) -> Result<Self> {
        let mut inventory = BTreeMap::new();

        for tool in software::TOOLS {
            let located = provider.locate_tool(tool.program);
            let version = located
                .ok_output()
                .map(|path| provider.run_tool(path.trim(), tool.args));

            if let Some(reason) = version
                .as_ref()
                .and_then(|v| v.error.as_deref())
                .or(located.error.as_deref())
            {
                debug!("{} not detected: {}", tool.id, reason);
            }

            inventory.insert(
                tool.id.to_string(),
                software::tool_record(tool, &located, version.as_ref()),
            );
        }

        let visual_studio = match provider.visual_studio_installs() {
            Ok(installs) => software::visual_studio_record(&installs),
            Err(e) => {
                debug!("Visual Studio not detected: {}", e);
                SoftwareRecord::missing()
            }
        };
        inventory.insert(software::VISUAL_STUDIO_ID.to_string(), visual_studio);

        Ok(SoftwareInventory(inventory))
    }
}

/// Value of a structured probe, or `None` with the failure logged.
fn optional<T>(result: Result<T>) -> Option<T> {
    result.map_err(|e| debug!("{}", e)).ok()
}

impl Detectable for SystemConfigRecord {
    fn collect(provider: &dyn ProbeProvider, _config: &DetectorConfig) -> Result<Self> {
        let mut record = SystemConfigRecord::default();

        if let Some(output) = optional(provider.os_version_facts().into_output("os_version")) {
            let facts = system::parse_os_version(&output);
            record.os_name = facts.os_name;
            record.windows_version = facts.windows_version;
            record.build_number = facts.build_number;
            record.display_version = facts.display_version;
        }

        record.developer_mode = optional(provider.developer_mode().into_output("developer_mode"))
            .is_some_and(|output| system::parse_developer_mode(&output));

        record.cpu = optional(provider.cpu_info());
        record.ram = optional(provider.memory_info());
        record.drives = optional(provider.disk_inventory()).unwrap_or_default();
        record.os_info = optional(provider.os_info());

        Ok(record)
    }
}

impl Detectable for OfficeRecord {
    fn collect(provider: &dyn ProbeProvider, _config: &DetectorConfig) -> Result<Self> {
        let mut any_available = false;
        let mut found = None;

        let keys = std::iter::once(OfficeKey::ClickToRun)
            .chain(OfficeRelease::ALL.into_iter().map(OfficeKey::InstallRoot));

        for key in keys {
            let result = provider.office_registry(key);
            if result.status != ProbeStatus::Unavailable {
                any_available = true;
            }
            let Some(output) = result.ok_output() else {
                continue;
            };
            found = match key {
                OfficeKey::ClickToRun => office::parse_click_to_run(output),
                OfficeKey::InstallRoot(release) => office::parse_install_root(output, release),
            };
            if found.is_some() {
                break;
            }
        }

        let Some(mut record) = found else {
            if !any_available {
                return Err(DetectError::ProbeUnavailable {
                    probe: "office_registry".to_string(),
                    reason: "registry not available on this host".to_string(),
                });
            }
            return Ok(OfficeRecord::default());
        };

        let license = provider.office_license_status();
        record.license_type = license.ok_output().and_then(office::parse_license);
        Ok(record)
    }
}
