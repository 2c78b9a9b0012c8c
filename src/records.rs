//! Categories and the typed records detected for each of them.
//!
//! Every category has exactly one record type. Records are plain data: they
//! are cloned out of the store for callers and overwritten wholesale on refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DetectError;

/// A named grouping of facts that is cached and refreshed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    System,
    WindowsFeatures,
    Software,
    Office,
}

impl Category {
    /// All categories, in snapshot order.
    pub const ALL: [Category; 4] = [
        Category::System,
        Category::WindowsFeatures,
        Category::Software,
        Category::Office,
    ];

    /// Key used in the cache file and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::System => "system",
            Category::WindowsFeatures => "windows_features",
            Category::Software => "software",
            Category::Office => "office",
        }
    }

    /// Exact lookup by cache-file key.
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Category::from_key(&key).ok_or_else(|| DetectError::UnknownCategory {
            name: s.to_string(),
        })
    }
}

/// One optional OS feature and its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub name: String,
    pub installed: bool,
    /// `key : value` lines from the feature detail output, sorted by key.
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

/// All optional OS features, in the order the host listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureInventory(pub Vec<FeatureRecord>);

impl FeatureInventory {
    /// Look up a feature by name.
    pub fn get(&self, name: &str) -> Option<&FeatureRecord> {
        self.0.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Names of enabled features.
    pub fn installed(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter(|f| f.installed).map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A Visual Studio installation found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualStudioInstall {
    pub year: String,
    pub edition: String,
    pub path: String,
}

/// Detection result for one developer tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareRecord {
    pub installed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub installations: Vec<VisualStudioInstall>,
}

impl SoftwareRecord {
    /// Record for a tool that is not installed.
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Tool id → detection result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoftwareInventory(pub BTreeMap<String, SoftwareRecord>);

impl SoftwareInventory {
    pub fn get(&self, tool: &str) -> Option<&SoftwareRecord> {
        self.0.get(tool)
    }

    /// Whether a tool was detected as installed.
    pub fn is_installed(&self, tool: &str) -> bool {
        self.0.get(tool).is_some_and(|r| r.installed)
    }
}

/// Processor summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub name: String,
    pub cores: Option<usize>,
    pub logical_processors: usize,
    pub architecture: String,
    pub max_clock_mhz: u64,
}

/// Physical memory summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_gb: f64,
}

/// One fixed (non-removable) volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveInfo {
    pub drive: String,
    pub volume_name: String,
    pub size_gb: f64,
    pub free_gb: f64,
}

/// Operating system summary from the hardware inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub version: String,
    pub build: String,
    pub architecture: String,
}

/// OS version, developer mode and hardware facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemConfigRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_version: Option<String>,
    #[serde(default)]
    pub developer_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<MemoryInfo>,
    #[serde(default)]
    pub drives: Vec<DriveInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_info: Option<OsInfo>,
}

/// Office volume/retail licensing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    Volume,
    Retail,
}

/// Productivity suite installation details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeRecord {
    pub installed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ltsc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<LicenseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A record of any category, for string-keyed access.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryData {
    System(SystemConfigRecord),
    WindowsFeatures(FeatureInventory),
    Software(SoftwareInventory),
    Office(OfficeRecord),
}

impl CategoryData {
    pub fn category(&self) -> Category {
        match self {
            CategoryData::System(_) => Category::System,
            CategoryData::WindowsFeatures(_) => Category::WindowsFeatures,
            CategoryData::Software(_) => Category::Software,
            CategoryData::Office(_) => Category::Office,
        }
    }
}

/// Result of refreshing every category in one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedSnapshot {
    pub system: SystemConfigRecord,
    pub windows_features: FeatureInventory,
    pub software: SoftwareInventory,
    pub office: OfficeRecord,
    /// Wall-clock time of the call, not the age of the data.
    pub snapshot_timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_canonical_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn category_parse_normalizes_case_and_dashes() {
        assert_eq!(
            "Windows-Features".parse::<Category>().unwrap(),
            Category::WindowsFeatures
        );
    }

    #[test]
    fn from_key_is_exact() {
        assert_eq!(Category::from_key("office"), Some(Category::Office));
        assert_eq!(Category::from_key("Office"), None);
        assert_eq!(Category::from_key("installed_software"), None);
    }

    #[test]
    fn unknown_category_fails_loudly() {
        let err = "printers".parse::<Category>().unwrap_err();
        assert!(matches!(err, DetectError::UnknownCategory { name } if name == "printers"));
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::WindowsFeatures).unwrap();
        assert_eq!(json, "\"windows_features\"");
    }

    #[test]
    fn software_record_omits_absent_fields() {
        let json = serde_json::to_value(SoftwareRecord::missing()).unwrap();
        assert_eq!(json, serde_json::json!({ "installed": false }));
    }

    #[test]
    fn office_license_serializes_lowercase() {
        let record = OfficeRecord {
            installed: true,
            license_type: Some(LicenseType::Volume),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["license_type"], "volume");
    }

    #[test]
    fn feature_inventory_lookup_is_case_insensitive() {
        let inventory = FeatureInventory(vec![
            FeatureRecord {
                name: "NetFx3".into(),
                installed: true,
                details: BTreeMap::new(),
            },
            FeatureRecord {
                name: "TelnetClient".into(),
                installed: false,
                details: BTreeMap::new(),
            },
        ]);

        assert!(inventory.get("netfx3").unwrap().installed);
        assert_eq!(inventory.installed().collect::<Vec<_>>(), vec!["NetFx3"]);
    }

    #[test]
    fn software_inventory_is_installed() {
        let mut map = BTreeMap::new();
        map.insert(
            "git".to_string(),
            SoftwareRecord {
                installed: true,
                version: Some("2.43.0".into()),
                ..Default::default()
            },
        );
        let inventory = SoftwareInventory(map);
        assert!(inventory.is_installed("git"));
        assert!(!inventory.is_installed("node"));
    }
}
