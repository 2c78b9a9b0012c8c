//! Detector configuration.
//!
//! A [`DetectorConfig`] is passed explicitly to the detector at construction.
//! It can be built from defaults, loaded from a YAML file, and then adjusted
//! by the host (command-line flags, environment).
//!
//! # Example
//!
//! ```
//! use devkit_detect::config::DetectorConfig;
//!
//! let config = DetectorConfig::default().with_cache_dir("/tmp/devkit-cache");
//! assert!(config.cache_path().ends_with("feature_cache.json"));
//! ```

pub mod duration;

pub use duration::{format_duration, parse_duration};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use crate::error::{DetectError, Result};

/// Default cache file name inside the cache directory.
pub const DEFAULT_CACHE_FILE: &str = "feature_cache.json";

/// Default age after which a cached category is re-probed.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Default time budget for a single external probe.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Get the default cache directory.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("DevToolkit")
        .join("cache")
}

/// Runtime configuration for the detector.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Directory holding the cache file.
    pub cache_dir: PathBuf,
    /// Cache file name within `cache_dir`.
    pub cache_file: String,
    /// Maximum age at which a cached category is served without probing.
    pub ttl: chrono::Duration,
    /// Time budget for each external command.
    pub probe_timeout: StdDuration,
    /// Run a detail probe per Windows feature.
    pub feature_details: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            cache_file: DEFAULT_CACHE_FILE.to_string(),
            ttl: chrono::Duration::hours(DEFAULT_TTL_HOURS),
            probe_timeout: StdDuration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            feature_details: true,
        }
    }
}

/// On-disk shape of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    cache_dir: Option<PathBuf>,
    ttl: Option<String>,
    probe_timeout: Option<String>,
    feature_details: Option<bool>,
}

impl DetectorConfig {
    /// Load configuration from a YAML file, filling missing keys with defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| match e {
            DetectError::InvalidDuration { value } => DetectError::ConfigParseError {
                path: path.to_path_buf(),
                message: format!("invalid duration '{}'", value),
            },
            DetectError::ConfigParseError { message, .. } => DetectError::ConfigParseError {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| DetectError::ConfigParseError {
                path: PathBuf::new(),
                message: e.to_string(),
            })?
        };

        let mut config = Self::default();
        if let Some(dir) = file.cache_dir {
            config.cache_dir = dir;
        }
        if let Some(ttl) = file.ttl {
            config.ttl = parse_duration(&ttl)?;
        }
        if let Some(timeout) = file.probe_timeout {
            config = config.with_probe_timeout(parse_duration(&timeout)?);
        }
        if let Some(details) = file.feature_details {
            config.feature_details = details;
        }
        Ok(config)
    }

    /// Full path of the cache file.
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(&self.cache_file)
    }

    /// Set the cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set the cache TTL.
    pub fn with_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the per-probe time budget. A zero budget falls back to the default.
    pub fn with_probe_timeout(mut self, timeout: chrono::Duration) -> Self {
        self.probe_timeout = timeout
            .to_std()
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(StdDuration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS));
        self
    }

    /// Enable or disable per-feature detail probes.
    pub fn with_feature_details(mut self, enabled: bool) -> Self {
        self.feature_details = enabled;
        self
    }
}
