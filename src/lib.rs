//! devkit-detect - Cached detection of developer machine features.
//!
//! Reads which optional OS features, developer tools, productivity suite and
//! hardware a Windows machine has, and caches each category on disk with a
//! time-to-live so repeated queries do not re-run slow system commands.
//!
//! # Modules
//!
//! - [`cache`] - Category store, TTL policy and the cache file
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Detector configuration and duration strings
//! - [`detector`] - The cached feature detector
//! - [`error`] - Error types and result aliases
//! - [`extract`] - Extraction rules for raw probe output
//! - [`probe`] - Probe providers for the host and for tests
//! - [`records`] - Categories and their record types
//!
//! # Example
//!
//! ```
//! use devkit_detect::config::DetectorConfig;
//! use devkit_detect::detector::FeatureDetector;
//! use devkit_detect::probe::MockProvider;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = DetectorConfig::default().with_cache_dir(dir.path());
//! let detector = FeatureDetector::with_provider(config, MockProvider::new());
//!
//! let snapshot = detector.get_all_features(false);
//! assert!(!snapshot.office.installed);
//! assert!(detector.detect_by_name("printers", false).is_err());
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod extract;
pub mod probe;
pub mod records;

pub use error::{DetectError, Result};
