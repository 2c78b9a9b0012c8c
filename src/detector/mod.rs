//! The feature detector: cached, per-category access to host facts.
//!
//! [`FeatureDetector`] owns the category store and the cache file. Each
//! `detect_*` call checks the TTL, and on a miss runs the category's
//! collector, stores the new record, and saves the cache. Probe and
//! extraction failures degrade the category to its default record; they
//! are logged and never returned.
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
//! let provider = MockProvider::new().with_tool("git", "git version 2.43.0");
//! let detector = FeatureDetector::with_provider(config, provider);
//!
//! let software = detector.detect_software(false);
//! assert_eq!(software.get("git").unwrap().version.as_deref(), Some("2.43.0"));
//! ```

mod collect;

pub use collect::Detectable;

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::cache::{CacheFile, CategoryStore, Freshness, TtlPolicy};
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::probe::{HostProvider, ProbeProvider};
use crate::records::{
    Category, CategoryData, ConsolidatedSnapshot, FeatureInventory, OfficeRecord,
    SoftwareInventory, SystemConfigRecord,
};

/// Cached detector over a probe provider.
pub struct FeatureDetector<P: ProbeProvider = HostProvider> {
    config: DetectorConfig,
    provider: P,
    policy: TtlPolicy,
    cache_file: CacheFile,
    store: Mutex<CategoryStore>,
}

impl FeatureDetector<HostProvider> {
    /// Create a detector that probes the current host.
    pub fn new(config: DetectorConfig) -> Self {
        let provider = HostProvider::from_config(&config);
        Self::with_provider(config, provider)
    }
}

impl<P: ProbeProvider> FeatureDetector<P> {
    /// Create a detector over the given provider, loading the cache file.
    pub fn with_provider(config: DetectorConfig, provider: P) -> Self {
        let cache_file = CacheFile::new(config.cache_path());
        let store = cache_file.load();

        Self {
            policy: TtlPolicy::new(config.ttl),
            provider,
            cache_file,
            store: Mutex::new(store),
            config,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache_path(&self) -> &Path {
        self.cache_file.path()
    }

    fn lock(&self) -> MutexGuard<'_, CategoryStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the record for `R`, probing only when absent, stale or forced.
    ///
    /// The store stays locked until the new record is saved, so concurrent
    /// callers never probe the same category twice.
    pub fn get<R: Detectable>(&self, force_refresh: bool) -> R {
        let mut store = self.lock();

        if !force_refresh {
            if let Some(entry) = store.get::<R>() {
                if self.policy.freshness(Some(entry.fetched_at), Utc::now()).is_fresh() {
                    debug!("Using cached {}", R::CATEGORY);
                    return entry.data.clone();
                }
            }
        }

        info!("Detecting {} (forced={})", R::CATEGORY, force_refresh);
        let data = match R::collect(&self.provider, &self.config) {
            Ok(data) => data,
            Err(e) if e.is_probe_error() => {
                info!("{} not available, using defaults: {}", R::CATEGORY, e);
                R::default()
            }
            Err(e) => {
                warn!("Failed to detect {}, using defaults: {}", R::CATEGORY, e);
                R::default()
            }
        };

        store.put(data.clone(), Utc::now());
        if let Err(e) = self.cache_file.save(&store) {
            warn!("{}", e);
        }

        data
    }

    pub fn detect_system(&self, force_refresh: bool) -> SystemConfigRecord {
        self.get(force_refresh)
    }

    pub fn detect_windows_features(&self, force_refresh: bool) -> FeatureInventory {
        self.get(force_refresh)
    }

    pub fn detect_software(&self, force_refresh: bool) -> SoftwareInventory {
        self.get(force_refresh)
    }

    pub fn detect_office(&self, force_refresh: bool) -> OfficeRecord {
        self.get(force_refresh)
    }

    /// Detect one category.
    pub fn detect(&self, category: Category, force_refresh: bool) -> CategoryData {
        match category {
            Category::System => CategoryData::System(self.detect_system(force_refresh)),
            Category::WindowsFeatures => {
                CategoryData::WindowsFeatures(self.detect_windows_features(force_refresh))
            }
            Category::Software => CategoryData::Software(self.detect_software(force_refresh)),
            Category::Office => CategoryData::Office(self.detect_office(force_refresh)),
        }
    }

    /// Detect a category by name. Unknown names are an error.
    pub fn detect_by_name(&self, name: &str, force_refresh: bool) -> Result<CategoryData> {
        let category: Category = name.parse()?;
        Ok(self.detect(category, force_refresh))
    }

    /// All categories at once.
    ///
    /// `snapshot_timestamp` is the time of this call; use [`fetched_at`]
    /// for the age of each category.
    ///
    /// [`fetched_at`]: FeatureDetector::fetched_at
    pub fn get_all_features(&self, force_refresh: bool) -> ConsolidatedSnapshot {
        ConsolidatedSnapshot {
            system: self.detect_system(force_refresh),
            windows_features: self.detect_windows_features(force_refresh),
            software: self.detect_software(force_refresh),
            office: self.detect_office(force_refresh),
            snapshot_timestamp: Utc::now(),
        }
    }

    /// Empty the store and delete the cache file.
    ///
    /// Returns whether a cache file was removed.
    pub fn clear_cache(&self) -> bool {
        let mut store = self.lock();
        store.clear();
        info!("Cleared feature cache");

        match self.cache_file.remove() {
            Ok(removed) => removed,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    /// When a category was last fetched.
    pub fn fetched_at(&self, category: Category) -> Option<DateTime<Utc>> {
        self.lock().fetched_at(category)
    }

    /// Whether a category would be served from the cache right now.
    pub fn freshness(&self, category: Category) -> Freshness {
        let fetched_at = self.fetched_at(category);
        self.policy.freshness(fetched_at, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::mock::{self, MockProvider};
    use chrono::Duration;
    use tempfile::TempDir;

    fn detector(temp: &TempDir, provider: MockProvider) -> FeatureDetector<MockProvider> {
        let config = DetectorConfig::default().with_cache_dir(temp.path());
        FeatureDetector::with_provider(config, provider)
    }

    #[test]
    fn second_call_is_served_from_cache() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, MockProvider::new().with_tool("git", "git version 2.43.0"));

        let first = detector.detect_software(false);
        let second = detector.detect_software(false);

        assert_eq!(first, second);
        assert_eq!(detector.provider().calls(&mock::locate_key("git")), 1);
        assert_eq!(detector.freshness(Category::Software), Freshness::Fresh);
    }

    #[test]
    fn force_refresh_probes_again() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, MockProvider::new());

        detector.detect_office(false);
        detector.detect_office(true);

        assert_eq!(
            detector.provider().calls(&mock::office_key(crate::probe::OfficeKey::ClickToRun)),
            2
        );
    }

    #[test]
    fn degraded_category_is_still_cached() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, MockProvider::new());

        let features = detector.detect_windows_features(false);
        assert!(features.is_empty());
        assert!(detector.fetched_at(Category::WindowsFeatures).is_some());

        detector.detect_windows_features(false);
        assert_eq!(detector.provider().calls(mock::LIST_FEATURES), 1);
    }

    #[test]
    fn zero_ttl_always_probes() {
        let temp = TempDir::new().unwrap();
        let config = DetectorConfig::default()
            .with_cache_dir(temp.path())
            .with_ttl(Duration::zero());
        let detector = FeatureDetector::with_provider(config, MockProvider::new());

        detector.detect_system(false);
        detector.detect_system(false);

        assert_eq!(detector.provider().calls(mock::OS_VERSION_FACTS), 2);
    }

    #[test]
    fn detect_by_name_rejects_unknown() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, MockProvider::new());

        assert!(detector.detect_by_name("printers", false).is_err());
        assert_eq!(detector.provider().total_calls(), 0);

        let data = detector.detect_by_name("Office", false).unwrap();
        assert_eq!(data.category(), Category::Office);
    }

    #[test]
    fn clear_cache_resets_state() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, MockProvider::new());

        detector.detect_office(false);
        assert!(detector.cache_path().exists());

        assert!(detector.clear_cache());
        assert!(!detector.cache_path().exists());
        assert_eq!(detector.freshness(Category::Office), Freshness::Absent);
        assert!(!detector.clear_cache());
    }

    #[test]
    fn snapshot_covers_every_category() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, MockProvider::new());

        let before = Utc::now();
        let snapshot = detector.get_all_features(false);

        assert!(snapshot.snapshot_timestamp >= before);
        for category in Category::ALL {
            assert!(detector.fetched_at(category).is_some(), "{} missing", category);
        }
    }

    #[test]
    fn concurrent_callers_probe_once() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, MockProvider::new().with_tool("git", "git version 2.43.0"));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| detector.detect_software(false));
            }
        });

        assert_eq!(detector.provider().calls(&mock::locate_key("git")), 1);
    }
}
