//! In-memory category store.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::entry::CacheEntry;
use crate::records::{
    Category, FeatureInventory, OfficeRecord, SoftwareInventory, SystemConfigRecord,
};

/// A record type that has its own slot in the [`CategoryStore`].
pub trait Cached: Clone + Default + Serialize + DeserializeOwned + Send + 'static {
    const CATEGORY: Category;

    fn slot(store: &CategoryStore) -> &Option<CacheEntry<Self>>;

    fn slot_mut(store: &mut CategoryStore) -> &mut Option<CacheEntry<Self>>;
}

/// One typed entry per category.
///
/// Entries are overwritten wholesale; nothing is merged field by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryStore {
    system: Option<CacheEntry<SystemConfigRecord>>,
    windows_features: Option<CacheEntry<FeatureInventory>>,
    software: Option<CacheEntry<SoftwareInventory>>,
    office: Option<CacheEntry<OfficeRecord>>,
}

impl Cached for SystemConfigRecord {
    const CATEGORY: Category = Category::System;

    fn slot(store: &CategoryStore) -> &Option<CacheEntry<Self>> {
        &store.system
    }

    fn slot_mut(store: &mut CategoryStore) -> &mut Option<CacheEntry<Self>> {
        &mut store.system
    }
}

impl Cached for FeatureInventory {
    const CATEGORY: Category = Category::WindowsFeatures;

    fn slot(store: &CategoryStore) -> &Option<CacheEntry<Self>> {
        &store.windows_features
    }

    fn slot_mut(store: &mut CategoryStore) -> &mut Option<CacheEntry<Self>> {
        &mut store.windows_features
    }
}

impl Cached for SoftwareInventory {
    const CATEGORY: Category = Category::Software;

    fn slot(store: &CategoryStore) -> &Option<CacheEntry<Self>> {
        &store.software
    }

    fn slot_mut(store: &mut CategoryStore) -> &mut Option<CacheEntry<Self>> {
        &mut store.software
    }
}

impl Cached for OfficeRecord {
    const CATEGORY: Category = Category::Office;

    fn slot(store: &CategoryStore) -> &Option<CacheEntry<Self>> {
        &store.office
    }

    fn slot_mut(store: &mut CategoryStore) -> &mut Option<CacheEntry<Self>> {
        &mut store.office
    }
}

impl CategoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored entry for a record type.
    pub fn get<R: Cached>(&self) -> Option<&CacheEntry<R>> {
        R::slot(self).as_ref()
    }

    /// Replace the entry for a record type and return its timestamp.
    ///
    /// The timestamp never moves backwards: it is `now`, or the previous
    /// timestamp if the clock went back.
    pub fn put<R: Cached>(&mut self, data: R, now: DateTime<Utc>) -> DateTime<Utc> {
        let slot = R::slot_mut(self);
        let fetched_at = match slot {
            Some(previous) => now.max(previous.fetched_at),
            None => now,
        };
        *slot = Some(CacheEntry::new(R::CATEGORY, data, fetched_at));
        fetched_at
    }

    /// Insert an entry as-is (used when loading from disk).
    pub fn insert<R: Cached>(&mut self, data: R, fetched_at: DateTime<Utc>) {
        *R::slot_mut(self) = Some(CacheEntry::new(R::CATEGORY, data, fetched_at));
    }

    /// When a category was last fetched.
    pub fn fetched_at(&self, category: Category) -> Option<DateTime<Utc>> {
        match category {
            Category::System => self.system.as_ref().map(|e| e.fetched_at),
            Category::WindowsFeatures => self.windows_features.as_ref().map(|e| e.fetched_at),
            Category::Software => self.software.as_ref().map(|e| e.fetched_at),
            Category::Office => self.office.as_ref().map(|e| e.fetched_at),
        }
    }

    /// Categories that currently have an entry.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.fetched_at(*c).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_store_is_empty() {
        let store = CategoryStore::new();
        assert!(store.is_empty());
        assert!(store.get::<OfficeRecord>().is_none());
    }

    #[test]
    fn put_and_get() {
        let mut store = CategoryStore::new();
        let now = Utc::now();
        let record = OfficeRecord {
            installed: true,
            ..Default::default()
        };

        let stamped = store.put(record.clone(), now);
        let entry = store.get::<OfficeRecord>().unwrap();
        assert_eq!(stamped, now);
        assert_eq!(entry.category, Category::Office);
        assert_eq!(entry.data, record);
        assert_eq!(store.categories(), vec![Category::Office]);
    }

    #[test]
    fn put_overwrites_wholesale() {
        let mut store = CategoryStore::new();
        let now = Utc::now();
        store.put(
            OfficeRecord {
                installed: true,
                edition: Some("O365ProPlusRetail".into()),
                ..Default::default()
            },
            now,
        );
        store.put(OfficeRecord::default(), now + Duration::hours(1));

        assert_eq!(store.get::<OfficeRecord>().unwrap().data, OfficeRecord::default());
    }

    #[test]
    fn fetched_at_never_decreases() {
        let mut store = CategoryStore::new();
        let now = Utc::now();
        store.put(SoftwareInventory::default(), now);

        let stamped = store.put(SoftwareInventory::default(), now - Duration::minutes(10));
        assert_eq!(stamped, now);
        assert_eq!(store.fetched_at(Category::Software), Some(now));
    }

    #[test]
    fn categories_follow_snapshot_order() {
        let mut store = CategoryStore::new();
        let now = Utc::now();
        store.put(OfficeRecord::default(), now);
        store.put(SystemConfigRecord::default(), now);

        assert_eq!(store.categories(), vec![Category::System, Category::Office]);
    }

    #[test]
    fn clear_removes_everything() {
        let mut store = CategoryStore::new();
        store.put(FeatureInventory::default(), Utc::now());
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.fetched_at(Category::WindowsFeatures), None);
    }
}
