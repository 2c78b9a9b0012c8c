//! Cache file on disk.
//!
//! The file is one JSON object mapping category key to
//! `{"data": <record>, "timestamp": <ISO-8601>}`. Loading never fails: a
//! missing or unreadable file is an empty store, and a malformed entry is
//! dropped without discarding the others. An entry stamped further in the
//! future than [`CLOCK_SKEW_TOLERANCE_SECS`] is treated as malformed.

use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::store::{Cached, CategoryStore};
use crate::error::{DetectError, Result};
use crate::records::{
    Category, FeatureInventory, OfficeRecord, SoftwareInventory, SystemConfigRecord,
};

/// How far ahead of the local clock a stored timestamp may be, in seconds.
pub const CLOCK_SKEW_TOLERANCE_SECS: i64 = 300;

#[derive(Serialize)]
struct PersistedEntry<'a, T> {
    data: &'a T,
    timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawEntry {
    data: Value,
    timestamp: String,
}

/// Parse a stored timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// The persisted cache file.
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store from disk.
    pub fn load(&self) -> CategoryStore {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache file at {}", self.path.display());
                return CategoryStore::new();
            }
            Err(e) => {
                warn!("Failed to read cache file {}: {}", self.path.display(), e);
                return CategoryStore::new();
            }
        };

        let entries: Map<String, Value> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                let err = DetectError::CacheCorrupt {
                    path: self.path.clone(),
                    message: e.to_string(),
                };
                warn!("{}; starting with an empty cache", err);
                return CategoryStore::new();
            }
        };

        let latest = Utc::now() + Duration::seconds(CLOCK_SKEW_TOLERANCE_SECS);
        let mut store = CategoryStore::new();
        for (key, value) in entries {
            let Some(category) = Category::from_key(&key) else {
                debug!("Ignoring unknown cache key '{}'", key);
                continue;
            };
            let decoded = match category {
                Category::System => decode_into::<SystemConfigRecord>(value, latest, &mut store),
                Category::WindowsFeatures => decode_into::<FeatureInventory>(value, latest, &mut store),
                Category::Software => decode_into::<SoftwareInventory>(value, latest, &mut store),
                Category::Office => decode_into::<OfficeRecord>(value, latest, &mut store),
            };
            if let Err(message) = decoded {
                let err = DetectError::CacheCorrupt {
                    path: self.path.clone(),
                    message: format!("{}: {}", category, message),
                };
                warn!("{}; dropping entry", err);
            }
        }

        debug!(
            "Loaded {} cache entries from {}",
            store.categories().len(),
            self.path.display()
        );
        store
    }

    /// Write the whole store to disk through a temporary file.
    pub fn save(&self, store: &CategoryStore) -> Result<()> {
        self.write(store).map_err(|e| DetectError::Persistence {
            path: self.path.clone(),
            message: format!("{:#}", e),
        })
    }

    fn write(&self, store: &CategoryStore) -> anyhow::Result<()> {
        let mut entries = Map::new();
        encode_into::<SystemConfigRecord>(store, &mut entries)?;
        encode_into::<FeatureInventory>(store, &mut entries)?;
        encode_into::<SoftwareInventory>(store, &mut entries)?;
        encode_into::<OfficeRecord>(store, &mut entries)?;

        let content = serde_json::to_string_pretty(&Value::Object(entries))
            .context("Failed to serialize cache")?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create cache directory {:?}", dir))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {:?}", temp_path))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;

        Ok(())
    }

    /// Delete the file. Returns whether it existed.
    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DetectError::Persistence {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }
}

fn encode_into<R: Cached>(store: &CategoryStore, entries: &mut Map<String, Value>) -> anyhow::Result<()> {
    if let Some(entry) = store.get::<R>() {
        let value = serde_json::to_value(PersistedEntry {
            data: &entry.data,
            timestamp: entry.fetched_at,
        })
        .with_context(|| format!("Failed to serialize {}", R::CATEGORY))?;
        entries.insert(R::CATEGORY.as_str().to_string(), value);
    }
    Ok(())
}

fn decode_into<R: Cached>(
    value: Value,
    latest: DateTime<Utc>,
    store: &mut CategoryStore,
) -> std::result::Result<(), String> {
    let raw: RawEntry = serde_json::from_value(value).map_err(|e| e.to_string())?;
    let fetched_at = parse_timestamp(&raw.timestamp)
        .ok_or_else(|| format!("invalid timestamp '{}'", raw.timestamp))?;
    if fetched_at > latest {
        return Err(format!("timestamp '{}' is in the future", raw.timestamp));
    }
    let data: R = serde_json::from_value(raw.data).map_err(|e| e.to_string())?;
    store.insert(data, fetched_at);
    Ok(())
}
