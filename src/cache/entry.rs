//! Cache entry type.

use chrono::{DateTime, Utc};

use crate::records::Category;

/// A category record together with the time it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub category: Category,
    pub data: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Create a new cache entry.
    pub fn new(category: Category, data: T, fetched_at: DateTime<Utc>) -> Self {
        Self {
            category,
            data,
            fetched_at,
        }
    }

    /// Age of this entry at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn age_is_measured_from_fetch() {
        let now = Utc::now();
        let entry = CacheEntry::new(Category::Office, (), now - Duration::hours(3));
        assert_eq!(entry.age(now), Duration::hours(3));
    }
}
