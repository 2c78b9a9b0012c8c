//! Category cache.
//!
//! An in-memory [`CategoryStore`] with one typed slot per category, a
//! [`TtlPolicy`] that decides whether an entry may be served, and the
//! [`CacheFile`] that persists the whole store between runs.

pub mod entry;
pub mod persistence;
pub mod store;
pub mod ttl;

pub use entry::CacheEntry;
pub use persistence::CacheFile;
pub use store::{Cached, CategoryStore};
pub use ttl::{Freshness, TtlPolicy};
