//! Time-to-live freshness policy.

use chrono::{DateTime, Duration, Utc};

/// Freshness of a category entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No entry exists.
    Absent,
    /// Entry is younger than the TTL.
    Fresh,
    /// Entry reached the TTL and must be re-probed.
    Stale,
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }
}

/// Decides whether a stored entry may be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    ttl: Duration,
}

impl TtlPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// An entry is fresh iff `now - fetched_at < ttl`.
    ///
    /// Timestamps in the future count as age zero.
    pub fn freshness(&self, fetched_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Freshness {
        match fetched_at {
            None => Freshness::Absent,
            Some(at) => {
                let age = now.signed_duration_since(at).max(Duration::zero());
                if age < self.ttl {
                    Freshness::Fresh
                } else {
                    Freshness::Stale
                }
            }
        }
    }
}
