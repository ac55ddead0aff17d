//! Bounded lookup of direct message recipients.
//!
//! When the bot itself posts in a direct message channel the gateway payload
//! does not say who the other participant is. Remembering the recipient from
//! earlier messages avoids an HTTP round trip for every such message. The
//! cache is purely an optimization; entries are never authoritative.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

use super::snapshots::UserSnapshot;

/// Least-recently-used map from private channel ID to its recipient.
#[derive(Debug)]
pub struct RecipientCache {
    entries: Option<Mutex<LruCache<i64, UserSnapshot>>>,
}

impl RecipientCache {
    /// Create a cache holding at most `capacity` channels; zero disables it.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    /// Look up the recipient of a channel.
    pub fn get(&self, channel_id: i64) -> Option<UserSnapshot> {
        self.entries
            .as_ref()
            .and_then(|entries| entries.lock().get(&channel_id).cloned())
    }

    /// Remember the recipient of a channel.
    pub fn insert(&self, channel_id: i64, recipient: UserSnapshot) {
        if let Some(entries) = &self.entries {
            entries.lock().put(channel_id, recipient);
        }
    }

    /// Number of cached channels.
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    /// Whether no channel is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::snapshots::UserSnapshotBuilder;
    use chrono::NaiveDate;

    fn user(id: i64) -> UserSnapshot {
        UserSnapshotBuilder::default()
            .id(id)
            .created_at(
                NaiveDate::from_ymd_opt(2020, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )
            .name(format!("user{}", id))
            .build()
            .unwrap()
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = RecipientCache::new(2);
        cache.insert(1, user(10));
        cache.insert(2, user(20));
        // Touch channel 1 so channel 2 is evicted next.
        assert_eq!(cache.get(1).map(|u| *u.id()), Some(10));
        cache.insert(3, user(30));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(2).is_none());
        assert_eq!(cache.get(3).map(|u| *u.id()), Some(30));
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = RecipientCache::new(0);
        cache.insert(1, user(10));
        assert!(cache.is_empty());
        assert!(cache.get(1).is_none());
    }
}
