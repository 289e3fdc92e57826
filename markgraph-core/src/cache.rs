//! Per-record derived-data caches.
//!
//! Both caches follow the same slot discipline: the pending handle is
//! inserted under the record id synchronously, before any async work
//! starts, so concurrent requests for the same id clone the same slot
//! and await the same computation. This is the only locking mechanism
//! guarding against duplicate parses and must be preserved.
//!
//! Failure policy: a failed computation is stored in the slot and
//! handed to every later caller until the id is invalidated.
//! Invalidation is the retry path.

use crate::error::TransformError;
use crate::pipeline::ParseResult;
use dashmap::DashMap;
use markgraph_types::RecordId;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A pending-or-completed computation handle for one record id.
pub(crate) type Slot<T> = Arc<OnceCell<Result<T, TransformError>>>;

/// Map of record id to computation slot.
#[derive(Debug)]
pub struct SlotCache<T> {
    slots: DashMap<RecordId, Slot<T>>,
}

impl<T: Clone> SlotCache<T> {
    pub fn new() -> Self {
        SlotCache {
            slots: DashMap::new(),
        }
    }

    /// Get the slot for `id`, inserting an empty one if absent.
    ///
    /// The insert happens under the map shard lock, so exactly one slot
    /// exists per id per epoch no matter how many callers race here.
    pub(crate) fn slot(&self, id: &RecordId) -> Slot<T> {
        self.slots.entry(id.clone()).or_default().clone()
    }

    /// Remove the slot for `id` unconditionally, ending its epoch.
    /// Idempotent: invalidating an absent id is a no-op.
    pub fn invalidate(&self, id: &RecordId) -> bool {
        self.slots.remove(id).is_some()
    }

    /// Number of cached (pending or completed) entries
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.slots.clear();
    }
}

impl<T: Clone> Default for SlotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// First-tier cache: parse results keyed by record id.
pub type ParseCache = SlotCache<Arc<ParseResult>>;

/// Second-tier cache: rendered HTML keyed by record id.
pub type HtmlCache = SlotCache<Arc<str>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_callers_share_one_slot() {
        let cache: SlotCache<u32> = SlotCache::new();
        let id = RecordId::new("a");

        let first = cache.slot(&id);
        let second = cache.slot(&id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_starts_a_new_epoch() {
        let cache: SlotCache<u32> = SlotCache::new();
        let id = RecordId::new("a");

        let old = cache.slot(&id);
        old.set(Ok(7)).unwrap();

        assert!(cache.invalidate(&id));
        // Absent id: no-op.
        assert!(!cache.invalidate(&id));

        let fresh = cache.slot(&id);
        assert!(!Arc::ptr_eq(&old, &fresh));
        assert!(fresh.get().is_none());
        // Old waiters still see the epoch they started in.
        assert_eq!(old.get().unwrap().as_ref().unwrap(), &7);
    }

    #[test]
    fn failure_is_retained_in_slot() {
        let cache: SlotCache<u32> = SlotCache::new();
        let id = RecordId::new("a");

        let slot = cache.slot(&id);
        slot.set(Err(TransformError::Parse {
            id: id.clone(),
            message: "bad".into(),
        }))
        .unwrap();

        assert!(cache.slot(&id).get().unwrap().is_err());
    }
}
