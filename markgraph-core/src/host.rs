//! Content-graph host collaborator.
//!
//! The engine never creates or stores records itself; it reads them
//! through this trait and reacts to lifecycle events the host emits.

use crate::record::ContentRecord;
use dashmap::DashMap;
use markgraph_types::RecordId;
use std::sync::Arc;

/// What the derivation engine needs from the hosting content graph.
pub trait ContentHost: Send + Sync {
    /// Snapshot of all file-kind records currently in the graph.
    ///
    /// Taken once per pipeline run and handed to every plugin hook of
    /// that run, so all hooks of one run see the same set.
    fn file_records(&self) -> Vec<Arc<ContentRecord>>;

    /// Resolve a record by id, if it still exists.
    fn lookup(&self, id: &RecordId) -> Option<Arc<ContentRecord>>;

    /// Prefix prepended to generated links, e.g. when the site is
    /// served from a subpath.
    fn link_prefix(&self) -> &str;
}

/// A simple map-backed host, sufficient for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    records: DashMap<RecordId, Arc<ContentRecord>>,
    link_prefix: String,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link_prefix(link_prefix: impl Into<String>) -> Self {
        InMemoryHost {
            records: DashMap::new(),
            link_prefix: link_prefix.into(),
        }
    }

    /// Add or replace a record, returning the stored handle.
    pub fn insert(&self, record: ContentRecord) -> Arc<ContentRecord> {
        let record = Arc::new(record);
        self.records.insert(record.id().clone(), record.clone());
        record
    }

    pub fn remove(&self, id: &RecordId) -> Option<Arc<ContentRecord>> {
        self.records.remove(id).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ContentHost for InMemoryHost {
    fn file_records(&self) -> Vec<Arc<ContentRecord>> {
        self.records.iter().map(|entry| entry.value().clone()).collect()
    }

    fn lookup(&self, id: &RecordId) -> Option<Arc<ContentRecord>> {
        self.records.get(id).map(|entry| entry.value().clone())
    }

    fn link_prefix(&self) -> &str {
        &self.link_prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_lookup_remove() {
        let host = InMemoryHost::new();
        assert!(host.is_empty());

        let record = host.insert(ContentRecord::new("a.md", "# A"));
        assert_eq!(host.len(), 1);

        let found = host.lookup(record.id()).unwrap();
        assert!(Arc::ptr_eq(&record, &found));

        host.remove(record.id());
        assert!(host.lookup(record.id()).is_none());
    }

    #[test]
    fn link_prefix_defaults_empty() {
        assert_eq!(InMemoryHost::new().link_prefix(), "");
        assert_eq!(InMemoryHost::with_link_prefix("/blog").link_prefix(), "/blog");
    }
}
