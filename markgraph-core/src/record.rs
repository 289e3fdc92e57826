//! Content records and their attached derived fields.

use crate::tree::MarkdownTree;
use markgraph_types::{Heading, RecordId};
use parking_lot::RwLock;
use std::sync::Arc;

/// Derived data attached to a record, set once per cache epoch and
/// cleared on invalidation.
#[derive(Debug, Default)]
struct DerivedFields {
    tree: Option<Arc<MarkdownTree>>,
    html: Option<Arc<str>>,
    headings: Option<Arc<[Heading]>>,
}

/// A unit of ingested source content, one per file.
///
/// The host owns the record's lifecycle; the engine only attaches and
/// reads derived fields. Source text sits behind a lock because plugins
/// in the mutate phase may rewrite it in place before parsing.
#[derive(Debug)]
pub struct ContentRecord {
    id: RecordId,
    source: RwLock<String>,
    derived: RwLock<DerivedFields>,
}

impl ContentRecord {
    pub fn new(id: impl Into<RecordId>, source: impl Into<String>) -> Self {
        ContentRecord {
            id: id.into(),
            source: RwLock::new(source.into()),
            derived: RwLock::new(DerivedFields::default()),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Current raw source text, verbatim
    pub fn source(&self) -> String {
        self.source.read().clone()
    }

    /// Replace the source wholesale, e.g. after the file changed on disk.
    ///
    /// The host must follow this with an invalidation event for the
    /// record's id, otherwise cached derived data stays stale.
    pub fn replace_source(&self, source: impl Into<String>) {
        *self.source.write() = source.into();
    }

    /// Mutate the source in place. Used by mutate-phase plugins.
    pub fn mutate_source(&self, f: impl FnOnce(&mut String)) {
        f(&mut self.source.write());
    }

    /// Parsed syntax tree for the current epoch, if computed
    pub fn tree(&self) -> Option<Arc<MarkdownTree>> {
        self.derived.read().tree.clone()
    }

    /// Rendered HTML for the current epoch, if computed
    pub fn html(&self) -> Option<Arc<str>> {
        self.derived.read().html.clone()
    }

    /// Extracted headings for the current epoch, if computed
    pub fn headings(&self) -> Option<Arc<[Heading]>> {
        self.derived.read().headings.clone()
    }

    pub(crate) fn set_parsed(&self, tree: Arc<MarkdownTree>, headings: Arc<[Heading]>) {
        let mut derived = self.derived.write();
        derived.tree = Some(tree);
        derived.headings = Some(headings);
    }

    pub(crate) fn set_html(&self, html: Arc<str>) {
        self.derived.write().html = Some(html);
    }

    /// Drop all attached derived fields, ending the current epoch.
    pub(crate) fn clear_derived(&self) {
        *self.derived.write() = DerivedFields::default();
    }
}
