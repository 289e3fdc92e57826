//! Shared types for markgraph
//!
//! This crate provides common types used across the markgraph ecosystem,
//! including content-record identifiers, extracted headings, and record
//! change events.

use serde::{Deserialize, Serialize};

/// Content record identifier
///
/// Stable and unique per source file. The host assigns it when a record
/// is ingested and reuses it when the record is recreated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId(id)
    }
}

/// A heading extracted from a parsed document
///
/// `depth` is the markdown heading level, 1 through 6. Headings are
/// immutable once computed for a given cache epoch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    /// First text run contained in the heading
    pub value: String,
    /// Heading level, 1-6
    pub depth: u8,
}

impl Heading {
    pub fn new(value: impl Into<String>, depth: u8) -> Self {
        Self {
            value: value.into(),
            depth,
        }
    }
}

/// Record change event
///
/// Emitted by the content-graph host when a record's lifecycle changes.
/// The derivation engine reacts by evicting cached derived data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RecordChange {
    /// The record was recreated, e.g. its source file changed on disk
    /// and was re-ingested under the same identifier.
    Recreated { id: RecordId },

    /// The record was removed from the content graph.
    Deleted { id: RecordId },
}

impl RecordChange {
    /// The identifier the change applies to
    pub fn id(&self) -> &RecordId {
        match self {
            RecordChange::Recreated { id } | RecordChange::Deleted { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_roundtrip() {
        let id = RecordId::new("posts/hello.md");
        assert_eq!(id.as_str(), "posts/hello.md");
        assert_eq!(id, RecordId::from("posts/hello.md"));
        assert_eq!(id.to_string(), "posts/hello.md");
    }

    #[test]
    fn change_exposes_id() {
        let id = RecordId::new("a");
        let change = RecordChange::Recreated { id: id.clone() };
        assert_eq!(change.id(), &id);

        let change = RecordChange::Deleted { id: id.clone() };
        assert_eq!(change.id(), &id);
    }
}
