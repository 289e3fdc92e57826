//! Error types for the derivation engine.

use markgraph_types::RecordId;

/// Errors produced while deriving data for a content record.
///
/// The error is `Clone` because a failed pipeline run is stored in the
/// per-record cache slot and handed to every current and future waiter
/// until the record is invalidated.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransformError {
    /// The markdown parser failed on the record's source.
    #[error("failed to parse `{id}`: {message}")]
    Parse { id: RecordId, message: String },

    /// A plugin hook returned an error during the mutate or annotate phase.
    #[error("plugin `{plugin}` failed for `{id}`: {message}")]
    Plugin {
        id: RecordId,
        plugin: String,
        message: String,
    },

    /// Converting the syntax tree to markup failed.
    #[error("failed to render `{id}`: {message}")]
    Render { id: RecordId, message: String },
}

impl TransformError {
    pub(crate) fn plugin(id: &RecordId, plugin: &str, err: anyhow::Error) -> Self {
        TransformError::Plugin {
            id: id.clone(),
            plugin: plugin.to_string(),
            message: format!("{err:#}"),
        }
    }

    /// The record the failure belongs to
    pub fn record_id(&self) -> &RecordId {
        match self {
            TransformError::Parse { id, .. }
            | TransformError::Plugin { id, .. }
            | TransformError::Render { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_error_carries_context() {
        let id = RecordId::new("posts/a.md");
        let err = TransformError::plugin(&id, "frontmatter", anyhow::anyhow!("bad yaml"));

        assert_eq!(err.record_id(), &id);
        let rendered = err.to_string();
        assert!(rendered.contains("frontmatter"));
        assert!(rendered.contains("bad yaml"));
    }
}
