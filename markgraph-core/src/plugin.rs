//! Transformer plugins.
//!
//! A plugin may expose either or both of two hooks: a mutate-source
//! hook that rewrites raw source before parsing, and an annotate hook
//! that runs against the parsed tree. Capabilities are declared
//! structurally: a hook accessor returning `None` means the plugin is
//! skipped for that phase, which is expected and not an error.

use crate::host::ContentHost;
use crate::record::ContentRecord;
use crate::tree::MarkdownTree;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// Context handed to mutate-source hooks.
pub struct MutateContext<'a> {
    /// The record being processed. Hooks rewrite its source in place
    /// via [`ContentRecord::mutate_source`].
    pub record: &'a Arc<ContentRecord>,
    /// Snapshot of all file records taken at the start of the run.
    pub files: &'a [Arc<ContentRecord>],
    /// The content-graph host, for record lookup.
    pub host: &'a dyn ContentHost,
    /// Options configured for this plugin.
    pub options: &'a serde_json::Value,
}

/// Context handed to annotate hooks.
pub struct AnnotateContext<'a> {
    /// The in-flight tree. Hooks lock it to read, annotate, or rewrite
    /// the event stream.
    pub tree: &'a RwLock<MarkdownTree>,
    pub record: &'a Arc<ContentRecord>,
    pub files: &'a [Arc<ContentRecord>],
    pub host: &'a dyn ContentHost,
    pub options: &'a serde_json::Value,
    /// Prefix for generated links, supplied by the host.
    pub link_prefix: &'a str,
}

impl std::fmt::Debug for MutateContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutateContext")
            .field("record", self.record.id())
            .field("files", &self.files.len())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for AnnotateContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotateContext")
            .field("record", self.record.id())
            .field("files", &self.files.len())
            .field("link_prefix", &self.link_prefix)
            .finish_non_exhaustive()
    }
}

/// Mutate-source capability: runs before parsing.
#[async_trait]
pub trait SourceMutator: Send + Sync {
    async fn mutate_source(&self, ctx: MutateContext<'_>) -> anyhow::Result<()>;
}

/// Annotate capability: runs against the freshly parsed tree.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, ctx: AnnotateContext<'_>) -> anyhow::Result<()>;
}

/// A transformation plugin with structurally optional capabilities.
pub trait Transformer: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    fn source_mutator(&self) -> Option<&dyn SourceMutator> {
        None
    }

    fn annotator(&self) -> Option<&dyn Annotator> {
        None
    }
}

/// A configured plugin: the transformer plus its options.
///
/// Descriptors form an ordered sequence; the order is significant and
/// preserved exactly, since later plugins may depend on annotations or
/// source mutations made by earlier ones.
#[derive(Clone)]
pub struct PluginDescriptor {
    plugin: Arc<dyn Transformer>,
    options: serde_json::Value,
}

impl PluginDescriptor {
    pub fn new(plugin: Arc<dyn Transformer>) -> Self {
        PluginDescriptor {
            plugin,
            options: serde_json::Value::Null,
        }
    }

    pub fn with_options(plugin: Arc<dyn Transformer>, options: serde_json::Value) -> Self {
        PluginDescriptor { plugin, options }
    }

    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    pub fn options(&self) -> &serde_json::Value {
        &self.options
    }

    pub fn source_mutator(&self) -> Option<&dyn SourceMutator> {
        self.plugin.source_mutator()
    }

    pub fn annotator(&self) -> Option<&dyn Annotator> {
        self.plugin.annotator()
    }
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inert;

    impl Transformer for Inert {
        fn name(&self) -> &str {
            "inert"
        }
    }

    #[test]
    fn capabilities_default_to_absent() {
        let desc = PluginDescriptor::new(Arc::new(Inert));
        assert!(desc.source_mutator().is_none());
        assert!(desc.annotator().is_none());
        assert_eq!(desc.name(), "inert");
        assert!(desc.options().is_null());
    }

    #[test]
    fn options_are_carried() {
        let desc =
            PluginDescriptor::with_options(Arc::new(Inert), serde_json::json!({"depth": 2}));
        assert_eq!(desc.options()["depth"], 2);
    }
}
