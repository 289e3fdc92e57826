//! Two-phase plugin pipeline.
//!
//! Phase one dispatches every mutate-source hook; phase two parses the
//! (possibly mutated) source exactly once and dispatches every annotate
//! hook. Within a phase, hooks are dispatched in configured order but
//! run concurrently and may complete in any order; the parse step is
//! the synchronization barrier between the phases.

use crate::error::TransformError;
use crate::host::ContentHost;
use crate::plugin::{AnnotateContext, MutateContext, PluginDescriptor};
use crate::record::ContentRecord;
use crate::tree::MarkdownTree;
use futures::future::try_join_all;
use markgraph_types::Heading;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Output of one pipeline run: the parsed tree plus the headings
/// extracted from it. At most one per record id per cache epoch.
#[derive(Debug)]
pub struct ParseResult {
    pub tree: Arc<MarkdownTree>,
    pub headings: Arc<[Heading]>,
}

/// Runs the configured plugin sequence over one record.
pub struct PipelineRunner {
    host: Arc<dyn ContentHost>,
    plugins: Vec<PluginDescriptor>,
}

impl std::fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}

impl PipelineRunner {
    pub fn new(host: Arc<dyn ContentHost>, plugins: Vec<PluginDescriptor>) -> Self {
        PipelineRunner { host, plugins }
    }

    pub fn plugins(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    /// Execute both phases for `record` and produce its parse result.
    ///
    /// Any hook failure fails the whole run; no partial tree is
    /// exposed. There is no cancellation path: a run goes to completion
    /// or failure.
    pub async fn run(&self, record: &Arc<ContentRecord>) -> Result<Arc<ParseResult>, TransformError> {
        let id = record.id();
        let files = self.host.file_records();

        // Phase 1: mutate source. Joined with first-failure propagation;
        // the parse below is the barrier.
        let mutations: Vec<_> = self
            .plugins
            .iter()
            .filter_map(|desc| desc.source_mutator().map(|hook| (desc, hook)))
            .map(|(desc, hook)| {
                debug!(%id, plugin = desc.name(), "dispatching mutate-source hook");
                let ctx = MutateContext {
                    record,
                    files: &files,
                    host: self.host.as_ref(),
                    options: desc.options(),
                };
                async move {
                    hook.mutate_source(ctx)
                        .await
                        .map_err(|err| TransformError::plugin(id, desc.name(), err))
                }
            })
            .collect();
        try_join_all(mutations).await?;

        // Parse exactly once, after all mutations have settled.
        let tree = RwLock::new(MarkdownTree::parse(&record.source()));

        // Phase 2: annotate the parsed tree.
        let annotations: Vec<_> = self
            .plugins
            .iter()
            .filter_map(|desc| desc.annotator().map(|hook| (desc, hook)))
            .map(|(desc, hook)| {
                debug!(%id, plugin = desc.name(), "dispatching annotate hook");
                let ctx = AnnotateContext {
                    tree: &tree,
                    record,
                    files: &files,
                    host: self.host.as_ref(),
                    options: desc.options(),
                    link_prefix: self.host.link_prefix(),
                };
                async move {
                    hook.annotate(ctx)
                        .await
                        .map_err(|err| TransformError::plugin(id, desc.name(), err))
                }
            })
            .collect();
        try_join_all(annotations).await?;

        let tree = Arc::new(tree.into_inner());
        let headings: Arc<[Heading]> = tree.headings().into();
        record.set_parsed(tree.clone(), headings.clone());
        debug!(%id, headings = headings.len(), "pipeline run complete");

        Ok(Arc::new(ParseResult { tree, headings }))
    }
}
