//! The derivation engine: lazily computed fields over content records.

use crate::cache::{HtmlCache, ParseCache};
use crate::error::TransformError;
use crate::host::ContentHost;
use crate::pipeline::{ParseResult, PipelineRunner};
use crate::plugin::PluginDescriptor;
use crate::record::ContentRecord;
use crate::{render, text};
use markgraph_types::{Heading, RecordChange, RecordId};
use std::sync::Arc;
use tracing::debug;

/// Default excerpt length in characters.
pub const DEFAULT_PRUNE_LENGTH: usize = 140;

/// Field resolvers and cache management for markdown records.
///
/// Each engine owns its caches; independent instances never share
/// state. All field resolvers are pull-based read-only projections
/// that populate the caches on first access.
pub struct MarkdownEngine {
    host: Arc<dyn ContentHost>,
    runner: PipelineRunner,
    parse_cache: ParseCache,
    html_cache: HtmlCache,
}

impl std::fmt::Debug for MarkdownEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownEngine")
            .field("cached_parses", &self.parse_cache.len())
            .field("cached_html", &self.html_cache.len())
            .finish_non_exhaustive()
    }
}

impl MarkdownEngine {
    pub fn new(host: Arc<dyn ContentHost>, plugins: Vec<PluginDescriptor>) -> Self {
        MarkdownEngine {
            runner: PipelineRunner::new(host.clone(), plugins),
            host,
            parse_cache: ParseCache::new(),
            html_cache: HtmlCache::new(),
        }
    }

    pub fn host(&self) -> &Arc<dyn ContentHost> {
        &self.host
    }

    /// Parsed result for `record`, running the plugin pipeline on first
    /// access.
    ///
    /// Concurrent callers for the same id await the same in-flight run
    /// and receive the identical result. A failed run stays cached
    /// until the record is invalidated.
    pub async fn parsed(
        &self,
        record: &Arc<ContentRecord>,
    ) -> Result<Arc<ParseResult>, TransformError> {
        let slot = self.parse_cache.slot(record.id());
        slot.get_or_init(|| self.runner.run(record)).await.clone()
    }

    /// Rendered HTML for `record`, rendered once per epoch.
    pub async fn html(&self, record: &Arc<ContentRecord>) -> Result<Arc<str>, TransformError> {
        let slot = self.html_cache.slot(record.id());
        slot.get_or_init(|| async {
            let parsed = self.parsed(record).await?;
            let html: Arc<str> = render::to_html(&parsed.tree, &parsed.headings).into();
            record.set_html(html.clone());
            debug!(id = %record.id(), bytes = html.len(), "html cache populated");
            Ok(html)
        })
        .await
        .clone()
    }

    /// Raw source text, verbatim. Never cached.
    pub fn source(&self, record: &ContentRecord) -> String {
        record.source()
    }

    /// Plain-text excerpt truncated at a word boundary to at most
    /// `prune_length` characters (default 140).
    pub async fn excerpt(
        &self,
        record: &Arc<ContentRecord>,
        prune_length: Option<usize>,
    ) -> Result<String, TransformError> {
        let parsed = self.parsed(record).await?;
        let prose = parsed.tree.plain_text();
        Ok(text::truncate_words(
            &prose,
            prune_length.unwrap_or(DEFAULT_PRUNE_LENGTH),
        ))
    }

    /// Headings in document order, optionally filtered to exactly
    /// `depth`.
    pub async fn headings(
        &self,
        record: &Arc<ContentRecord>,
        depth: Option<u8>,
    ) -> Result<Vec<Heading>, TransformError> {
        let parsed = self.parsed(record).await?;
        let headings = match depth {
            Some(depth) => parsed
                .headings
                .iter()
                .filter(|h| h.depth == depth)
                .cloned()
                .collect(),
            None => parsed.headings.to_vec(),
        };
        Ok(headings)
    }

    /// Table-of-contents HTML built from the per-epoch headings.
    pub async fn table_of_contents(
        &self,
        record: &Arc<ContentRecord>,
    ) -> Result<String, TransformError> {
        let parsed = self.parsed(record).await?;
        Ok(render::render_toc(&parsed.headings))
    }

    /// Word count of the tag-stripped HTML, locale-aware.
    pub async fn word_count(&self, record: &Arc<ContentRecord>) -> Result<usize, TransformError> {
        let html = self.html(record).await?;
        Ok(text::count_words(&text::strip_tags(&html)))
    }

    /// Estimated reading time in minutes at 265 words per minute,
    /// rounded to nearest and never below 1.
    pub async fn time_to_read(&self, record: &Arc<ContentRecord>) -> Result<u32, TransformError> {
        let words = self.word_count(record).await?;
        Ok(text::time_to_read_minutes(words))
    }

    /// Host notification: the record behind `id` was recreated.
    ///
    /// Evicts the parse slot, the HTML slot, and the record's attached
    /// derived fields together, so the next access recomputes from the
    /// current source. Both caches share one epoch per id.
    pub fn on_record_recreated(&self, id: &RecordId) {
        let evicted = self.parse_cache.invalidate(id);
        self.html_cache.invalidate(id);
        if let Some(record) = self.host.lookup(id) {
            record.clear_derived();
        }
        debug!(%id, evicted, "record recreated, derived caches evicted");
    }

    /// Dispatch a host change event to the matching eviction.
    pub fn on_record_change(&self, change: &RecordChange) {
        match change {
            RecordChange::Recreated { id } => self.on_record_recreated(id),
            RecordChange::Deleted { id } => {
                self.parse_cache.invalidate(id);
                self.html_cache.invalidate(id);
                debug!(%id, "record deleted, derived caches evicted");
            }
        }
    }

    /// Number of records with a cached (pending or completed) parse
    pub fn cached_parses(&self) -> usize {
        self.parse_cache.len()
    }
}
