//! Markgraph Derivation Engine
//!
//! This crate teaches a content-graph host how to interpret markdown
//! source files: parse markdown into a syntax tree, cache that tree per
//! record, derive HTML, headings, an excerpt, a word count, a table of
//! contents, and an estimated reading time, and expose these as lazily
//! computed field resolvers.
//!
//! # Architecture
//!
//! The standard derivation pipeline:
//!
//! ```text
//! raw source → mutate-source plugins → parse → annotate plugins
//!            → parse cache → html cache → field resolvers
//! ```
//!
//! ## Key properties
//!
//! - **At most one parse in flight per record**: concurrent requests
//!   for the same id await the same pending slot rather than starting
//!   a second computation.
//! - **Deterministic phases**: plugins are dispatched in configured
//!   order; the single parse step is the barrier between the
//!   mutate-source and annotate phases.
//! - **Unified invalidation**: evicting a record drops the parse slot,
//!   the HTML slot, and the record's attached derived fields together,
//!   one epoch per id.
//! - **Retained failures**: a failed run is observed by all current
//!   and future waiters until the record is invalidated.
//!
//! # Example
//!
//! ```rust,ignore
//! use markgraph_core::prelude::*;
//! use std::sync::Arc;
//!
//! let host = Arc::new(InMemoryHost::new());
//! let record = host.insert(ContentRecord::new("posts/hello.md", "# Hello"));
//!
//! let engine = MarkdownEngine::new(host, vec![]);
//! let html = engine.html(&record).await?;
//! let headings = engine.headings(&record, None).await?;
//! ```

#![warn(missing_debug_implementations)]

pub mod cache;
pub mod engine;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod plugin;
pub mod record;
pub mod render;
pub mod slug;
pub mod text;
pub mod tree;

// Re-export main types
pub use cache::{HtmlCache, ParseCache, SlotCache};
pub use engine::{MarkdownEngine, DEFAULT_PRUNE_LENGTH};
pub use error::TransformError;
pub use host::{ContentHost, InMemoryHost};
pub use markgraph_types::{Heading, RecordChange, RecordId};
pub use pipeline::{ParseResult, PipelineRunner};
pub use plugin::{AnnotateContext, Annotator, MutateContext, PluginDescriptor, SourceMutator, Transformer};
pub use record::ContentRecord;
pub use slug::slugify;
pub use tree::MarkdownTree;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::MarkdownEngine;
    pub use crate::error::TransformError;
    pub use crate::host::{ContentHost, InMemoryHost};
    pub use crate::plugin::{
        AnnotateContext, Annotator, MutateContext, PluginDescriptor, SourceMutator, Transformer,
    };
    pub use crate::record::ContentRecord;
    pub use crate::tree::MarkdownTree;
    pub use markgraph_types::{Heading, RecordChange, RecordId};
}
