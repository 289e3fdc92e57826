//! Owned markdown syntax tree with plugin annotations.

use markgraph_types::Heading;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;

/// Parsed markdown content.
///
/// Holds the full event stream in owned form plus a side table of
/// annotations that annotate-phase plugins attach for downstream
/// consumers. One tree is computed per record per cache epoch.
#[derive(Debug)]
pub struct MarkdownTree {
    events: Vec<Event<'static>>,
    annotations: HashMap<String, serde_json::Value>,
}

impl MarkdownTree {
    /// Parse markdown source into an owned event stream.
    pub fn parse(source: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        let events = Parser::new_ext(source, options)
            .map(|event| event.into_static())
            .collect();

        MarkdownTree {
            events,
            annotations: HashMap::new(),
        }
    }

    pub fn events(&self) -> &[Event<'static>] {
        &self.events
    }

    /// Replace the event stream, e.g. after an annotate-phase rewrite.
    pub fn replace_events(&mut self, events: Vec<Event<'static>>) {
        self.events = events;
    }

    /// Attach side information for downstream consumers.
    pub fn annotate(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.annotations.insert(key.into(), value);
    }

    pub fn annotation(&self, key: &str) -> Option<&serde_json::Value> {
        self.annotations.get(key)
    }

    /// Extract headings in document order.
    ///
    /// Each heading's value is its first text run; richer inline content
    /// past that run is ignored.
    pub fn headings(&self) -> Vec<Heading> {
        let mut headings = Vec::new();
        let mut current: Option<(u8, Option<String>)> = None;

        for event in &self.events {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current = Some((*level as u8, None));
                }
                Event::Text(text) => {
                    if let Some((_, value)) = &mut current {
                        if value.is_none() {
                            *value = Some(text.to_string());
                        }
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((depth, value)) = current.take() {
                        headings.push(Heading::new(value.unwrap_or_default(), depth));
                    }
                }
                _ => {}
            }
        }

        headings
    }

    /// Collect prose text leaves in document order, joined with single
    /// spaces. Text inside headings and code blocks is skipped.
    pub fn plain_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut in_heading = false;
        let mut in_code_block = false;

        for event in &self.events {
            match event {
                Event::Start(Tag::Heading { .. }) => in_heading = true,
                Event::End(TagEnd::Heading(_)) => in_heading = false,
                Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                Event::End(TagEnd::CodeBlock) => in_code_block = false,
                Event::Text(text) if !in_heading && !in_code_block => {
                    parts.push(text.as_ref());
                }
                _ => {}
            }
        }

        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_in_document_order() {
        let tree = MarkdownTree::parse("# One\n\n## Two\n\ntext\n\n### Three");
        let headings = tree.headings();

        assert_eq!(
            headings,
            vec![
                Heading::new("One", 1),
                Heading::new("Two", 2),
                Heading::new("Three", 3),
            ]
        );
    }

    #[test]
    fn heading_value_is_first_text_run() {
        let tree = MarkdownTree::parse("# Hello *world* again");
        let headings = tree.headings();

        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].value, "Hello ");
        assert_eq!(headings[0].depth, 1);
    }

    #[test]
    fn plain_text_skips_headings_and_code() {
        let tree = MarkdownTree::parse("# Title\n\nSome body text.\n\n```\ncode here\n```\n\nMore.");
        assert_eq!(tree.plain_text(), "Some body text. More.");
    }

    #[test]
    fn plain_text_of_empty_doc() {
        assert_eq!(MarkdownTree::parse("").plain_text(), "");
    }

    #[test]
    fn annotations_roundtrip() {
        let mut tree = MarkdownTree::parse("hello");
        tree.annotate("outgoing-links", serde_json::json!(["a", "b"]));

        assert_eq!(
            tree.annotation("outgoing-links"),
            Some(&serde_json::json!(["a", "b"]))
        );
        assert!(tree.annotation("missing").is_none());
    }
}
