//! Syntax tree to HTML conversion.

use crate::slug::slugify;
use crate::tree::MarkdownTree;
use markgraph_types::Heading;
use pulldown_cmark::{html, CowStr, Event, Tag};

/// Serialize the tree's event stream to an HTML string.
///
/// Headings without explicit ids get slugified anchors matching the
/// table of contents. Raw HTML embedded in the source passes through
/// verbatim, not escaped.
pub fn to_html(tree: &MarkdownTree, headings: &[Heading]) -> String {
    let mut slugs = headings.iter().map(|h| slugify(&h.value));

    let events = tree.events().iter().cloned().map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) => {
            let slug = slugs.next();
            let id = id.or_else(|| slug.map(|s| CowStr::Boxed(s.into_boxed_str())));
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            })
        }
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

/// Render a flat table of contents from the per-epoch headings.
///
/// Anchors match the ids injected by [`to_html`]. Empty input renders
/// to an empty string.
pub fn render_toc(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }

    let mut out = String::from(r#"<nav class="toc"><ul>"#);
    for heading in headings {
        out.push_str(&format!(
            r##"<li class="toc-depth-{}"><a href="#{}">{}</a></li>"##,
            heading.depth,
            slugify(&heading.value),
            html_escape(&heading.value)
        ));
    }
    out.push_str("</ul></nav>");
    out
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
