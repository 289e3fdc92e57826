//! Slug generation for heading anchors.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static COLLAPSE_HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Replace whitespace with hyphens
/// - Remove special characters (except hyphens)
/// - Collapse multiple hyphens
/// - Trim leading/trailing hyphens
///
/// # Examples
///
/// ```
/// use markgraph_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();

    let with_hyphens = lowercased
        .graphemes(true)
        .map(|g| match g {
            " " | "_" | "\t" | "\n" => "-",
            _ => g,
        })
        .collect::<String>();

    let cleaned = with_hyphens
        .graphemes(true)
        .filter_map(|g| {
            let c = g.chars().next()?;
            if c.is_ascii_alphanumeric() || c == '-' || c.is_alphabetic() {
                Some(g)
            } else {
                None
            }
        })
        .collect::<String>();

    let collapsed = COLLAPSE_HYPHENS.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}
