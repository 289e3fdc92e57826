//! Plain-text heuristics: truncation, tag stripping, word counts.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Assumed reading speed for [`time_to_read_minutes`].
pub const AVERAGE_WORDS_PER_MINUTE: f64 = 265.0;

/// Appended when [`truncate_words`] cuts text.
pub const TRUNCATION_INDICATOR: char = '…';

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Truncate `text` to at most `limit` characters without splitting a
/// word. When text is cut, the truncation indicator is appended and
/// counted within the limit.
pub fn truncate_words(text: &str, limit: usize) -> String {
    if limit == 0 {
        return String::new();
    }
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut kept = String::new();
    let mut kept_chars = 0;
    for segment in text.split_word_bounds() {
        let segment_chars = segment.chars().count();
        // Reserve one character for the indicator.
        if kept_chars + segment_chars + 1 > limit {
            break;
        }
        kept.push_str(segment);
        kept_chars += segment_chars;
    }

    let mut out = kept.trim_end().to_string();
    out.push(TRUNCATION_INDICATOR);
    out
}

/// Remove all markup tags, leaving no tags through. Tags are replaced
/// with spaces so adjacent words stay separated.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, " ").into_owned()
}

/// Locale-aware word count.
pub fn count_words(text: &str) -> usize {
    text.unicode_words().count()
}

/// Estimated reading time in whole minutes, rounded to nearest and
/// floored at 1 even for empty input.
pub fn time_to_read_minutes(words: usize) -> u32 {
    let minutes = (words as f64 / AVERAGE_WORDS_PER_MINUTE).round() as u32;
    minutes.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_words("Some body text.", 140), "Some body text.");
    }

    #[test]
    fn truncation_respects_word_boundaries() {
        let out = truncate_words("Some body text.", 9);
        assert_eq!(out, "Some…");
        assert!(out.chars().count() <= 9);
    }

    #[test]
    fn truncation_never_exceeds_limit() {
        let text = "a few words and then some more words after that";
        for limit in 1..text.len() + 5 {
            let out = truncate_words(text, limit);
            assert!(out.chars().count() <= limit, "limit {limit} gave {out:?}");
        }
    }

    #[test]
    fn zero_limit_yields_empty() {
        assert_eq!(truncate_words("anything", 0), "");
    }

    #[test]
    fn strip_tags_removes_all_markup() {
        let stripped = strip_tags("<h1 id=\"t\">Title</h1><p>one <em>two</em></p>");
        assert!(!stripped.contains('<'));
        assert_eq!(count_words(&stripped), 3);
    }

    #[test]
    fn word_count_is_locale_aware() {
        assert_eq!(count_words("can't stop, won't stop"), 4);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn reading_time_floors_at_one() {
        assert_eq!(time_to_read_minutes(0), 1);
        assert_eq!(time_to_read_minutes(100), 1);
        assert_eq!(time_to_read_minutes(400), 2);
        assert_eq!(time_to_read_minutes(265 * 10), 10);
    }
}
