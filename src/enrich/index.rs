//! Prefix index over the flat span sequence.

use super::fuzzy::normalize;
use super::EnrichOptions;
use crate::model::SizedSpan;
use std::collections::HashMap;

/// Maps a fixed-length, whitespace-free text key to the earliest span offset
/// whose forward window starts with that key.
///
/// Built once per document and never updated. When a key occurs several
/// times the earliest offset wins, so a repeated short phrase can point at an
/// unrelated earlier occurrence; matching downstream re-verifies every hit.
#[derive(Debug, Clone)]
pub struct SpanIndex {
    spans: Vec<SizedSpan>,
    normalized: Vec<String>,
    keys: HashMap<String, usize>,
    options: EnrichOptions,
}

impl SpanIndex {
    /// Build the index with default options.
    pub fn build(spans: Vec<SizedSpan>) -> Self {
        Self::build_with_options(spans, EnrichOptions::default())
    }

    /// Build the index.
    ///
    /// For every offset `i` the normalised text of spans `i..i + index_window`
    /// is computed; if it has at least `key_len` chars, its first `key_len`
    /// chars map to `i` unless that key is already present.
    pub fn build_with_options(spans: Vec<SizedSpan>, options: EnrichOptions) -> Self {
        let normalized: Vec<String> = spans
            .iter()
            .map(|s| normalize(&s.text, options.unicode_fold))
            .collect();

        let mut keys = HashMap::new();
        for i in 0..normalized.len() {
            let end = (i + options.index_window).min(normalized.len());
            let key: String = normalized[i..end]
                .iter()
                .flat_map(|s| s.chars())
                .take(options.key_len)
                .collect();
            if key.chars().count() == options.key_len {
                keys.entry(key).or_insert(i);
            }
        }

        log::debug!(
            "span index: {} spans, {} keys (key length {})",
            spans.len(),
            keys.len(),
            options.key_len
        );

        Self {
            spans,
            normalized,
            keys,
            options,
        }
    }

    /// Offset stored for an exact key.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }

    /// Candidate start offset for a normalised target, keyed by its prefix.
    ///
    /// Returns `None` when the target is shorter than the key length.
    pub fn lookup(&self, normalized_target: &str) -> Option<usize> {
        let key: String = normalized_target.chars().take(self.options.key_len).collect();
        if key.chars().count() < self.options.key_len {
            return None;
        }
        self.get(&key)
    }

    /// Indexed keys and their offsets.
    pub fn keys(&self) -> impl Iterator<Item = (&str, usize)> {
        self.keys.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// The spans, in reading order.
    pub fn spans(&self) -> &[SizedSpan] {
        &self.spans
    }

    /// Whitespace-free text of span `i`.
    pub fn normalized(&self, i: usize) -> &str {
        &self.normalized[i]
    }

    pub fn options(&self) -> &EnrichOptions {
        &self.options
    }

    /// Number of indexed keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of spans.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(texts: &[&str]) -> Vec<SizedSpan> {
        texts.iter().map(|t| SizedSpan::new(*t, 10.0)).collect()
    }

    #[test]
    fn test_keys_start_their_window() {
        let index = SpanIndex::build(spans(&[
            "The quick ",
            "brown fox ",
            "jumps",
            " over",
            " the lazy dog",
            "ab",
        ]));
        assert!(!index.is_empty());
        for (key, i) in index.keys() {
            let end = (i + 5).min(index.span_count());
            let window: String = index.spans()[i..end].iter().map(|s| s.text.as_str()).collect();
            assert!(normalize(&window, false).starts_with(key), "{} -> {}", key, i);
        }
    }

    #[test]
    fn test_first_write_wins() {
        let index = SpanIndex::build(spans(&["repeated", "x", "repeated", "y"]));
        assert_eq!(index.get("repeate"), Some(0));
    }

    #[test]
    fn test_short_windows_not_indexed() {
        let index = SpanIndex::build(spans(&["a", "b", "c"]));
        assert!(index.is_empty());
        assert_eq!(index.lookup("abc"), None);
    }

    #[test]
    fn test_key_spans_whitespace_and_multiple_spans() {
        let index = SpanIndex::build(spans(&["ab ", " cd", "e f", "gh"]));
        assert_eq!(index.get("abcdefg"), Some(0));
        assert_eq!(index.lookup("abcdefghij"), Some(0));
        assert_eq!(index.get("cdefgh"), None);
    }

    #[test]
    fn test_window_is_limited() {
        let opts = EnrichOptions::new().with_index_window(2);
        let index = SpanIndex::build_with_options(spans(&["abc", "def", "ghi"]), opts);
        assert_eq!(index.get("abcdef"), None);
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_empty_spans() {
        let index = SpanIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.span_count(), 0);
    }
}
