//! Approximate substring similarity.
//!
//! Scores are normalised Levenshtein similarities scaled to `0..=100`. The
//! partial ratio is the best score of the shorter string against windows of
//! the longer one, rounded to an integer.

use unicode_normalization::UnicodeNormalization;

/// Needles up to this length are also scored against windows that overhang
/// either end of the haystack.
const SHORT_NEEDLE: usize = 64;

/// Strip all whitespace, optionally applying NFKC folding first.
pub fn normalize(text: &str, fold: bool) -> String {
    if fold {
        text.nfkc().filter(|c| !c.is_whitespace()).collect()
    } else {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// Partial ratio of two strings.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let b: Vec<char> = b.chars().collect();
    FuzzyTarget::new(a.chars().collect()).partial_ratio(&b)
}

/// Similarity of two whole strings (0.0..=100.0).
pub fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// A string scored repeatedly against many candidates.
pub struct FuzzyTarget {
    text: String,
    chars: Vec<char>,
}

impl FuzzyTarget {
    pub fn new(chars: Vec<char>) -> Self {
        let text = chars.iter().collect();
        Self { text, chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Partial ratio between the target and `other`.
    pub fn partial_ratio(&self, other: &[char]) -> u8 {
        if self.chars.len() <= other.len() {
            best_window_ratio(&self.text, self.chars.len(), other)
        } else {
            let needle: String = other.iter().collect();
            best_window_ratio(&needle, other.len(), &self.chars)
        }
    }
}

/// Best ratio of `needle` (`m` chars) against windows of `haystack`.
fn best_window_ratio(needle: &str, m: usize, haystack: &[char]) -> u8 {
    if m == 0 {
        return if haystack.is_empty() { 100 } else { 0 };
    }

    let mut best = 0.0f64;
    let mut buf = String::new();
    let mut score = |window: &[char]| {
        buf.clear();
        buf.extend(window);
        let r = ratio(needle, &buf);
        if r > best {
            best = r;
        }
        best >= 100.0
    };

    let n = haystack.len();
    for start in 0..=(n - m) {
        if score(&haystack[start..start + m]) {
            return 100;
        }
    }

    if m <= SHORT_NEEDLE {
        for end in 1..m.min(n) {
            if score(&haystack[..end]) {
                return 100;
            }
        }
        for start in (n - m + 1)..n {
            if score(&haystack[start..]) {
                return 100;
            }
        }
    }

    best.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(normalize(" a b\tc\n d ", false), "abcd");
        assert_eq!(normalize("ﬁne\u{3000}print", true), "fineprint");
        assert_eq!(normalize("ﬁne", false), "ﬁne");
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("abc", "abc"), 100.0);
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("abcd", "abce"), 75.0);
        assert_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_partial_ratio_substring_is_perfect() {
        assert_eq!(partial_ratio("world", "helloworldfoo"), 100);
        assert_eq!(partial_ratio("helloworldfoo", "world"), 100);
    }

    #[test]
    fn test_partial_ratio_unrelated_is_low() {
        assert!(partial_ratio("Abstract", "zzzzzzzzzzzzzzzz") < 20);
        assert_eq!(partial_ratio("", "abc"), 0);
        assert_eq!(partial_ratio("", ""), 100);
    }

    #[test]
    fn test_partial_ratio_tolerates_typo() {
        let score = partial_ratio("Introductionofmethods", "1.Intr0ductionofmethods:");
        assert_eq!(score, 95);
    }

    #[test]
    fn test_partial_ratio_overhanging_edge() {
        // needle runs past the end of the haystack by one char
        assert_eq!(partial_ratio("abcdefghij", "xxxxabcdefghi"), 90);
    }

    #[test]
    fn test_partial_ratio_counts_chars_not_bytes() {
        assert_eq!(partial_ratio("数据结构", "第一章数据结构与算法"), 100);
        assert_eq!(partial_ratio("数据结构", "数据结枃"), 75);
    }

    #[test]
    fn test_target_reuse_matches_free_function() {
        let target = FuzzyTarget::new("Thequickbrownfox".chars().collect());
        let other: Vec<char> = "quickbrown".chars().collect();
        assert_eq!(target.partial_ratio(&other), partial_ratio("Thequickbrownfox", "quickbrown"));
        assert_eq!(target.len(), 16);
    }
}
