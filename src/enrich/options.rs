//! Enrichment options and configuration.

/// Options controlling span indexing and fuzzy block matching.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichOptions {
    /// Length of the normalised index key, in characters
    pub key_len: usize,

    /// Number of consecutive spans joined when deriving an index key
    pub index_window: usize,

    /// Targets at least this long use the index; shorter ones scan every offset
    pub long_target_len: usize,

    /// Maximum number of spans a candidate window may grow to
    pub max_window_spans: usize,

    /// A window stops growing once it exceeds the target by this many chars
    pub overshoot: usize,

    /// A window is accepted only when its score is strictly above this
    pub accept_score: u8,

    /// The short-target scan stops once the best score is strictly above this
    pub early_exit_score: u8,

    /// Apply NFKC folding before whitespace stripping
    pub unicode_fold: bool,
}

impl EnrichOptions {
    /// Create new enrichment options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index key length.
    pub fn with_key_len(mut self, len: usize) -> Self {
        self.key_len = len.max(1);
        self
    }

    /// Set the number of spans joined per index entry.
    pub fn with_index_window(mut self, spans: usize) -> Self {
        self.index_window = spans.max(1);
        self
    }

    /// Set the long-target threshold.
    pub fn with_long_target_len(mut self, len: usize) -> Self {
        self.long_target_len = len;
        self
    }

    /// Set the maximum window growth.
    pub fn with_max_window_spans(mut self, spans: usize) -> Self {
        self.max_window_spans = spans.max(1);
        self
    }

    /// Set the acceptance threshold.
    pub fn with_accept_score(mut self, score: u8) -> Self {
        self.accept_score = score.min(100);
        self
    }

    /// Enable or disable NFKC folding.
    pub fn with_unicode_fold(mut self, fold: bool) -> Self {
        self.unicode_fold = fold;
        self
    }
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            key_len: 7,
            index_window: 5,
            long_target_len: 20,
            max_window_spans: 50,
            overshoot: 10,
            accept_score: 90,
            early_exit_score: 98,
            unicode_fold: false,
        }
    }
}
