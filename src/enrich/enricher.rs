//! Font-size enrichment of structural blocks.

use super::fuzzy::{normalize, FuzzyTarget};
use super::SpanIndex;
use crate::model::{Block, LayoutDocument};
use serde::{Deserialize, Serialize};

/// The span window selected for a block.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanMatch {
    /// First span of the window
    pub start: usize,
    /// Last span of the window (inclusive)
    pub end: usize,
    /// Partial-ratio score of the window against the block text
    pub score: u8,
    /// Mean of the nonzero span sizes, rounded to 2 decimals
    pub avg_size: f64,
    /// Length of the window's whitespace-free text, in chars
    pub matched_len: usize,
}

/// Result of matching one block.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// A window scored above the acceptance threshold
    Matched(SpanMatch),
    /// The block has no text once whitespace is removed
    EmptyTarget,
    /// A long target whose key prefix is not in the index
    IndexMiss,
    /// No window scored above the acceptance threshold
    NoMatch,
}

impl MatchOutcome {
    pub fn avg_size(&self) -> Option<f64> {
        match self {
            MatchOutcome::Matched(m) => Some(m.avg_size),
            _ => None,
        }
    }
}

/// Counters for an enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichStats {
    /// Text and title blocks examined
    pub blocks_considered: u32,
    /// Blocks that received an `avg_size`
    pub enriched: u32,
    /// Blocks whose best window stayed at or below the threshold
    pub unmatched: u32,
    /// Long blocks whose key was not indexed
    pub index_misses: u32,
    /// Blocks without text
    pub empty: u32,
}

impl EnrichStats {
    fn record(&mut self, outcome: &MatchOutcome) {
        self.blocks_considered += 1;
        match outcome {
            MatchOutcome::Matched(_) => self.enriched += 1,
            MatchOutcome::EmptyTarget => self.empty += 1,
            MatchOutcome::IndexMiss => self.index_misses += 1,
            MatchOutcome::NoMatch => self.unmatched += 1,
        }
    }
}

/// Attaches average font sizes to text and title blocks by locating their
/// text in the flat span sequence.
pub struct FontSizeEnricher<'a> {
    index: &'a SpanIndex,
}

impl<'a> FontSizeEnricher<'a> {
    /// Create an enricher over a built index; matching uses the index's options.
    pub fn new(index: &'a SpanIndex) -> Self {
        Self { index }
    }

    /// Enrich every text/title block of every page in place.
    ///
    /// Blocks are visited in producer order, which is assumed to follow the
    /// span dump's forward reading order.
    pub fn enrich_document(&self, doc: &mut LayoutDocument) -> EnrichStats {
        let mut stats = EnrichStats::default();
        for (page_idx, page) in doc.pdf_info.iter_mut().enumerate() {
            for block in page.para_blocks.iter_mut() {
                if !block.declared_kind().is_textual() {
                    continue;
                }
                let outcome = self.enrich_block(block);
                log::debug!(
                    "page {} block {}: {:?}",
                    page_idx + 1,
                    block.index_label(),
                    outcome
                );
                stats.record(&outcome);
            }
        }
        stats
    }

    /// Match one block and set its `avg_size` on success.
    ///
    /// An existing `avg_size` is ignored for matching and left untouched when
    /// no window is accepted.
    pub fn enrich_block(&self, block: &mut Block) -> MatchOutcome {
        let outcome = self.find_match(&block.raw_content());
        if let MatchOutcome::Matched(m) = &outcome {
            block.avg_size = Some(m.avg_size);
        }
        outcome
    }

    /// Locate the best span window for a block's text.
    pub fn find_match(&self, text: &str) -> MatchOutcome {
        let options = self.index.options();
        let normalized = normalize(text, options.unicode_fold);
        if normalized.is_empty() {
            return MatchOutcome::EmptyTarget;
        }
        let target = FuzzyTarget::new(normalized.chars().collect());
        let mut best: Option<SpanMatch> = None;

        if target.len() >= options.long_target_len {
            let Some(start) = self.index.lookup(&normalized) else {
                return MatchOutcome::IndexMiss;
            };
            self.scan_from(start, &target, &mut best);
        } else {
            for start in 0..self.index.span_count() {
                self.scan_from(start, &target, &mut best);
                if best
                    .as_ref()
                    .is_some_and(|b| b.score > options.early_exit_score)
                {
                    break;
                }
            }
        }

        match best {
            Some(m) => MatchOutcome::Matched(m),
            None => MatchOutcome::NoMatch,
        }
    }

    /// Grow a window forward from `start`, keeping the longest accepted one.
    ///
    /// Windows longer than the target plus the overshoot slack are not scored.
    fn scan_from(&self, start: usize, target: &FuzzyTarget, best: &mut Option<SpanMatch>) {
        let options = self.index.options();
        let spans = self.index.spans();
        let stop = (start + options.max_window_spans).min(spans.len());
        let mut window: Vec<char> = Vec::new();

        for end in start..stop {
            window.extend(self.index.normalized(end).chars());
            if window.len() > target.len() + options.overshoot {
                break;
            }
            let score = target.partial_ratio(&window);
            let longer = best.as_ref().map_or(true, |b| window.len() > b.matched_len);

            if score > options.accept_score && longer {
                if let Some(avg_size) = mean_nonzero_size(&spans[start..=end]) {
                    *best = Some(SpanMatch {
                        start,
                        end,
                        score,
                        avg_size,
                        matched_len: window.len(),
                    });
                }
            }
        }
    }
}

fn mean_nonzero_size(spans: &[crate::model::SizedSpan]) -> Option<f64> {
    let sizes: Vec<f64> = spans.iter().map(|s| s.size).filter(|&s| s > 0.0).collect();
    if sizes.is_empty() {
        return None;
    }
    let mean = sizes.iter().sum::<f64>() / sizes.len() as f64;
    Some(round2(mean))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::EnrichOptions;
    use crate::model::{BBox, Line, Page, SizedSpan, Span};

    fn text_block(kind: &str, content: &str) -> Block {
        Block::new(kind, BBox::new(0.0, 0.0, 100.0, 20.0))
            .with_line(Line::new(vec![Span::text(content)]))
    }

    fn index(spans: &[(&str, f64)]) -> SpanIndex {
        SpanIndex::build(spans.iter().map(|(t, s)| SizedSpan::new(*t, *s)).collect())
    }

    #[test]
    fn test_long_block_uses_index_and_averages_sizes() {
        let idx = index(&[
            ("Header line", 14.0),
            ("The results show that ", 10.0),
            ("our method ", 10.0),
            ("outperforms.", 11.0),
            ("Footer text of the page", 8.0),
        ]);
        let enricher = FontSizeEnricher::new(&idx);
        let mut block = text_block("text", "The results show that our method outperforms.");

        let outcome = enricher.enrich_block(&mut block);
        let MatchOutcome::Matched(m) = outcome else {
            panic!("expected a match");
        };
        assert_eq!((m.start, m.end), (1, 3));
        assert_eq!(m.avg_size, 10.33);
        assert_eq!(block.avg_size, Some(10.33));
    }

    #[test]
    fn test_long_block_without_index_hit_is_left_alone() {
        let idx = index(&[("Completely different text here", 10.0)]);
        let enricher = FontSizeEnricher::new(&idx);
        let mut block = text_block("text", "Nothing in this paragraph is in the dump");
        assert_eq!(enricher.enrich_block(&mut block), MatchOutcome::IndexMiss);
        assert_eq!(block.avg_size, None);
    }

    #[test]
    fn test_short_block_full_scan() {
        let idx = index(&[
            ("Some body text", 10.0),
            ("Abstract", 16.0),
            ("Introduction to the method", 10.0),
        ]);
        let enricher = FontSizeEnricher::new(&idx);
        let mut block = text_block("title", "Abstract");
        assert_eq!(enricher.enrich_block(&mut block).avg_size(), Some(16.0));
    }

    #[test]
    fn test_zero_sizes_ignored_in_mean() {
        let idx = index(&[("Intro", 0.0), ("duction", 12.0)]);
        let enricher = FontSizeEnricher::new(&idx);
        assert_eq!(enricher.find_match("Introduction").avg_size(), Some(12.0));
    }

    #[test]
    fn test_all_zero_sizes_never_accepted() {
        let idx = index(&[("Abstract", 0.0)]);
        let enricher = FontSizeEnricher::new(&idx);
        assert_eq!(enricher.find_match("Abstract"), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_empty_target_and_empty_spans() {
        let idx = index(&[]);
        let enricher = FontSizeEnricher::new(&idx);
        assert_eq!(enricher.find_match("  \n "), MatchOutcome::EmptyTarget);
        assert_eq!(enricher.find_match("Abstract"), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_below_threshold_not_enriched() {
        let idx = index(&[("Abstrxyz", 12.0)]);
        let enricher = FontSizeEnricher::new(&idx);
        let mut block = text_block("title", "Abstract");
        assert_eq!(enricher.enrich_block(&mut block), MatchOutcome::NoMatch);
        assert!(block.avg_size.is_none());
    }

    #[test]
    fn test_longer_accepted_window_wins() {
        // "Results" alone already scores 100; the longer window also clears the bar.
        let idx = index(&[
            ("Results", 12.0),
            ("and", 10.0),
            ("in the following section we show", 10.0),
        ]);
        let enricher = FontSizeEnricher::new(&idx);
        let MatchOutcome::Matched(m) = enricher.find_match("Resultsand") else {
            panic!("expected a match");
        };
        assert_eq!((m.start, m.end), (0, 1));
        assert_eq!(m.avg_size, 11.0);
    }

    #[test]
    fn test_document_skips_non_text_blocks_and_is_idempotent() {
        let idx = index(&[("Abstract", 16.0), ("Body text of the paper follows.", 10.0)]);
        let enricher = FontSizeEnricher::new(&idx);

        let mut doc = LayoutDocument::new();
        let mut page = Page::letter();
        page.add_block(text_block("title", "Abstract"));
        page.add_block(text_block("image", "Abstract"));
        page.add_block(text_block("text", "Body text of the paper follows."));
        doc.add_page(page);

        let stats = enricher.enrich_document(&mut doc);
        assert_eq!(stats.blocks_considered, 2);
        assert_eq!(stats.enriched, 2);
        let first: Vec<Option<f64>> = doc.pdf_info[0].para_blocks.iter().map(|b| b.avg_size).collect();
        assert_eq!(first, vec![Some(16.0), None, Some(10.0)]);

        enricher.enrich_document(&mut doc);
        let second: Vec<Option<f64>> = doc.pdf_info[0].para_blocks.iter().map(|b| b.avg_size).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_threshold() {
        let spans = vec![SizedSpan::new("Abstrxct", 12.0)];
        let idx = SpanIndex::build_with_options(spans, EnrichOptions::new().with_accept_score(80));
        let enricher = FontSizeEnricher::new(&idx);
        assert_eq!(enricher.find_match("Abstract").avg_size(), Some(12.0));
    }

    #[test]
    fn test_window_at_overshoot_limit_is_scored() {
        // 8 target chars + 10 trailing chars sits exactly on the slack
        let idx = index(&[("Abstract", 16.0), ("0123456789", 10.0)]);
        let enricher = FontSizeEnricher::new(&idx);
        let MatchOutcome::Matched(m) = enricher.find_match("Abstract") else {
            panic!("expected a match");
        };
        assert_eq!((m.start, m.end), (0, 1));
        assert_eq!(m.matched_len, 18);
        assert_eq!(m.avg_size, 13.0);
    }

    #[test]
    fn test_window_past_overshoot_is_never_scored() {
        // The grown window still contains the whole target and would score
        // 100, so it must be cut off by length before scoring.
        let idx = index(&[("Abstract", 16.0), ("0123456789X", 10.0)]);
        let enricher = FontSizeEnricher::new(&idx);
        let MatchOutcome::Matched(m) = enricher.find_match("Abstract") else {
            panic!("expected a match");
        };
        assert_eq!((m.start, m.end), (0, 0));
        assert_eq!(m.matched_len, 8);
        assert_eq!(m.avg_size, 16.0);
    }

    #[test]
    fn test_long_target_overshoot_excludes_trailing_span() {
        let idx = index(&[
            ("The results show that our method outperforms.", 10.0),
            ("Page 12", 7.0),
            ("Section 2", 30.0),
        ]);
        let enricher = FontSizeEnricher::new(&idx);
        let MatchOutcome::Matched(m) = enricher.find_match("The results show that our method outperforms.")
        else {
            panic!("expected a match");
        };
        // "Page12" fits the slack; the following span would exceed it.
        assert_eq!((m.start, m.end), (0, 1));
        assert_eq!(m.avg_size, 8.5);
    }
}
