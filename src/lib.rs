//! # pdf2word
//!
//! Layout reconstruction for PDF to Word conversion.
//!
//! An external parser turns a PDF into a structural layout tree (blocks,
//! lines, spans and rendered images) and a separate extractor dumps the raw
//! text spans with their font sizes. This library reconciles the two and
//! replays the result as an editable document whose elements sit where they
//! were on the page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf2word::Pdf2Word;
//!
//! fn main() -> pdf2word::Result<()> {
//!     let summary = Pdf2Word::new().convert(
//!         "output/layout.json",
//!         "output/analysis.json",
//!         "output/layout_enriched.json",
//!         "output/document.docx",
//!     )?;
//!     println!(
//!         "{} blocks enriched, {} elements placed",
//!         summary.enrich.enriched, summary.replay.inserted
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Enrichment** ([`enrich`]): an index over the span dump and a fuzzy
//!   partial-ratio search attach an `avg_size` to each text and title block.
//! - **Replay** ([`replay`]): pages become sections with their own size and
//!   zero margins; blocks become page-anchored text boxes and pictures, with
//!   ordered fallbacks when an insertion fails.
//! - **Output** ([`docx`]): a WordprocessingML package written with `zip`.

pub mod docx;
pub mod enrich;
pub mod error;
pub mod geometry;
pub mod inspect;
pub mod model;
pub mod replay;
pub mod resolve;
pub mod tree;

// Re-export commonly used types
pub use docx::DocxCanvas;
pub use enrich::{enrich_file, enrich_layout, EnrichOptions, EnrichStats, FontSizeEnricher, SpanIndex};
pub use error::{Error, Result};
pub use geometry::{CoordinateMapper, CoordinateMode, PageGeometry};
pub use inspect::{inspect, LayoutSummary};
pub use model::{BBox, Block, BlockKind, LayoutDocument, Page, PageSize, SizedSpan, Span, SpanDump};
pub use replay::{
    replay_file, Canvas, FontSizeFallback, InsertOutcome, LayoutReplayer, LineSpacing,
    ReplayOptions, ReplayReport,
};
pub use resolve::resolve;

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Results of a full enrich-then-replay run.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertSummary {
    pub enrich: EnrichStats,
    pub replay: ReplayReport,
}

/// Enrich a layout, persist the enriched JSON, then replay it into a DOCX file.
///
/// Both inputs are checked before anything is written. Unless the replay
/// options name an image directory, images are resolved from `images/` next
/// to the original layout file.
///
/// # Example
///
/// ```no_run
/// use pdf2word::{convert_files, EnrichOptions, ReplayOptions};
///
/// let summary = convert_files(
///     "output/layout.json",
///     "output/analysis.json",
///     "output/layout_enriched.json",
///     "output/document.docx",
///     &EnrichOptions::default(),
///     &ReplayOptions::default(),
/// )?;
/// println!("{} pages", summary.replay.pages);
/// # Ok::<(), pdf2word::Error>(())
/// ```
pub fn convert_files<P, Q, R, S>(
    layout_path: P,
    spans_path: Q,
    enriched_path: R,
    output_path: S,
    enrich_options: &EnrichOptions,
    replay_options: &ReplayOptions,
) -> Result<ConvertSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
    S: AsRef<Path>,
{
    let layout_path = layout_path.as_ref();
    let enriched_path = enriched_path.as_ref();

    let enrich = enrich_file(layout_path, spans_path, enriched_path, enrich_options)?;

    let mut replay_options = replay_options.clone();
    if replay_options.image_dir.is_none() {
        replay_options.image_dir = Some(sibling_images_dir(layout_path));
    }
    let replay = replay_file(enriched_path, output_path, &replay_options)?;

    Ok(ConvertSummary { enrich, replay })
}

fn sibling_images_dir(layout_path: &Path) -> PathBuf {
    layout_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("images")
}

/// Builder for enrichment and replay runs.
///
/// # Example
///
/// ```no_run
/// use pdf2word::{CoordinateMode, FontSizeFallback, Pdf2Word};
///
/// let report = Pdf2Word::new()
///     .with_coordinate_mode(CoordinateMode::AsIs)
///     .with_font_fallback(FontSizeFallback::Estimated)
///     .with_image_dir("./output/images")
///     .replay("output/layout_enriched.json", "output/document.docx")?;
/// println!("{} blocks skipped", report.skipped);
/// # Ok::<(), pdf2word::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdf2Word {
    enrich_options: EnrichOptions,
    replay_options: ReplayOptions,
}

impl Pdf2Word {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the enrichment options.
    pub fn with_enrich_options(mut self, options: EnrichOptions) -> Self {
        self.enrich_options = options;
        self
    }

    /// Replace the replay options.
    pub fn with_replay_options(mut self, options: ReplayOptions) -> Self {
        self.replay_options = options;
        self
    }

    /// Set the acceptance score for fuzzy matches.
    pub fn with_accept_score(mut self, score: u8) -> Self {
        self.enrich_options = self.enrich_options.with_accept_score(score);
        self
    }

    /// Enable NFKC folding during matching.
    pub fn with_unicode_fold(mut self, fold: bool) -> Self {
        self.enrich_options = self.enrich_options.with_unicode_fold(fold);
        self
    }

    /// Set how block boxes map onto pages.
    pub fn with_coordinate_mode(mut self, mode: CoordinateMode) -> Self {
        self.replay_options = self.replay_options.with_coordinate_mode(mode);
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.replay_options = self.replay_options.with_image_dir(dir);
        self
    }

    /// Set the font size fallback.
    pub fn with_font_fallback(mut self, fallback: FontSizeFallback) -> Self {
        self.replay_options = self.replay_options.with_font_fallback(fallback);
        self
    }

    /// Set text box line spacing.
    pub fn with_line_spacing(mut self, spacing: LineSpacing) -> Self {
        self.replay_options = self.replay_options.with_line_spacing(spacing);
        self
    }

    pub fn enrich_options(&self) -> &EnrichOptions {
        &self.enrich_options
    }

    pub fn replay_options(&self) -> &ReplayOptions {
        &self.replay_options
    }

    /// Enrich a layout file and write the result.
    pub fn enrich<P, Q, R>(&self, layout: P, spans: Q, output: R) -> Result<EnrichStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        enrich_file(layout, spans, output, &self.enrich_options)
    }

    /// Replay a layout file into a DOCX document.
    pub fn replay<P: AsRef<Path>, Q: AsRef<Path>>(&self, layout: P, output: Q) -> Result<ReplayReport> {
        replay_file(layout, output, &self.replay_options)
    }

    /// Enrich, persist and replay in one run.
    pub fn convert<P, Q, R, S>(&self, layout: P, spans: Q, enriched: R, output: S) -> Result<ConvertSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
        S: AsRef<Path>,
    {
        convert_files(
            layout,
            spans,
            enriched,
            output,
            &self.enrich_options,
            &self.replay_options,
        )
    }
}
