//! Font-size enrichment.
//!
//! The structural layout tree does not carry font sizes. The low-level text
//! extractor does, but segments the text differently. Enrichment locates each
//! text/title block's content in the flat span sequence with an indexed fuzzy
//! search and stores the mean span size as the block's `avg_size`.
//!
//! # Example
//!
//! ```no_run
//! use pdf2word::enrich::{FontSizeEnricher, SpanIndex};
//! use pdf2word::model::{LayoutDocument, SpanDump};
//!
//! fn main() -> pdf2word::Result<()> {
//!     let mut layout = LayoutDocument::from_path("layout.json")?;
//!     let spans = SpanDump::from_path("analysis.json")?.into_spans();
//!
//!     let index = SpanIndex::build(spans);
//!     let stats = FontSizeEnricher::new(&index).enrich_document(&mut layout);
//!     println!("{} blocks enriched", stats.enriched);
//!
//!     layout.write_to("layout_enriched.json")?;
//!     Ok(())
//! }
//! ```

mod enricher;
pub mod fuzzy;
mod index;
mod options;

pub use enricher::{EnrichStats, FontSizeEnricher, MatchOutcome, SpanMatch};
pub use index::SpanIndex;
pub use options::EnrichOptions;

use crate::error::{Error, Result};
use crate::model::{LayoutDocument, SpanDump};
use std::path::Path;

/// Enrich a layout in memory against a flat span dump.
pub fn enrich_layout(
    layout: &mut LayoutDocument,
    dump: SpanDump,
    options: &EnrichOptions,
) -> EnrichStats {
    let spans = dump.into_spans();
    log::info!("Building span index over {} spans", spans.len());
    let index = SpanIndex::build_with_options(spans, options.clone());
    log::info!("Index built with {} keys; matching blocks", index.len());

    let stats = FontSizeEnricher::new(&index).enrich_document(layout);
    log::info!(
        "Enrichment complete: {} of {} blocks enriched ({} unmatched, {} index misses, {} empty)",
        stats.enriched,
        stats.blocks_considered,
        stats.unmatched,
        stats.index_misses,
        stats.empty
    );
    stats
}

/// Read a layout and a span dump, enrich, and write the enriched layout.
///
/// Both inputs are checked before any processing starts; a missing one is
/// [`Error::InputMissing`].
pub fn enrich_file<P, Q, R>(
    layout_path: P,
    spans_path: Q,
    output_path: R,
    options: &EnrichOptions,
) -> Result<EnrichStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let layout_path = layout_path.as_ref();
    let spans_path = spans_path.as_ref();
    for input in [layout_path, spans_path] {
        if !input.is_file() {
            return Err(Error::InputMissing(input.to_path_buf()));
        }
    }

    log::info!("Loading layout file {}", layout_path.display());
    let mut layout = LayoutDocument::from_path(layout_path)?;
    log::info!("Loading span dump {}", spans_path.display());
    let dump = SpanDump::from_path(spans_path)?;

    let stats = enrich_layout(&mut layout, dump, options);

    let output_path = output_path.as_ref();
    log::info!("Saving enriched layout to {}", output_path.display());
    layout.write_to(output_path)?;
    Ok(stats)
}
