//! Layout inspection.

use crate::model::{BlockKind, LayoutDocument};
use crate::resolve::resolve;
use crate::tree::{find_image_span, find_table_image_span};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Summary of a layout file, as printed by `pdf2word info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub pages: usize,
    pub blocks: usize,
    /// Block count per resolved kind
    pub kinds: BTreeMap<String, usize>,
    /// Untyped blocks whose kind was inferred from their children
    pub inferred: usize,
    /// Blocks replay will skip for lack of a kind
    pub unresolved: usize,
    /// Text and title blocks carrying `avg_size`
    pub enriched: usize,
    /// Text and title blocks in total
    pub textual: usize,
    /// Image and table-image references
    pub image_refs: usize,
    /// Referenced files absent from the image directory
    pub missing_images: Vec<String>,
}

impl LayoutSummary {
    /// Share of text and title blocks that carry a font size, 0.0 to 1.0.
    pub fn enrichment_ratio(&self) -> f64 {
        if self.textual == 0 {
            return 0.0;
        }
        self.enriched as f64 / self.textual as f64
    }

    /// Pretty-printed JSON form of the summary.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Summarise a layout. When `image_dir` is given, image references are
/// checked against it.
pub fn inspect(doc: &LayoutDocument, image_dir: Option<&Path>) -> LayoutSummary {
    let mut summary = LayoutSummary {
        pages: doc.page_count(),
        ..Default::default()
    };

    for block in doc.pdf_info.iter().flat_map(|p| p.para_blocks.iter()) {
        summary.blocks += 1;
        let kind = resolve(block);
        *summary.kinds.entry(kind.to_string()).or_insert(0) += 1;

        if block.declared_type().is_none() && kind != BlockKind::Unknown {
            summary.inferred += 1;
        }
        if kind == BlockKind::Unknown {
            summary.unresolved += 1;
        }
        if kind.is_textual() {
            summary.textual += 1;
            if block.avg_size.is_some() {
                summary.enriched += 1;
            }
        }

        let reference = match kind {
            BlockKind::Image => find_image_span(block),
            BlockKind::Table => find_table_image_span(block),
            _ => None,
        }
        .and_then(|span| span.image_path.as_deref());

        if let Some(name) = reference {
            summary.image_refs += 1;
            if let Some(dir) = image_dir {
                if !dir.join(name).is_file() {
                    summary.missing_images.push(name.to_string());
                }
            }
        }
    }
    summary
}
