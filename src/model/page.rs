//! Page-level types.

use super::{Block, PageSize};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single page of the structural layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page dimensions in points; Letter when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<PageSize>,

    /// Paragraph-level blocks in producer order
    #[serde(default)]
    pub para_blocks: Vec<Block>,

    /// Fields this crate does not interpret (`page_idx`, `images`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    /// Create an empty page with the given dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            page_size: Some(PageSize::new(width, height)),
            para_blocks: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.para_blocks.push(block);
    }

    /// Page size, defaulting to Letter.
    pub fn size(&self) -> PageSize {
        self.page_size.unwrap_or_default()
    }

    /// Blocks in top-to-bottom reading order.
    ///
    /// Sorted by `bbox.y0`; the sort is stable so equal tops keep producer order.
    pub fn blocks_in_reading_order(&self) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = self.para_blocks.iter().collect();
        blocks.sort_by(|a, b| a.top().total_cmp(&b.top()));
        blocks
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.para_blocks.is_empty()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.para_blocks.len()
    }
}
