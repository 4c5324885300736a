//! Per-block insertion outcomes and the run report.

use super::ElementKind;
use crate::model::BlockKind;
use serde::{Deserialize, Serialize};

/// What happened to one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsertOutcome {
    /// The preferred element was inserted
    Inserted { element: ElementKind },
    /// A fallback element was inserted
    Degraded { element: ElementKind, reason: String },
    /// Nothing was inserted
    Skipped { reason: String },
}

impl InsertOutcome {
    pub fn element(&self) -> Option<ElementKind> {
        match self {
            InsertOutcome::Inserted { element } | InsertOutcome::Degraded { element, .. } => {
                Some(*element)
            }
            InsertOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted { .. })
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, InsertOutcome::Degraded { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, InsertOutcome::Skipped { .. })
    }
}

/// Outcome of one block, with its position in the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockOutcome {
    /// Zero-based page index
    pub page: usize,
    /// Position in the page's reading order
    pub ordinal: usize,
    /// Resolved block kind
    pub kind: String,
    pub outcome: InsertOutcome,
}

/// Summary of a replay run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub pages: usize,
    pub inserted: usize,
    pub degraded: usize,
    pub skipped: usize,
    /// Pages whose geometry could not be applied
    pub geometry_failures: usize,
    pub blocks: Vec<BlockOutcome>,
}

impl ReplayReport {
    pub(crate) fn record(&mut self, page: usize, ordinal: usize, kind: BlockKind, outcome: InsertOutcome) {
        match &outcome {
            InsertOutcome::Inserted { .. } => self.inserted += 1,
            InsertOutcome::Degraded { .. } => self.degraded += 1,
            InsertOutcome::Skipped { .. } => self.skipped += 1,
        }
        self.blocks.push(BlockOutcome {
            page,
            ordinal,
            kind: kind.as_str().to_string(),
            outcome,
        });
    }

    /// Total number of blocks seen.
    pub fn total(&self) -> usize {
        self.blocks.len()
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Outcomes of the blocks on one page, in reading order.
    pub fn page_outcomes(&self, page: usize) -> impl Iterator<Item = &BlockOutcome> {
        self.blocks.iter().filter(move |b| b.page == page)
    }
}
