//! Block type resolution.

use crate::model::{Block, BlockKind};

/// Nested body types that identify an untyped container, in priority order.
const BODY_KINDS: &[(&str, BlockKind)] = &[
    ("image_body", BlockKind::Image),
    ("table_body", BlockKind::Table),
];

/// Resolve the kind of a block before any rendering decision is made.
///
/// A declared type wins. An untyped block is inferred from its direct
/// children: an `image_body` child makes it an image, otherwise a
/// `table_body` child makes it a table. Anything else stays
/// [`BlockKind::Unknown`].
pub fn resolve(block: &Block) -> BlockKind {
    if let Some(declared) = block.declared_type() {
        return BlockKind::parse(declared);
    }
    infer_from_children(block).unwrap_or(BlockKind::Unknown)
}

/// Kind implied by the block's direct children, if any.
pub fn infer_from_children(block: &Block) -> Option<BlockKind> {
    BODY_KINDS.iter().find_map(|(body, kind)| {
        block
            .children()
            .iter()
            .any(|child| child.declared_type() == Some(*body))
            .then_some(*kind)
    })
}
