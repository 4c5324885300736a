//! Depth-first search over the layout tree.
//!
//! Blocks, lines and spans are treated as labelled nodes. Children are
//! visited in the order nested blocks, then lines, then spans.

use crate::model::{Block, Line, Span, SpanKind};

/// A borrowed node of the layout tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Block(&'a Block),
    Line(&'a Line),
    Span(&'a Span),
}

impl<'a> Node<'a> {
    /// The node's `type` label, if it has one.
    pub fn label(&self) -> Option<&'a str> {
        match self {
            Node::Block(b) => b.block_type.as_deref(),
            Node::Line(_) => None,
            Node::Span(s) => s.span_type.as_deref(),
        }
    }

    /// Direct children in visiting order.
    pub fn children(&self) -> Vec<Node<'a>> {
        match self {
            Node::Block(b) => b
                .children()
                .iter()
                .map(Node::Block)
                .chain(b.lines().iter().map(Node::Line))
                .collect(),
            Node::Line(l) => l.spans().iter().map(Node::Span).collect(),
            Node::Span(_) => Vec::new(),
        }
    }

    pub fn as_span(&self) -> Option<&'a Span> {
        match self {
            Node::Span(s) => Some(s),
            _ => None,
        }
    }
}

/// First node, in pre-order, satisfying `predicate`.
pub fn find_first<'a, F>(root: Node<'a>, predicate: F) -> Option<Node<'a>>
where
    F: Fn(&Node<'a>) -> bool,
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if predicate(&node) {
            return Some(node);
        }
        stack.extend(node.children().into_iter().rev());
    }
    None
}

/// First span under `block` satisfying `predicate`.
pub fn find_span<'a, F>(block: &'a Block, predicate: F) -> Option<&'a Span>
where
    F: Fn(&Span) -> bool,
{
    find_first(Node::Block(block), |node| {
        node.as_span().is_some_and(|s| predicate(s))
    })
    .and_then(|node| node.as_span())
}

/// First image span carrying a file reference.
pub fn find_image_span(block: &Block) -> Option<&Span> {
    find_span(block, |s| s.kind() == SpanKind::Image && s.image_path.is_some())
}

/// First table span with a rendered image, searched only under `table_body`
/// children.
pub fn find_table_image_span(block: &Block) -> Option<&Span> {
    block
        .children()
        .iter()
        .filter(|child| child.declared_type() == Some("table_body"))
        .find_map(|body| {
            find_span(body, |s| s.kind() == SpanKind::Table && s.image_path.is_some())
        })
}
