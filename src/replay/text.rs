//! Text extraction for rendering.

use crate::model::{Block, BlockKind, SpanKind};

/// Text shown for a block.
///
/// Text spans contribute their content and inline equations their content in
/// brackets, across all lines, joined by single spaces. For tables each
/// `table_caption` child is appended on its own line after `caption_label`.
pub fn extract_text(block: &Block, kind: BlockKind, caption_label: &str) -> String {
    let mut parts = span_texts(block);

    if kind == BlockKind::Table {
        for caption in block
            .children()
            .iter()
            .filter(|b| b.declared_type() == Some("table_caption"))
        {
            let text = span_texts(caption).join(" ");
            if !text.is_empty() {
                parts.push(format!("\n{} {}", caption_label, text));
            }
        }
    }

    parts.join(" ")
}

fn span_texts(block: &Block) -> Vec<String> {
    block
        .lines()
        .iter()
        .flat_map(|line| line.spans().iter())
        .filter_map(|span| {
            let content = span.content.as_deref().unwrap_or("");
            match span.kind() {
                SpanKind::Text => Some(content.to_string()),
                SpanKind::InlineEquation => Some(format!("[{}]", content)),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Line, Span};

    #[test]
    fn test_text_and_equations() {
        let block = Block::new("text", BBox::default())
            .with_line(Line::new(vec![Span::text("Let"), Span::equation("x^2")]))
            .with_line(Line::new(vec![Span::text("be positive."), Span::image("x.png")]));
        assert_eq!(
            extract_text(&block, BlockKind::Text, "Caption:"),
            "Let [x^2] be positive."
        );
    }

    #[test]
    fn test_table_captions_appended() {
        let caption = Block::new("table_caption", BBox::default())
            .with_line(Line::new(vec![Span::text("Table 1: Results")]));
        let footnote = Block::new("table_footnote", BBox::default())
            .with_line(Line::new(vec![Span::text("ignored")]));
        let block = Block::new("table", BBox::default())
            .with_line(Line::new(vec![Span::text("a b c")]))
            .with_child(caption)
            .with_child(footnote);

        assert_eq!(
            extract_text(&block, BlockKind::Table, "Caption:"),
            "a b c \nCaption: Table 1: Results"
        );
        assert_eq!(extract_text(&block, BlockKind::Text, "Caption:"), "a b c");
    }

    #[test]
    fn test_empty_block() {
        let block = Block::new("text", BBox::default());
        assert_eq!(extract_text(&block, BlockKind::Text, "Caption:"), "");
    }
}
