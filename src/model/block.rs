//! Structural layout blocks, lines and spans.

use super::BBox;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Semantic type of a layout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Body text paragraph
    Text,
    /// Heading
    Title,
    /// Figure
    Image,
    /// Table (rendered as an image or reconstructed as text)
    Table,
    /// Missing or unrecognised type; replay skips these
    Unknown,
}

impl BlockKind {
    /// Map a producer type string to a kind.
    pub fn parse(s: &str) -> Self {
        match s {
            "text" => BlockKind::Text,
            "title" => BlockKind::Title,
            "image" => BlockKind::Image,
            "table" => BlockKind::Table,
            _ => BlockKind::Unknown,
        }
    }

    /// Producer type string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Title => "title",
            BlockKind::Image => "image",
            BlockKind::Table => "table",
            BlockKind::Unknown => "unknown",
        }
    }

    /// Text and title blocks carry font-size information.
    pub fn is_textual(&self) -> bool {
        matches!(self, BlockKind::Text | BlockKind::Title)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the structural layout tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    /// Raw producer type (`text`, `title`, `image`, `table`, `image_body`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,

    /// Bounding box; malformed boxes are read as absent
    #[serde(
        default,
        deserialize_with = "lenient_bbox",
        skip_serializing_if = "Option::is_none"
    )]
    pub bbox: Option<BBox>,

    /// Text lines; `None` when the producer wrote no `lines` key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<Line>>,

    /// Nested sub-blocks (`image_body`, `table_body`, `table_caption`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,

    /// Average font size, written by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_size: Option<f64>,

    /// Ordinal position assigned by the producer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Number>,

    /// Fields this crate does not interpret, kept for round-tripping
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    /// Create a block with the given raw type and bounding box.
    pub fn new(block_type: impl Into<String>, bbox: BBox) -> Self {
        Self {
            block_type: Some(block_type.into()),
            bbox: Some(bbox),
            ..Default::default()
        }
    }

    /// Raw type, treating an empty string as absent.
    pub fn declared_type(&self) -> Option<&str> {
        self.block_type.as_deref().filter(|t| !t.is_empty())
    }

    /// Kind declared on the block itself, without inference.
    pub fn declared_kind(&self) -> BlockKind {
        self.declared_type()
            .map(BlockKind::parse)
            .unwrap_or(BlockKind::Unknown)
    }

    /// Text lines, empty when absent.
    pub fn lines(&self) -> &[Line] {
        self.lines.as_deref().unwrap_or(&[])
    }

    /// Nested sub-blocks, empty when absent.
    pub fn children(&self) -> &[Block] {
        self.blocks.as_deref().unwrap_or(&[])
    }

    /// Append a line.
    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.get_or_insert_with(Vec::new).push(line);
        self
    }

    /// Append a nested block.
    pub fn with_child(mut self, child: Block) -> Self {
        self.blocks.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Concatenation of every span's `content` across all lines, unseparated.
    pub fn raw_content(&self) -> String {
        self.lines()
            .iter()
            .flat_map(|line| line.spans().iter())
            .filter_map(|span| span.content.as_deref())
            .collect()
    }

    /// Top edge used for reading-order sorting.
    pub fn top(&self) -> f64 {
        self.bbox.map(|b| b.y0).unwrap_or(0.0)
    }

    /// Index rendered for diagnostics.
    pub fn index_label(&self) -> String {
        self.index
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// A line of spans inside a block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Line {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spans: Option<Vec<Span>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self {
            spans: Some(spans),
            extra: Map::new(),
        }
    }

    /// Spans of the line, empty when absent.
    pub fn spans(&self) -> &[Span] {
        self.spans.as_deref().unwrap_or(&[])
    }
}

/// Kind of a structural span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Text,
    InlineEquation,
    InterlineEquation,
    Image,
    Table,
    Other,
}

/// Smallest unit of the structural tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub span_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// File name of a rendered asset, relative to the images directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Span {
    /// A text span.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            span_type: Some("text".into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// An inline equation span.
    pub fn equation(content: impl Into<String>) -> Self {
        Self {
            span_type: Some("inline_equation".into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// An image span referencing a file in the images directory.
    pub fn image(image_path: impl Into<String>) -> Self {
        Self {
            span_type: Some("image".into()),
            image_path: Some(image_path.into()),
            ..Default::default()
        }
    }

    /// A table span rendered as an image.
    pub fn table_image(image_path: impl Into<String>) -> Self {
        Self {
            span_type: Some("table".into()),
            image_path: Some(image_path.into()),
            ..Default::default()
        }
    }

    pub fn kind(&self) -> SpanKind {
        match self.span_type.as_deref() {
            Some("text") => SpanKind::Text,
            Some("inline_equation") => SpanKind::InlineEquation,
            Some("interline_equation") => SpanKind::InterlineEquation,
            Some("image") => SpanKind::Image,
            Some("table") => SpanKind::Table,
            _ => SpanKind::Other,
        }
    }
}

fn lenient_bbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<BBox>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value::<BBox>(v) {
        Ok(b) => Some(b),
        Err(e) => {
            log::debug!("ignoring malformed bbox: {}", e);
            None
        }
    }))
}
