//! Elements emitted onto a canvas.

use super::LineSpacing;
use crate::model::BBox;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest width or height of a placed element, in points.
pub const MIN_EXTENT: f64 = 1.0;

/// Page-relative placement rectangle, in points from the page's top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Placement for a box; width and height never drop below [`MIN_EXTENT`].
    pub fn from_bbox(bbox: BBox) -> Self {
        Self {
            left: bbox.x0,
            top: bbox.y0,
            width: bbox.width().max(MIN_EXTENT),
            height: bbox.height().max(MIN_EXTENT),
        }
    }
}

/// Character and paragraph formatting of a text box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    ///
    /// DOCX output stores sizes in half-points, so the value is rounded to the
    /// nearest half-point when written: `10.33` becomes `w:sz="21"` (10.5pt).
    /// Sizes below one half-point are written as `w:sz="1"`.
    pub font_size: f64,
    pub bold: bool,
    pub line_spacing: LineSpacing,
}

/// A positioned text container.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub rect: Rect,
    pub text: String,
    pub style: TextStyle,
    /// Border width in points; `None` draws no border
    pub border: Option<f64>,
}

/// A picture anchored to the page at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    pub rect: Rect,
    pub path: PathBuf,
}

/// A picture flowing with the text.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub path: PathBuf,
    pub width: f64,
    pub height: f64,
}

impl InlineImage {
    /// Size a box-sized picture to at most `max_width`, keeping its aspect ratio.
    pub fn fit(path: PathBuf, rect: Rect, max_width: f64) -> Self {
        let (width, height) = if rect.width > max_width {
            (max_width, rect.height * (max_width / rect.width))
        } else {
            (rect.width, rect.height)
        };
        Self {
            path,
            width,
            height,
        }
    }
}

/// Kind of element a block ended up as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    TextBox,
    FloatingImage,
    InlineImage,
    Paragraph,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ElementKind::TextBox => "text box",
            ElementKind::FloatingImage => "floating image",
            ElementKind::InlineImage => "inline image",
            ElementKind::Paragraph => "paragraph",
        };
        f.write_str(s)
    }
}
