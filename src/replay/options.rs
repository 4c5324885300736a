//! Replay options and configuration.

use crate::geometry::CoordinateMode;
use std::path::PathBuf;

/// Default maximum width of an inline image fallback, in points.
pub const DEFAULT_INLINE_MAX_WIDTH: f64 = 400.0;

/// Literal prefix placed before a table's text when it is rendered as text.
pub const DEFAULT_TABLE_MARKER: &str = "[Table]";

/// Label placed before each table caption in extracted table text.
pub const DEFAULT_CAPTION_LABEL: &str = "Caption:";

/// Font size used when a block carries no `avg_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSizeFallback {
    /// A fixed size per block kind
    Fixed { title: f64, text: f64 },
    /// Estimate from the block's bounding box and character count, falling
    /// back to the fixed defaults when no estimate is possible
    Estimated,
}

impl Default for FontSizeFallback {
    fn default() -> Self {
        FontSizeFallback::Fixed {
            title: 12.0,
            text: 10.0,
        }
    }
}

/// Paragraph line spacing inside text boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineSpacing {
    /// Multiple of single spacing
    Multiple(f64),
    /// Exact line pitch in points
    Exact(f64),
}

impl Default for LineSpacing {
    fn default() -> Self {
        LineSpacing::Multiple(1.0)
    }
}

/// Options for replaying a layout onto a canvas.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// How block boxes relate to their page
    pub coordinate_mode: CoordinateMode,

    /// Directory holding image assets (default: `images/` next to the layout)
    pub image_dir: Option<PathBuf>,

    /// Font size policy for blocks without `avg_size`
    pub font_fallback: FontSizeFallback,

    /// Maximum width of an inline image fallback, in points
    pub inline_max_width: f64,

    /// Line spacing inside text boxes
    pub line_spacing: LineSpacing,

    /// Prefix of a table rendered as text
    pub table_marker: String,

    /// Label before table captions
    pub caption_label: String,

    /// Font size of a table rendered as text
    pub table_font_size: f64,

    /// Border width of a table rendered as text, in points
    pub table_border_width: f64,
}

impl ReplayOptions {
    /// Create new replay options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coordinate mode.
    pub fn with_coordinate_mode(mut self, mode: CoordinateMode) -> Self {
        self.coordinate_mode = mode;
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Set the font size fallback.
    pub fn with_font_fallback(mut self, fallback: FontSizeFallback) -> Self {
        self.font_fallback = fallback;
        self
    }

    /// Set the inline image width limit.
    pub fn with_inline_max_width(mut self, width: f64) -> Self {
        self.inline_max_width = width.max(1.0);
        self
    }

    /// Set the line spacing.
    pub fn with_line_spacing(mut self, spacing: LineSpacing) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set the table marker text.
    pub fn with_table_marker(mut self, marker: impl Into<String>) -> Self {
        self.table_marker = marker.into();
        self
    }

    /// Set the caption label text.
    pub fn with_caption_label(mut self, label: impl Into<String>) -> Self {
        self.caption_label = label.into();
        self
    }
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            coordinate_mode: CoordinateMode::AsIs,
            image_dir: None,
            font_fallback: FontSizeFallback::default(),
            inline_max_width: DEFAULT_INLINE_MAX_WIDTH,
            line_spacing: LineSpacing::default(),
            table_marker: DEFAULT_TABLE_MARKER.to_string(),
            caption_label: DEFAULT_CAPTION_LABEL.to_string(),
            table_font_size: 10.0,
            table_border_width: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ReplayOptions::default();
        assert_eq!(opts.coordinate_mode, CoordinateMode::AsIs);
        assert_eq!(opts.inline_max_width, 400.0);
        assert_eq!(opts.line_spacing, LineSpacing::Multiple(1.0));
        assert_eq!(
            opts.font_fallback,
            FontSizeFallback::Fixed {
                title: 12.0,
                text: 10.0
            }
        );
        assert!(opts.image_dir.is_none());
    }

    #[test]
    fn test_builder() {
        let opts = ReplayOptions::new()
            .with_coordinate_mode(CoordinateMode::PageRelative)
            .with_image_dir("/tmp/assets")
            .with_inline_max_width(0.0)
            .with_table_marker("[TABLE]");
        assert_eq!(opts.coordinate_mode, CoordinateMode::PageRelative);
        assert_eq!(opts.image_dir, Some(PathBuf::from("/tmp/assets")));
        assert_eq!(opts.inline_max_width, 1.0);
        assert_eq!(opts.table_marker, "[TABLE]");
    }
}
