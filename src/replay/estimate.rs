//! Font size and line count estimation from block geometry.

use crate::model::BBox;

fn is_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Glyph width to height ratio and line pitch factor for a text's script.
fn script_metrics(text: &str) -> (f64, f64) {
    if is_cjk(text) {
        (1.0, 1.1)
    } else {
        (0.6, 1.2)
    }
}

/// Estimate how many lines `text` occupies inside `bbox`.
///
/// The font size is derived from the box area available per character, and
/// the line count from the box height divided by that size's line pitch.
/// Returns 0 for empty text and at least 1 otherwise.
pub fn estimate_line_count(text: &str, bbox: Option<BBox>) -> usize {
    if text.is_empty() {
        return 0;
    }
    let Some(bbox) = bbox else {
        return 1;
    };
    let (width, height) = (bbox.width(), bbox.height());
    let chars = text.chars().count() as f64;
    if !(width > 0.0 && height > 0.0) {
        return 1;
    }

    let (ratio, pitch) = script_metrics(text);
    let size = ((width * height) / chars / ratio).sqrt();
    let line_height = size * pitch;
    if !(line_height > 0.0) || !line_height.is_finite() {
        return 1;
    }
    let lines = (height / line_height).round();
    if lines >= 1.0 {
        lines as usize
    } else {
        1
    }
}

/// Estimate a font size, in points, for `text` filling `bbox`.
///
/// Returns `None` when the box or text gives nothing to go on.
pub fn estimate_font_size(text: &str, bbox: Option<BBox>) -> Option<f64> {
    let bbox = bbox?;
    let lines = estimate_line_count(text.trim(), Some(bbox));
    if lines == 0 || !(bbox.height() > 0.0) {
        return None;
    }
    let (_, pitch) = script_metrics(text);
    let size = bbox.height() / (lines as f64 * pitch);
    size.is_finite().then(|| (size * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_latin_line() {
        let bbox = Some(BBox::new(0.0, 0.0, 66.0, 12.0));
        assert_eq!(estimate_line_count("Hello world", bbox), 1);
        assert_eq!(estimate_font_size("Hello world", bbox), Some(10.0));
    }

    #[test]
    fn test_multi_line_paragraph() {
        let text = "a".repeat(300);
        let bbox = Some(BBox::new(0.0, 0.0, 300.0, 60.0));
        let lines = estimate_line_count(&text, bbox);
        assert!(lines > 1, "expected several lines, got {}", lines);
    }

    #[test]
    fn test_cjk_uses_square_glyphs() {
        let bbox = Some(BBox::new(0.0, 0.0, 40.0, 11.0));
        assert_eq!(estimate_line_count("中文测试", bbox), 1);
        assert_eq!(estimate_font_size("中文测试", bbox), Some(10.0));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(estimate_line_count("", Some(BBox::new(0.0, 0.0, 10.0, 10.0))), 0);
        assert_eq!(estimate_line_count("abc", None), 1);
        assert_eq!(estimate_line_count("abc", Some(BBox::new(0.0, 0.0, 0.0, 10.0))), 1);
        assert_eq!(estimate_font_size("", Some(BBox::new(0.0, 0.0, 10.0, 10.0))), None);
        assert_eq!(estimate_font_size("abc", None), None);
    }
}
