//! Hand-written WordprocessingML for the pieces the document builder cannot
//! express: page-anchored `wps` text boxes and section breaks in the middle of
//! the body.
//!
//! Each fragment is a complete `<w:p>` that declares the namespaces it uses,
//! so it can be spliced anywhere into `word/document.xml`.

use crate::geometry::PageGeometry;
use crate::replay::{LineSpacing, Rect, TextStyle};
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::fmt::Write;

const NS_DECLS: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape" "#,
    r#"xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006""#
);

const URI_SHAPE: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingShape";

/// Points to English Metric Units.
pub(crate) fn emu(pt: f64) -> i64 {
    (pt * 12_700.0).round() as i64
}

/// Points to twentieths of a point.
pub(crate) fn twips(pt: f64) -> i64 {
    (pt * 20.0).round() as i64
}

/// Points to the nearest half-point, at least 1.
pub(crate) fn half_points(pt: f64) -> i64 {
    ((pt * 2.0).round() as i64).max(1)
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// Replace characters XML 1.0 cannot carry with a space.
///
/// Extracted text regularly contains form feeds and other C0 controls; a
/// single one makes Word reject the whole package.
pub(crate) fn sanitize_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if is_xml_char(c) { c } else { ' ' })
            .collect(),
    )
}

/// Section properties for one page with zero margins.
pub(crate) fn sect_pr(geometry: PageGeometry) -> String {
    let (w, h) = (twips(geometry.width), twips(geometry.height));
    let orient = if w > h { r#" w:orient="landscape""# } else { "" };
    format!(
        concat!(
            r#"<w:sectPr><w:type w:val="nextPage"/>"#,
            r#"<w:pgSz w:w="{}" w:h="{}"{}/>"#,
            r#"<w:pgMar w:top="0" w:right="0" w:bottom="0" w:left="0" w:header="0" w:footer="0" w:gutter="0"/>"#,
            r#"</w:sectPr>"#
        ),
        w, h, orient
    )
}

/// Empty paragraph carrying the properties of the section it ends.
pub(crate) fn section_break(geometry: PageGeometry) -> String {
    format!(
        r#"<w:p {}><w:pPr>{}{}</w:pPr></w:p>"#,
        NS_DECLS,
        ANCHOR_SPACING,
        sect_pr(geometry)
    )
}

const ANCHOR_SPACING: &str = r#"<w:spacing w:before="0" w:after="0" w:line="20" w:lineRule="exact"/>"#;

/// One-point-high paragraph holding a page-anchored drawing.
pub(crate) fn anchor_paragraph(drawing: &str) -> String {
    format!(
        r#"<w:p {}><w:pPr>{}</w:pPr><w:r>{}</w:r></w:p>"#,
        NS_DECLS, ANCHOR_SPACING, drawing
    )
}

fn spacing(line_spacing: LineSpacing) -> String {
    let (line, rule) = match line_spacing {
        LineSpacing::Multiple(m) => ((240.0 * m).round().max(1.0) as i64, "auto"),
        LineSpacing::Exact(pt) => (twips(pt).max(1), "exact"),
    };
    format!(
        r#"<w:spacing w:before="0" w:after="0" w:line="{}" w:lineRule="{}"/>"#,
        line, rule
    )
}

/// Text box paragraphs: one per line, grid snapping off.
pub(crate) fn text_box_paragraphs(text: &str, style: &TextStyle) -> String {
    let sz = half_points(style.font_size);
    let bold = if style.bold { "<w:b/><w:bCs/>" } else { "" };
    let rpr = format!(
        r#"<w:rPr>{}<w:sz w:val="{}"/><w:szCs w:val="{}"/></w:rPr>"#,
        bold, sz, sz
    );
    let ppr = format!(
        r#"<w:pPr><w:snapToGrid w:val="0"/>{}{}</w:pPr>"#,
        spacing(style.line_spacing),
        rpr
    );

    let text = sanitize_text(text);
    let mut out = String::new();
    for line in text.split('\n') {
        out.push_str("<w:p>");
        out.push_str(&ppr);
        if !line.is_empty() {
            let _ = write!(
                out,
                r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
                rpr,
                escape(line)
            );
        }
        out.push_str("</w:p>");
    }
    out
}

/// A page-anchored text box shape.
pub(crate) fn text_box(rect: &Rect, id: u32, content: &str, border: Option<f64>) -> String {
    let line = match border {
        Some(w) => format!(
            r#"<a:ln w="{}"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln>"#,
            emu(w)
        ),
        None => "<a:ln><a:noFill/></a:ln>".to_string(),
    };

    format!(
        concat!(
            r#"<mc:AlternateContent><mc:Choice Requires="wps"><w:drawing>"#,
            r#"<wp:anchor distT="0" distB="0" distL="0" distR="0" simplePos="0" relativeHeight="{id}" "#,
            r#"behindDoc="0" locked="0" layoutInCell="1" allowOverlap="1">"#,
            r#"<wp:simplePos x="0" y="0"/>"#,
            r#"<wp:positionH relativeFrom="page"><wp:posOffset>{x}</wp:posOffset></wp:positionH>"#,
            r#"<wp:positionV relativeFrom="page"><wp:posOffset>{y}</wp:posOffset></wp:positionV>"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
            r#"<wp:wrapNone/>"#,
            r#"<wp:docPr id="{id}" name="Text Box {id}"/>"#,
            r#"<wp:cNvGraphicFramePr/>"#,
            r#"<a:graphic><a:graphicData uri="{uri}"><wps:wsp><wps:cNvSpPr txBox="1"/>"#,
            r#"<wps:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>{line}</wps:spPr>"#,
            r#"<wps:txbx><w:txbxContent>{content}</w:txbxContent></wps:txbx>"#,
            r#"<wps:bodyPr rot="0" vert="horz" wrap="square" lIns="0" tIns="0" rIns="0" bIns="0" anchor="t" anchorCtr="0">"#,
            r#"<a:noAutofit/></wps:bodyPr></wps:wsp></a:graphicData></a:graphic>"#,
            r#"</wp:anchor></w:drawing></mc:Choice></mc:AlternateContent>"#
        ),
        id = id,
        x = emu(rect.left),
        y = emu(rect.top),
        cx = emu(rect.width),
        cy = emu(rect.height),
        uri = URI_SHAPE,
        line = line,
        content = content
    )
}
