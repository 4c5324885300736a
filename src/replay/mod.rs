//! Layout replay.
//!
//! Walks an (enriched) layout page by page and emits positioned elements onto
//! a [`Canvas`]: text boxes for text and titles, page-anchored pictures for
//! figures and table images, and bordered text boxes for tables that only
//! have text. Each block is rendered through an ordered list of strategies;
//! the first one the canvas accepts wins, and a block that exhausts its list
//! is skipped without affecting its siblings.
//!
//! # Example
//!
//! ```no_run
//! use pdf2word::docx::DocxCanvas;
//! use pdf2word::model::LayoutDocument;
//! use pdf2word::replay::{LayoutReplayer, ReplayOptions};
//! use std::path::Path;
//!
//! fn main() -> pdf2word::Result<()> {
//!     let layout_path = Path::new("output/layout_enriched.json");
//!     let layout = LayoutDocument::from_path(layout_path)?;
//!
//!     let replayer = LayoutReplayer::for_layout(layout_path, ReplayOptions::default());
//!     let mut canvas = DocxCanvas::new();
//!     let report = replayer.render(&layout, &mut canvas, Path::new("output/out.docx"))?;
//!     println!("{} blocks inserted, {} skipped", report.inserted, report.skipped);
//!     Ok(())
//! }
//! ```

mod canvas;
mod element;
mod estimate;
mod options;
mod outcome;
mod text;

pub use canvas::Canvas;
pub use element::{ElementKind, InlineImage, PlacedImage, Rect, TextBox, TextStyle, MIN_EXTENT};
pub use estimate::{estimate_font_size, estimate_line_count};
pub use options::{
    FontSizeFallback, LineSpacing, ReplayOptions, DEFAULT_CAPTION_LABEL, DEFAULT_INLINE_MAX_WIDTH,
    DEFAULT_TABLE_MARKER,
};
pub use outcome::{BlockOutcome, InsertOutcome, ReplayReport};
pub use text::extract_text;

use crate::docx::DocxCanvas;
use crate::error::{Error, Result};
use crate::geometry::{CoordinateMapper, PageGeometry};
use crate::model::{BBox, Block, BlockKind, LayoutDocument, Page};
use crate::resolve::resolve;
use crate::tree::{find_image_span, find_table_image_span};
use std::path::{Path, PathBuf};

/// One way of rendering a block.
#[derive(Debug, Clone)]
enum Strategy {
    TextBox(TextBox),
    FloatingImage(PlacedImage),
    InlineImage(InlineImage),
    Paragraph(String),
}

impl Strategy {
    fn element(&self) -> ElementKind {
        match self {
            Strategy::TextBox(_) => ElementKind::TextBox,
            Strategy::FloatingImage(_) => ElementKind::FloatingImage,
            Strategy::InlineImage(_) => ElementKind::InlineImage,
            Strategy::Paragraph(_) => ElementKind::Paragraph,
        }
    }

    fn apply<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<()> {
        match self {
            Strategy::TextBox(t) => canvas.add_text_box(t),
            Strategy::FloatingImage(i) => canvas.add_floating_image(i),
            Strategy::InlineImage(i) => canvas.add_inline_image(i),
            Strategy::Paragraph(text) => canvas.add_paragraph(text),
        }
    }
}

/// Strategies for a block in preference order.
#[derive(Debug)]
struct Plan {
    steps: Vec<Strategy>,
    /// Set when even the first step is already a fallback
    degraded: Option<String>,
}

impl Plan {
    fn preferred(steps: Vec<Strategy>) -> Self {
        Self {
            steps,
            degraded: None,
        }
    }

    fn fallback(steps: Vec<Strategy>, reason: impl Into<String>) -> Self {
        Self {
            steps,
            degraded: Some(reason.into()),
        }
    }
}

#[derive(Debug)]
enum Decision {
    Render(Plan),
    Skip(String),
}

/// Replays layouts onto a canvas.
#[derive(Debug, Clone)]
pub struct LayoutReplayer {
    options: ReplayOptions,
    image_dir: PathBuf,
}

impl LayoutReplayer {
    /// Create a replayer resolving assets from the configured image directory,
    /// or `images/` in the working directory.
    pub fn new(options: ReplayOptions) -> Self {
        let image_dir = options
            .image_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("images"));
        Self { options, image_dir }
    }

    /// Create a replayer for a layout file; assets default to the `images/`
    /// directory next to it.
    pub fn for_layout<P: AsRef<Path>>(layout_path: P, options: ReplayOptions) -> Self {
        let image_dir = options.image_dir.clone().unwrap_or_else(|| {
            layout_path
                .as_ref()
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join("images")
        });
        Self { options, image_dir }
    }

    pub fn options(&self) -> &ReplayOptions {
        &self.options
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Replay `doc`, save the canvas to `output` and close it.
    ///
    /// The canvas is closed whether or not saving succeeds; a save error is
    /// returned after closing.
    pub fn render<C: Canvas + ?Sized>(
        &self,
        doc: &LayoutDocument,
        canvas: &mut C,
        output: &Path,
    ) -> Result<ReplayReport> {
        let report = self.replay(doc, canvas);

        log::info!("Saving document to {}", output.display());
        let saved = canvas.save(output);
        if let Err(e) = canvas.close() {
            log::warn!("Failed to close document: {}", e);
        }
        saved?;
        Ok(report)
    }

    /// Emit every page of `doc` onto the canvas without saving it.
    pub fn replay<C: Canvas + ?Sized>(&self, doc: &LayoutDocument, canvas: &mut C) -> ReplayReport {
        let mapper = CoordinateMapper::new(doc, self.options.coordinate_mode);
        let mut report = ReplayReport::default();

        for (page_idx, page) in doc.pdf_info.iter().enumerate() {
            log::info!("Replaying page {} ({} blocks)", page_idx + 1, page.block_count());
            self.replay_page(canvas, page, page_idx, &mapper, &mut report);
            report.pages += 1;
        }

        log::info!(
            "Replay complete: {} pages, {} inserted, {} degraded, {} skipped",
            report.pages,
            report.inserted,
            report.degraded,
            report.skipped
        );
        report
    }

    fn replay_page<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        page: &Page,
        page_idx: usize,
        mapper: &CoordinateMapper,
        report: &mut ReplayReport,
    ) {
        if page_idx > 0 {
            if let Err(e) = canvas.new_section() {
                log::error!("Page {}: failed to start a new section: {}", page_idx + 1, e);
            }
        }

        if let Err(e) = apply_geometry(canvas, page) {
            log::warn!("Page {}: {}; keeping previous page setup", page_idx + 1, e);
            report.geometry_failures += 1;
        }

        for (ordinal, block) in page.blocks_in_reading_order().into_iter().enumerate() {
            let kind = resolve(block);
            let bbox = block.bbox.map(|b| mapper.map(b, page_idx));
            let outcome = match self.plan(block, kind, bbox) {
                Decision::Render(plan) => execute(canvas, plan),
                Decision::Skip(reason) => InsertOutcome::Skipped { reason },
            };

            match &outcome {
                InsertOutcome::Inserted { element } => log::debug!(
                    "Page {} block {} ({}): {}",
                    page_idx + 1,
                    block.index_label(),
                    kind,
                    element
                ),
                InsertOutcome::Degraded { element, reason } => log::warn!(
                    "Page {} block {} ({}): inserted as {} ({})",
                    page_idx + 1,
                    block.index_label(),
                    kind,
                    element,
                    reason
                ),
                InsertOutcome::Skipped { reason } => log::warn!(
                    "Page {} block {} ({}): skipped ({})",
                    page_idx + 1,
                    block.index_label(),
                    kind,
                    reason
                ),
            }
            report.record(page_idx, ordinal, kind, outcome);
        }
    }

    fn plan(&self, block: &Block, kind: BlockKind, bbox: Option<BBox>) -> Decision {
        match kind {
            BlockKind::Text | BlockKind::Title => self.plan_text(block, kind, bbox),
            BlockKind::Image => self.plan_image(block, bbox),
            BlockKind::Table => self.plan_table(block, bbox),
            BlockKind::Unknown => Decision::Skip("unresolved block type".to_string()),
        }
    }

    fn plan_text(&self, block: &Block, kind: BlockKind, bbox: Option<BBox>) -> Decision {
        let text = extract_text(block, kind, &self.options.caption_label);
        let Some(bbox) = bbox else {
            return Decision::Render(Plan::fallback(
                vec![Strategy::Paragraph(text)],
                "block has no bounding box",
            ));
        };

        let text_box = TextBox {
            rect: Rect::from_bbox(bbox),
            style: TextStyle {
                font_size: self.font_size(block, kind, &text, bbox),
                bold: kind == BlockKind::Title,
                line_spacing: self.options.line_spacing,
            },
            text: text.clone(),
            border: None,
        };
        Decision::Render(Plan::preferred(vec![
            Strategy::TextBox(text_box),
            Strategy::Paragraph(text),
        ]))
    }

    fn plan_image(&self, block: &Block, bbox: Option<BBox>) -> Decision {
        let Some(name) = find_image_span(block).and_then(|s| s.image_path.as_deref()) else {
            return Decision::Skip("no image reference".to_string());
        };
        let path = match self.resolve_asset(name) {
            Ok(path) => path,
            Err(e) => return Decision::Skip(e.to_string()),
        };
        let Some(bbox) = bbox else {
            return Decision::Skip("block has no bounding box".to_string());
        };

        let rect = Rect::from_bbox(bbox);
        Decision::Render(Plan::preferred(vec![
            Strategy::FloatingImage(PlacedImage {
                rect,
                path: path.clone(),
            }),
            Strategy::InlineImage(InlineImage::fit(path, rect, self.options.inline_max_width)),
        ]))
    }

    fn plan_table(&self, block: &Block, bbox: Option<BBox>) -> Decision {
        let text = format!(
            "{}\n{}",
            self.options.table_marker,
            extract_text(block, BlockKind::Table, &self.options.caption_label)
        );
        let paragraph = Strategy::Paragraph(text.clone());

        let Some(bbox) = bbox else {
            return Decision::Render(Plan::fallback(vec![paragraph], "block has no bounding box"));
        };
        let rect = Rect::from_bbox(bbox);
        let text_box = Strategy::TextBox(TextBox {
            rect,
            text,
            style: TextStyle {
                font_size: self.options.table_font_size,
                bold: false,
                line_spacing: self.options.line_spacing,
            },
            border: Some(self.options.table_border_width),
        });

        let image = find_table_image_span(block)
            .and_then(|s| s.image_path.as_deref())
            .ok_or_else(|| "no table image".to_string())
            .and_then(|name| self.resolve_asset(name).map_err(|e| e.to_string()));

        match image {
            Ok(path) => Decision::Render(Plan::preferred(vec![
                Strategy::FloatingImage(PlacedImage { rect, path }),
                text_box,
                paragraph,
            ])),
            Err(reason) => Decision::Render(Plan::fallback(vec![text_box, paragraph], reason)),
        }
    }

    fn font_size(&self, block: &Block, kind: BlockKind, text: &str, bbox: BBox) -> f64 {
        if let Some(size) = block.avg_size.filter(|s| s.is_finite() && *s > 0.0) {
            return size;
        }
        let policy = match self.options.font_fallback {
            FontSizeFallback::Estimated => {
                if let Some(size) = estimate_font_size(text, Some(bbox)).filter(|s| *s > 0.0) {
                    return size;
                }
                FontSizeFallback::default()
            }
            fixed => fixed,
        };
        match policy {
            FontSizeFallback::Fixed { title, .. } if kind == BlockKind::Title => title,
            FontSizeFallback::Fixed { text, .. } => text,
            FontSizeFallback::Estimated => 10.0,
        }
    }

    /// Absolute path of an asset in the image directory, if the file exists.
    fn resolve_asset(&self, name: &str) -> Result<PathBuf> {
        let path = self.image_dir.join(name);
        if !path.is_file() {
            return Err(Error::Asset(path));
        }
        Ok(std::fs::canonicalize(&path).unwrap_or(path))
    }
}

fn apply_geometry<C: Canvas + ?Sized>(canvas: &mut C, page: &Page) -> Result<()> {
    let geometry = PageGeometry::for_page(page);
    if !geometry.is_valid() {
        return Err(Error::Geometry(format!(
            "invalid page size {}x{}",
            geometry.width, geometry.height
        )));
    }
    canvas.set_geometry(geometry)
}

/// Try a plan's strategies in order until the canvas accepts one.
fn execute<C: Canvas + ?Sized>(canvas: &mut C, plan: Plan) -> InsertOutcome {
    let mut reasons: Vec<String> = plan.degraded.into_iter().collect();

    for step in &plan.steps {
        match step.apply(canvas) {
            Ok(()) if reasons.is_empty() => {
                return InsertOutcome::Inserted {
                    element: step.element(),
                }
            }
            Ok(()) => {
                return InsertOutcome::Degraded {
                    element: step.element(),
                    reason: reasons.join("; "),
                }
            }
            Err(e) => {
                log::debug!("{} insertion failed: {}", step.element(), e);
                reasons.push(format!("{} failed: {}", step.element(), e));
            }
        }
    }

    log::error!("All insertion strategies failed: {}", reasons.join("; "));
    InsertOutcome::Skipped {
        reason: reasons.join("; "),
    }
}

/// Read a layout file, replay it into a DOCX document and save it to `output`.
///
/// A missing layout file is [`Error::InputMissing`]; nothing is written.
pub fn replay_file<P, Q>(layout_path: P, output_path: Q, options: &ReplayOptions) -> Result<ReplayReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let layout_path = layout_path.as_ref();
    if !layout_path.is_file() {
        return Err(Error::InputMissing(layout_path.to_path_buf()));
    }

    log::info!("Loading layout file {}", layout_path.display());
    let layout = LayoutDocument::from_path(layout_path)?;
    let replayer = LayoutReplayer::for_layout(layout_path, options.clone());
    log::info!("Resolving images from {}", replayer.image_dir().display());

    let mut canvas = DocxCanvas::new();
    replayer.render(&layout, &mut canvas, output_path.as_ref())
}
