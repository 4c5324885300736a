//! DOCX canvas backend.
//!
//! Paragraphs, pictures, page setup and the package itself are built with
//! `docx-rs`: one section per page with its own page size and zero margins,
//! page-anchored and inline pictures, plain paragraphs. Text boxes and the
//! section breaks between pages have no builder API and are written as
//! hand-made fragments (see [`xml`]) spliced into the package on save.
//! Nothing touches the disk until [`Canvas::save`].

mod package;
mod xml;

use crate::error::{Error, Result};
use crate::geometry::PageGeometry;
use crate::replay::{Canvas, InlineImage, LineSpacing, PlacedImage, TextBox};
use docx_rs::{
    BreakType, Docx, LineSpacing as ParagraphSpacing, LineSpacingType, PageMargin, Paragraph, Pic,
    RelativeFromHType, RelativeFromVType, Run,
};
use package::Fragments;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Text box shape ids start here, clear of the ids the builder gives pictures.
const FIRST_SHAPE_ID: u32 = 0x4000;

#[derive(Debug)]
enum Item {
    Paragraph(Paragraph),
    Fragment(String),
}

#[derive(Debug)]
struct Section {
    geometry: PageGeometry,
    body: Vec<Item>,
}

impl Section {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            body: Vec::new(),
        }
    }
}

/// A [`Canvas`] that writes a `.docx` file.
#[derive(Debug)]
pub struct DocxCanvas {
    sections: Vec<Section>,
    media: HashMap<PathBuf, Vec<u8>>,
    next_id: u32,
    closed: bool,
}

impl DocxCanvas {
    /// Create an empty document with one Letter-sized section.
    pub fn new() -> Self {
        Self {
            sections: vec![Section::new(PageGeometry::default())],
            media: HashMap::new(),
            next_id: FIRST_SHAPE_ID,
            closed: false,
        }
    }

    /// Number of sections (pages) opened so far.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of distinct pictures read so far.
    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Render("document is closed".to_string()));
        }
        Ok(())
    }

    fn current(&mut self) -> Result<&mut Section> {
        self.ensure_open()?;
        self.sections
            .last_mut()
            .ok_or_else(|| Error::Render("document has no section".to_string()))
    }

    fn push(&mut self, item: Item) -> Result<()> {
        self.current()?.body.push(item);
        Ok(())
    }

    fn next_shape_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Picture bytes for `path`, read and decoded once per source path.
    ///
    /// The builder cannot report undecodable pictures, so they are rejected
    /// here.
    fn picture(&mut self, path: &Path) -> Result<Pic> {
        self.ensure_open()?;
        if let Some(data) = self.media.get(path) {
            return Ok(Pic::new(data));
        }
        if !path.is_file() {
            return Err(Error::Asset(path.to_path_buf()));
        }
        let data = fs::read(path)?;
        image::load_from_memory(&data)?;
        log::debug!("Embedding {} ({} bytes)", path.display(), data.len());

        let pic = Pic::new(&data);
        self.media.insert(path.to_path_buf(), data);
        Ok(pic)
    }

    /// The document with every section laid out, and the fragments to splice
    /// into it.
    fn build(&self) -> (Docx, Fragments) {
        let mut docx = Docx::new();
        let mut fragments = Fragments::new();
        let last = self.sections.len().saturating_sub(1);

        for (i, section) in self.sections.iter().enumerate() {
            for item in &section.body {
                let paragraph = match item {
                    Item::Paragraph(p) => p.clone(),
                    Item::Fragment(xml) => fragments.placeholder(xml.clone()),
                };
                docx = docx.add_paragraph(paragraph);
            }
            if i < last {
                docx = docx.add_paragraph(fragments.placeholder(xml::section_break(section.geometry)));
            } else {
                docx = docx
                    .page_size(
                        xml::twips(section.geometry.width) as u32,
                        xml::twips(section.geometry.height) as u32,
                    )
                    .page_margin(
                        PageMargin::new()
                            .top(0)
                            .right(0)
                            .bottom(0)
                            .left(0)
                            .header(0)
                            .footer(0)
                            .gutter(0),
                    );
            }
        }
        (docx, fragments)
    }
}

impl Default for DocxCanvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Paragraph spacing: none before or after, line height from `spacing`.
fn paragraph_spacing(spacing: LineSpacing) -> ParagraphSpacing {
    let (line, rule) = match spacing {
        LineSpacing::Multiple(m) => ((240.0 * m).round().max(1.0), LineSpacingType::Auto),
        LineSpacing::Exact(pt) => (xml::twips(pt).max(1) as f64, LineSpacingType::Exact),
    };
    ParagraphSpacing::new()
        .before(0)
        .after(0)
        .line(line as _)
        .line_rule(rule)
}

/// Runs for `text`, one per line, joined by line breaks.
fn text_runs(text: &str) -> Vec<Run> {
    let text = xml::sanitize_text(text);
    let mut runs = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            runs.push(Run::new().add_break(BreakType::TextWrapping));
        }
        runs.push(Run::new().add_text(line));
    }
    runs
}

impl Canvas for DocxCanvas {
    fn new_section(&mut self) -> Result<()> {
        let geometry = self.current()?.geometry;
        self.sections.push(Section::new(geometry));
        Ok(())
    }

    fn set_geometry(&mut self, geometry: PageGeometry) -> Result<()> {
        if !geometry.is_valid() {
            return Err(Error::Geometry(format!(
                "invalid page size {}x{}",
                geometry.width, geometry.height
            )));
        }
        self.current()?.geometry = geometry;
        Ok(())
    }

    fn add_text_box(&mut self, text_box: &TextBox) -> Result<()> {
        self.ensure_open()?;
        let id = self.next_shape_id();
        let content = xml::text_box_paragraphs(&text_box.text, &text_box.style);
        let drawing = xml::text_box(&text_box.rect, id, &content, text_box.border);
        self.push(Item::Fragment(xml::anchor_paragraph(&drawing)))
    }

    fn add_floating_image(&mut self, image: &PlacedImage) -> Result<()> {
        let rect = image.rect;
        let pic = self
            .picture(&image.path)?
            .size(xml::emu(rect.width) as u32, xml::emu(rect.height) as u32)
            .floating()
            .overlapping()
            .relative_from_h(RelativeFromHType::Page)
            .relative_from_v(RelativeFromVType::Page)
            .offset_x(xml::emu(rect.left) as i32)
            .offset_y(xml::emu(rect.top) as i32);
        let paragraph = Paragraph::new()
            .line_spacing(paragraph_spacing(LineSpacing::Exact(1.0)))
            .add_run(Run::new().add_image(pic));
        self.push(Item::Paragraph(paragraph))
    }

    fn add_inline_image(&mut self, image: &InlineImage) -> Result<()> {
        let pic = self.picture(&image.path)?.size(
            xml::emu(image.width.max(1.0)) as u32,
            xml::emu(image.height.max(1.0)) as u32,
        );
        self.push(Item::Paragraph(Paragraph::new().add_run(Run::new().add_image(pic))))
    }

    fn add_paragraph(&mut self, text: &str) -> Result<()> {
        let paragraph = text_runs(text)
            .into_iter()
            .fold(Paragraph::new(), |p, run| p.add_run(run));
        self.push(Item::Paragraph(paragraph))
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        self.ensure_open()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let (docx, fragments) = self.build();
        let file = File::create(path)?;
        package::write(docx, &fragments, BufWriter::new(file))?.flush()?;
        log::info!(
            "Wrote {} ({} sections, {} pictures, {} fragments)",
            path.display(),
            self.sections.len(),
            self.media.len(),
            fragments.len()
        );
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.sections.clear();
        self.media.clear();
        Ok(())
    }
}
