//! Packing the built document and splicing hand-written fragments into it.
//!
//! Fragments the builder cannot express are stood in for by a marker
//! paragraph. After `docx-rs` has written the package, every marker
//! paragraph in `word/document.xml` is replaced by its fragment and the
//! archive is copied to the output.

use crate::error::{Error, Result};
use docx_rs::{Docx, Paragraph, Run};
use std::io::{Cursor, Read, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const DOCUMENT_PART: &str = "word/document.xml";
const MARKER_PREFIX: &str = "PDF2WORD-FRAGMENT-";
const PARAGRAPH_END: &str = "</w:p>";

/// Hand-written paragraphs waiting to be spliced in, in document order.
#[derive(Debug, Default)]
pub(crate) struct Fragments {
    xml: Vec<String>,
}

impl Fragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment and return the paragraph that stands in for it.
    pub fn placeholder(&mut self, xml: String) -> Paragraph {
        let marker = marker(self.xml.len());
        self.xml.push(xml);
        Paragraph::new().add_run(Run::new().add_text(marker))
    }

    pub fn len(&self) -> usize {
        self.xml.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xml.is_empty()
    }

    /// Replace each marker paragraph of `document` with its fragment.
    pub fn splice(&self, document: &str) -> Result<String> {
        let extra: usize = self.xml.iter().map(String::len).sum();
        let mut out = String::with_capacity(document.len() + extra);
        let mut rest = document;

        for (i, xml) in self.xml.iter().enumerate() {
            let marker = marker(i);
            let missing = || Error::Render(format!("fragment {} lost while packing", i));
            let at = rest.find(&marker).ok_or_else(missing)?;
            let start = paragraph_start(&rest[..at]).ok_or_else(missing)?;
            let end = rest[at..]
                .find(PARAGRAPH_END)
                .map(|e| at + e + PARAGRAPH_END.len())
                .ok_or_else(missing)?;
            out.push_str(&rest[..start]);
            out.push_str(xml);
            rest = &rest[end..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn marker(i: usize) -> String {
    format!("{}{:08}", MARKER_PREFIX, i)
}

/// Offset of the last `<w:p>` or `<w:p ...>` open tag in `head`.
fn paragraph_start(head: &str) -> Option<usize> {
    [head.rfind("<w:p "), head.rfind("<w:p>")]
        .into_iter()
        .flatten()
        .max()
}

/// Write `docx` to `writer` with `fragments` spliced into the main part.
pub(crate) fn write<W: Write + Seek>(docx: Docx, fragments: &Fragments, writer: W) -> Result<W> {
    let mut packed = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut packed)
        .map_err(|e| Error::Archive(e.to_string()))?;
    packed.set_position(0);

    let mut archive = ZipArchive::new(packed)?;
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;

        if name == DOCUMENT_PART && !fragments.is_empty() {
            let document = String::from_utf8(data)
                .map_err(|e| Error::Archive(format!("{} is not UTF-8: {}", name, e)))?;
            data = fragments.splice(&document)?.into_bytes();
        }

        zip.start_file(name, options)?;
        zip.write_all(&data)?;
    }

    Ok(zip.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_replaces_whole_marker_paragraph() {
        let mut fragments = Fragments::new();
        fragments.placeholder("<w:p>ONE</w:p>".to_string());
        fragments.placeholder("<w:p>TWO</w:p>".to_string());

        let document = format!(
            concat!(
                r#"<w:body><w:p w14:paraId="1"><w:pPr><w:rPr /></w:pPr><w:r><w:t>before</w:t></w:r></w:p>"#,
                r#"<w:p w14:paraId="2"><w:pPr /><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                r#"<w:p><w:r><w:t>{}</w:t></w:r></w:p><w:sectPr /></w:body>"#
            ),
            marker(0),
            marker(1)
        );
        let out = fragments.splice(&document).unwrap();
        assert_eq!(
            out,
            concat!(
                r#"<w:body><w:p w14:paraId="1"><w:pPr><w:rPr /></w:pPr><w:r><w:t>before</w:t></w:r></w:p>"#,
                r#"<w:p>ONE</w:p><w:p>TWO</w:p><w:sectPr /></w:body>"#
            )
        );
    }

    #[test]
    fn test_splice_reports_lost_marker() {
        let mut fragments = Fragments::new();
        fragments.placeholder("<w:p/>".to_string());
        assert!(matches!(fragments.splice("<w:body/>"), Err(Error::Render(_))));
    }

    #[test]
    fn test_write_keeps_builder_parts() {
        let mut fragments = Fragments::new();
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("kept")))
            .add_paragraph(fragments.placeholder("<w:p><w:r><w:t>spliced</w:t></w:r></w:p>".to_string()));

        let cursor = write(docx, &fragments, Cursor::new(Vec::new())).unwrap();
        let mut archive = ZipArchive::new(cursor).unwrap();
        assert!(archive.by_name("[Content_Types].xml").is_ok());
        assert!(archive.by_name("word/_rels/document.xml.rels").is_ok());

        let mut document = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();
        assert!(document.contains("kept"));
        assert!(document.contains("<w:p><w:r><w:t>spliced</w:t></w:r></w:p>"));
        assert!(!document.contains(MARKER_PREFIX));
    }
}
