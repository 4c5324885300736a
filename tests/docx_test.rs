//! End-to-end tests writing real DOCX packages.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use pdf2word::{replay_file, Error, ReplayOptions};

fn read_part(docx: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(docx).unwrap()).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut out = String::new();
    part.read_to_string(&mut out).unwrap();
    out
}

fn part_names(docx: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(docx).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

const LAYOUT: &str = r#"{
    "pdf_info": [
        {
            "page_size": [612, 792],
            "para_blocks": [
                {"type": "title", "bbox": [50, 50, 300, 80], "lines": [{"spans": [{"type": "text", "content": "Abstract"}]}]},
                {
                    "type": "image",
                    "bbox": [50, 100, 250, 300],
                    "blocks": [{"type": "image_body", "bbox": [50, 100, 250, 300], "lines": [{"spans": [{"type": "image", "image_path": "fig1.png"}]}]}]
                }
            ]
        },
        {
            "page_size": [842, 595],
            "para_blocks": [
                {"type": "text", "bbox": [40, 40, 800, 80], "avg_size": 10.5, "lines": [{"spans": [{"type": "text", "content": "Body & <more>"}]}]},
                {
                    "type": "table",
                    "bbox": [40, 100, 800, 400],
                    "blocks": [
                        {"type": "table_caption", "lines": [{"spans": [{"type": "text", "content": "Table 1: Scores"}]}]},
                        {"type": "table_body", "lines": [{"spans": [{"type": "table", "image_path": "bogus.png"}]}]}
                    ]
                }
            ]
        }
    ]
}"#;

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let images = dir.join("images");
    fs::create_dir_all(&images).unwrap();
    image::RgbImage::new(2, 2).save(images.join("fig1.png")).unwrap();
    fs::write(images.join("bogus.png"), b"not really a picture").unwrap();

    let layout = dir.join("layout.json");
    fs::write(&layout, LAYOUT).unwrap();
    layout
}

#[test]
fn test_replay_file_writes_docx() {
    let dir = tempfile::tempdir().unwrap();
    let layout = write_fixture(dir.path());
    let output = dir.path().join("out").join("document.docx");

    let report = replay_file(&layout, &output, &ReplayOptions::default()).unwrap();
    assert_eq!(report.pages, 2);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.degraded, 1);
    assert!(output.is_file());

    let names = part_names(&output);
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/_rels/document.xml.rels",
        "docProps/core.xml",
        "docProps/app.xml",
    ] {
        assert!(names.iter().any(|n| n == part), "missing part {}", part);
    }
    assert!(names.iter().any(|n| n.starts_with("word/media/")));

    let document = read_part(&output, "word/document.xml");
    assert_eq!(document.matches("<w:sectPr").count(), 2);
    // first page ends with a portrait break, the last section is A4 landscape
    assert!(document.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));
    assert!(document.contains(r#"w:w="16840""#));
    assert!(document.contains(r#"w:h="11900""#));
    assert!(document.contains("Abstract"));
    assert!(document.contains("<w:b/>"));
    assert!(document.contains(r#"<w:sz w:val="24"/>"#));
    assert!(document.contains(r#"<w:sz w:val="21"/>"#));
    assert!(document.contains("Body &amp; &lt;more&gt;"));
    assert!(document.contains("<pic:pic"));
    assert!(document.contains(r#"relativeFrom="page""#));
    assert!(document.contains("[Table]"));
    assert!(document.contains("Caption: Table 1: Scores"));

    let rels = read_part(&output, "word/_rels/document.xml.rels");
    assert!(rels.contains("relationships/image"));
    assert!(rels.contains("media/"));
}

#[test]
fn test_bogus_table_image_degrades_to_text() {
    let dir = tempfile::tempdir().unwrap();
    let layout = write_fixture(dir.path());
    let output = dir.path().join("document.docx");

    let report = replay_file(&layout, &output, &ReplayOptions::default()).unwrap();
    let table = report
        .blocks
        .iter()
        .find(|b| b.kind == "table")
        .expect("table outcome");
    assert!(table.outcome.is_degraded());
    assert_eq!(part_names(&output).iter().filter(|n| n.starts_with("word/media/")).count(), 1);
}

#[test]
fn test_explicit_image_dir_overrides_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let layout = write_fixture(dir.path());
    let empty = dir.path().join("elsewhere");
    fs::create_dir_all(&empty).unwrap();
    let output = dir.path().join("document.docx");

    let report = replay_file(&layout, &output, &ReplayOptions::new().with_image_dir(&empty)).unwrap();
    let image = report.blocks.iter().find(|b| b.kind == "image").unwrap();
    assert!(image.outcome.is_skipped());
    assert!(!part_names(&output).iter().any(|n| n.starts_with("word/media/")));
}

#[test]
fn test_missing_layout_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("document.docx");
    let err = replay_file(dir.path().join("layout.json"), &output, &ReplayOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::InputMissing(_)));
    assert!(!output.exists());
}

#[test]
fn test_empty_layout_still_produces_a_document() {
    let dir = tempfile::tempdir().unwrap();
    let layout = dir.path().join("layout.json");
    fs::write(&layout, r#"{"pdf_info": []}"#).unwrap();
    let output = dir.path().join("document.docx");

    let report = replay_file(&layout, &output, &ReplayOptions::default()).unwrap();
    assert_eq!(report.pages, 0);
    let document = read_part(&output, "word/document.xml");
    assert_eq!(document.matches("<w:sectPr").count(), 1);
}

/// True for characters XML 1.0 does not allow in a document.
fn is_illegal_xml_char(c: char) -> bool {
    (c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{FFFE}' || c == '\u{FFFF}'
}

#[test]
fn test_control_characters_never_reach_the_package() {
    let dir = tempfile::tempdir().unwrap();
    let layout = dir.path().join("layout.json");
    fs::write(
        &layout,
        r#"{
            "pdf_info": [{
                "page_size": [612, 792],
                "para_blocks": [
                    {"type": "text", "bbox": [50, 50, 300, 80], "lines": [{"spans": [{"type": "text", "content": "bad\u0001char\u000cff"}]}]},
                    {"type": "text", "lines": [{"spans": [{"type": "text", "content": "loose\u0000text\u001f\uffff"}]}]}
                ]
            }]
        }"#,
    )
    .unwrap();
    let output = dir.path().join("document.docx");

    let report = replay_file(&layout, &output, &ReplayOptions::default()).unwrap();
    assert_eq!(report.inserted + report.degraded, 2);

    let document = read_part(&output, "word/document.xml");
    assert!(!document.chars().any(is_illegal_xml_char));
    assert!(document.contains("bad char ff"));
    assert!(document.contains("loose text"));
}
