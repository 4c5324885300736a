//! Document-level types and JSON persistence.

use super::Page;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Structural layout of a whole document (`{"pdf_info": [...]}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Pages in document order
    #[serde(default)]
    pub pdf_info: Vec<Page>,

    /// Fields this crate does not interpret (`_backend`, `_version_name`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LayoutDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a layout JSON file.
    ///
    /// A missing file is reported as [`Error::InputMissing`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InputMissing(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse a layout from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize with 4-space indentation and unescaped UTF-8.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| Error::Other(e.to_string()))
    }

    /// Write the layout to a file, creating parent directories as needed.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pdf_info.len()
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pdf_info.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pdf_info.is_empty()
    }
}
