//! Flat span-size dump produced by the low-level text extractor.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A run of text carrying a single font size.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizedSpan {
    #[serde(default)]
    pub text: String,

    /// Font size in points; 0 when unknown
    #[serde(default)]
    pub size: f64,
}

impl SizedSpan {
    pub fn new(text: impl Into<String>, size: f64) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }
}

/// `{"pages": [{"blocks": [{"lines": [{"spans": [...]}]}]}]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpanDump {
    #[serde(default)]
    pub pages: Vec<DumpPage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DumpPage {
    #[serde(default)]
    pub blocks: Vec<DumpBlock>,
}

/// Image blocks of the extractor have no `lines`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DumpBlock {
    #[serde(default)]
    pub lines: Option<Vec<DumpLine>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DumpLine {
    #[serde(default)]
    pub spans: Vec<SizedSpan>,
}

impl SpanDump {
    /// Load a span dump file; a missing file is [`Error::InputMissing`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InputMissing(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// All spans in reading order, pages concatenated.
    pub fn into_spans(self) -> Vec<SizedSpan> {
        self.pages
            .into_iter()
            .flat_map(|page| page.blocks)
            .filter_map(|block| block.lines)
            .flatten()
            .flat_map(|line| line.spans)
            .collect()
    }
}
