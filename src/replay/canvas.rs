//! Output canvas abstraction.

use super::{InlineImage, PlacedImage, TextBox};
use crate::error::Result;
use crate::geometry::PageGeometry;
use std::path::Path;

/// A paged document being built by the replay engine.
///
/// The canvas starts with one open section. The replayer calls
/// [`Canvas::new_section`] before every page after the first, so element
/// calls always target the most recently opened section. Implementations may
/// fail any call; the replayer contains those failures per block.
pub trait Canvas {
    /// Close the current section and open a new one on a fresh page.
    fn new_section(&mut self) -> Result<()>;

    /// Set the current section's page size; margins are zero.
    fn set_geometry(&mut self, geometry: PageGeometry) -> Result<()>;

    /// Add a text box anchored to the current page.
    fn add_text_box(&mut self, text_box: &TextBox) -> Result<()>;

    /// Add a picture anchored to the current page.
    fn add_floating_image(&mut self, image: &PlacedImage) -> Result<()>;

    /// Add a picture in its own paragraph.
    fn add_inline_image(&mut self, image: &InlineImage) -> Result<()>;

    /// Add a plain paragraph.
    fn add_paragraph(&mut self, text: &str) -> Result<()>;

    /// Write the document to `path`.
    fn save(&mut self, path: &Path) -> Result<()>;

    /// Release the document. Called once on every terminal path.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
