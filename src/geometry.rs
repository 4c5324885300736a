//! Page geometry and coordinate mapping.
//!
//! Layout producers emit block boxes either relative to their own page or in
//! a single coordinate space where pages are stacked vertically. Which one a
//! layout uses is a configuration choice ([`CoordinateMode`]); the replay
//! engine never guesses.

use crate::model::{BBox, LayoutDocument, Page};

/// How block boxes relate to their page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoordinateMode {
    /// Boxes are already page-relative and are used unchanged
    #[default]
    AsIs,
    /// Boxes are in a stacked multi-page space and are shifted by the page's
    /// vertical offset, then clamped to the page
    PageRelative,
}

/// Canvas geometry of one page, in points. Margins are always zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Geometry declared by a page (Letter when absent).
    pub fn for_page(page: &Page) -> Self {
        let size = page.size();
        Self::new(size.width, size.height)
    }

    /// Check that both dimensions are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Convert a stacked-space box to this page's space, assuming every page
    /// before `page_index` has this page's height.
    pub fn to_page_relative(&self, bbox: BBox, page_index: usize) -> BBox {
        self.relative_to_offset(bbox, page_index as f64 * self.height)
    }

    /// Shift a box up by `y_start` and clamp it into the page.
    pub fn relative_to_offset(&self, bbox: BBox, y_start: f64) -> BBox {
        self.clamp(BBox::new(bbox.x0, bbox.y0 - y_start, bbox.x1, bbox.y1 - y_start))
    }

    /// Clamp a box into `[0, width] x [0, height]` with `x1 >= x0` and `y1 >= y0`.
    pub fn clamp(&self, bbox: BBox) -> BBox {
        let x0 = bbox.x0.max(0.0).min(self.width);
        let y0 = bbox.y0.max(0.0).min(self.height);
        let x1 = bbox.x1.min(self.width).max(x0);
        let y1 = bbox.y1.min(self.height).max(y0);
        BBox::new(x0, y0, x1, y1)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::new(612.0, 792.0)
    }
}

/// Maps block boxes onto their page canvas for a whole document.
///
/// Page offsets in [`CoordinateMode::PageRelative`] are the running sum of the
/// preceding pages' own heights, so mixed page sizes are handled.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    mode: CoordinateMode,
    geometries: Vec<PageGeometry>,
    offsets: Vec<f64>,
}

impl CoordinateMapper {
    pub fn new(doc: &LayoutDocument, mode: CoordinateMode) -> Self {
        let geometries: Vec<PageGeometry> = doc.pdf_info.iter().map(PageGeometry::for_page).collect();
        let mut offsets = Vec::with_capacity(geometries.len());
        let mut y = 0.0;
        for g in &geometries {
            offsets.push(y);
            y += g.height;
        }
        Self {
            mode,
            geometries,
            offsets,
        }
    }

    pub fn mode(&self) -> CoordinateMode {
        self.mode
    }

    /// Geometry of page `page_index` (Letter when out of range).
    pub fn geometry(&self, page_index: usize) -> PageGeometry {
        self.geometries.get(page_index).copied().unwrap_or_default()
    }

    /// Vertical offset of page `page_index` in stacked space.
    pub fn page_offset(&self, page_index: usize) -> f64 {
        self.offsets.get(page_index).copied().unwrap_or(0.0)
    }

    /// Box to use on the canvas of page `page_index`.
    pub fn map(&self, bbox: BBox, page_index: usize) -> BBox {
        match self.mode {
            CoordinateMode::AsIs => bbox,
            CoordinateMode::PageRelative => self
                .geometry(page_index)
                .relative_to_offset(bbox, self.page_offset(page_index)),
        }
    }
}
