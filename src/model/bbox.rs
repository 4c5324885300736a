//! Rectangles and page sizes in PDF point space.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// A `[x0, y0, x1, y1]` rectangle, origin at the top-left of the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box (may be negative for malformed input).
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the box (may be negative for malformed input).
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Check that every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Coordinates as an array.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

impl From<[f64; 4]> for BBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl Serialize for BBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_coords(&self.to_array(), serializer)
    }
}

impl<'de> Deserialize<'de> for BBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Vec::<f64>::deserialize(deserializer)?;
        match v.as_slice() {
            [x0, y0, x1, y1] => Ok(BBox::new(*x0, *y0, *x1, *y1)),
            _ => Err(de::Error::invalid_length(v.len(), &"a [x0, y0, x1, y1] array")),
        }
    }
}

/// Page dimensions `[width, height]` in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// US Letter, used when a page carries no size.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

impl Serialize for PageSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_coords(&[self.width, self.height], serializer)
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Vec::<f64>::deserialize(deserializer)?;
        match v.as_slice() {
            [w, h] => Ok(PageSize::new(*w, *h)),
            _ => Err(de::Error::invalid_length(v.len(), &"a [width, height] array")),
        }
    }
}

/// Integral coordinates are written back as integers so that re-serialised
/// layouts keep the producer's number shape.
fn serialize_coords<S: Serializer>(coords: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(coords.len()))?;
    for &c in coords {
        if c.fract() == 0.0 && c.abs() < 9.0e15 {
            seq.serialize_element(&(c as i64))?;
        } else {
            seq.serialize_element(&c)?;
        }
    }
    seq.end()
}
