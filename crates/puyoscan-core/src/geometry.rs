use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Slack (in pixels) allowed when checking that one rect lies inside another.
/// Grid edges accumulate a few ULPs of error after repeated division.
const CONTAINMENT_TOLERANCE: f64 = 1e-6;

/// A rectangle in pixel units. Components may be fractional; cropping
/// truncates them to the integer pixel grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectData", into = "RectData")]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Unvalidated wire form of [`Rect`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RectData {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl TryFrom<RectData> for Rect {
    type Error = ScanError;

    fn try_from(data: RectData) -> Result<Self> {
        Rect::new(data.x, data.y, data.width, data.height)
    }
}

impl From<Rect> for RectData {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl Rect {
    /// Build a rect, rejecting negative or non-finite components.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        for (name, v) in [("x", x), ("y", y), ("width", width), ("height", height)] {
            if !v.is_finite() || v < 0.0 {
                return Err(ScanError::InvalidGeometry(format!(
                    "rect {name} must be finite and non-negative, got {v}"
                )));
            }
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Rect covering a whole `width` x `height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::from_pixels(0, 0, width, height)
    }

    /// Rect on the integer pixel grid.
    pub fn from_pixels(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
            width: width as f64,
            height: height as f64,
        }
    }

    /// Build a rect that must lie inside `parent`.
    pub fn within(parent: &Rect, x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        let rect = Self::new(x, y, width, height)?;
        if !rect.contained_in(parent) {
            return Err(ScanError::InvalidGeometry(format!(
                "rect ({x},{y} {width}x{height}) is not contained in ({},{} {}x{})",
                parent.x, parent.y, parent.width, parent.height
            )));
        }
        Ok(rect)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn contained_in(&self, parent: &Rect) -> bool {
        self.x >= parent.x - CONTAINMENT_TOLERANCE
            && self.y >= parent.y - CONTAINMENT_TOLERANCE
            && self.right() <= parent.right() + CONTAINMENT_TOLERANCE
            && self.bottom() <= parent.bottom() + CONTAINMENT_TOLERANCE
    }

    /// Area shared by two rects (zero when they only touch).
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// Truncate every component toward zero onto the integer pixel grid.
    pub fn pixel_bounds(&self) -> PixelRect {
        PixelRect {
            x: self.x as usize,
            y: self.y as usize,
            width: self.width as usize,
            height: self.height as usize,
        }
    }
}

/// Integer pixel rectangle produced by truncating a [`Rect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn fits(&self, width: usize, height: usize) -> bool {
        self.x + self.width <= width && self.y + self.height <= height
    }
}

/// A rect expressed as fractions of a parent rect's width and height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FractionalRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FractionalRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !(in_unit(self.x) && in_unit(self.y) && in_unit(self.width) && in_unit(self.height)) {
            return Err(ScanError::InvalidGeometry(format!(
                "fractional rect components must lie in [0, 1]: {self:?}"
            )));
        }
        if self.x + self.width > 1.0 + CONTAINMENT_TOLERANCE
            || self.y + self.height > 1.0 + CONTAINMENT_TOLERANCE
        {
            return Err(ScanError::InvalidGeometry(format!(
                "fractional rect extends past its parent: {self:?}"
            )));
        }
        Ok(())
    }

    /// Map onto `parent`: origin = parent origin + fraction * parent size.
    pub fn resolve(&self, parent: &Rect) -> Result<Rect> {
        self.validate()?;
        Rect::within(
            parent,
            parent.x + parent.width * self.x,
            parent.y + parent.height * self.y,
            parent.width * self.width,
            parent.height * self.height,
        )
    }
}

/// Split `parent` into a `cols` x `rows` grid of uniform cells.
///
/// The result has shape `(cols, rows)` and is indexed `[[x, y]]`. Cell edges
/// are left fractional.
pub fn subdivide_grid(parent: &Rect, cols: usize, rows: usize) -> Result<Array2<Rect>> {
    if cols == 0 || rows == 0 {
        return Err(ScanError::InvalidGeometry(format!(
            "grid must have at least one column and row, got {cols}x{rows}"
        )));
    }

    let cell_width = parent.width / cols as f64;
    let cell_height = parent.height / rows as f64;

    Ok(Array2::from_shape_fn((cols, rows), |(x, y)| Rect {
        x: parent.x + x as f64 * cell_width,
        y: parent.y + y as f64 * cell_height,
        width: cell_width,
        height: cell_height,
    }))
}
