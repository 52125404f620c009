use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_ELLIPSE_HEIGHT_RATIO;

/// Binary mask, shape = (height, width). `true` pixels contribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    data: Array2<bool>,
}

impl Mask {
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            data: Array2::from_elem((height, width), true),
        }
    }

    pub fn from_array(data: Array2<bool>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[[y, x]]
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Ellipse height as a fraction of the cell height.
    #[serde(default = "default_ellipse_height_ratio")]
    pub ellipse_height_ratio: f64,
}

fn default_ellipse_height_ratio() -> f64 {
    DEFAULT_ELLIPSE_HEIGHT_RATIO
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            ellipse_height_ratio: DEFAULT_ELLIPSE_HEIGHT_RATIO,
        }
    }
}

impl MaskConfig {
    pub fn mask_for(&self, width: usize, height: usize) -> Mask {
        ellipse_mask(width, height, self.ellipse_height_ratio)
    }
}

/// Filled axis-aligned ellipse centered in a `width` x `height` cell.
///
/// The ellipse spans the full width and `height_ratio` of the height, which
/// keeps the round piece body and drops the cell corners. A pixel is set when
/// its center lies inside the ellipse.
pub fn ellipse_mask(width: usize, height: usize, height_ratio: f64) -> Mask {
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let a = width as f64 / 2.0;
    let b = height as f64 * height_ratio / 2.0;

    if a <= 0.0 || b <= 0.0 {
        return Mask {
            data: Array2::from_elem((height, width), false),
        };
    }

    let data = Array2::from_shape_fn((height, width), |(row, col)| {
        let dx = (col as f64 + 0.5 - cx) / a;
        let dy = (row as f64 + 0.5 - cy) / b;
        dx * dx + dy * dy <= 1.0
    });
    Mask { data }
}
