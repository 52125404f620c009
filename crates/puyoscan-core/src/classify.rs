use std::fmt;

use ndarray::Array2;
use rayon::prelude::*;
use serde::Serialize;

use crate::consts::{FIELD_HIDDEN_ROWS, PARALLEL_CELL_THRESHOLD};
use crate::error::{Result, ScanError};
use crate::histogram::{similarity, Histogram};
use crate::profile::{ColorLabel, ColorProfile};

/// Code written for an empty cell in a [`FieldMatrix`].
pub const EMPTY_CODE: char = '0';

/// Outcome for one cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    /// `None` when every label was rejected.
    pub label: Option<ColorLabel>,
    /// Best similarity, or the mean similarity for an empty cell.
    pub confidence: f64,
    /// Similarity to each label, in [`ColorLabel::ALL`] order.
    pub similarities: [f64; ColorLabel::COUNT],
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
    }

    pub fn code(&self) -> char {
        self.label.map_or(EMPTY_CODE, ColorLabel::code)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(label) => write!(f, "{label} ({:.3})", self.confidence),
            None => write!(f, "none ({:.3})", self.confidence),
        }
    }
}

pub(crate) fn check_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ScanError::InvalidHistogramConfig(format!(
            "threshold must lie in [0, 1], got {threshold}"
        )));
    }
    Ok(())
}

/// Classify one cell histogram against every label of `profile`.
///
/// When no similarity exceeds `threshold` the cell is empty. Otherwise the
/// most similar label wins; equal scores go to the label listed first in
/// [`ColorLabel::ALL`]. A threshold outside [0, 1], NaN included, is an error.
pub fn classify_cell(
    histogram: &Histogram,
    profile: &ColorProfile,
    threshold: f64,
) -> Result<Classification> {
    check_threshold(threshold)?;
    let mut similarities = [0.0; ColorLabel::COUNT];
    for (label, reference) in profile.iter() {
        similarities[label.index()] = similarity(histogram, reference)?;
    }

    if similarities.iter().all(|&s| s <= threshold) {
        let mean = similarities.iter().sum::<f64>() / ColorLabel::COUNT as f64;
        return Ok(Classification {
            label: None,
            confidence: mean,
            similarities,
        });
    }

    let mut best = 0;
    for i in 1..ColorLabel::COUNT {
        if similarities[i] > similarities[best] {
            best = i;
        }
    }

    Ok(Classification {
        label: Some(ColorLabel::ALL[best]),
        confidence: similarities[best],
        similarities,
    })
}

/// Classify every cell independently. The output has the same shape as `cells`.
pub fn classify_field(
    cells: &Array2<Histogram>,
    profile: &ColorProfile,
    threshold: f64,
) -> Result<Array2<Classification>> {
    check_threshold(threshold)?;
    let flat: Vec<&Histogram> = cells.iter().collect();

    let results: Vec<Classification> = if flat.len() >= PARALLEL_CELL_THRESHOLD {
        flat.par_iter()
            .map(|hist| classify_cell(hist, profile, threshold))
            .collect::<Result<_>>()?
    } else {
        flat.iter()
            .map(|hist| classify_cell(hist, profile, threshold))
            .collect::<Result<_>>()?
    };

    Array2::from_shape_vec(cells.raw_dim(), results)
        .map_err(|e| ScanError::InvalidGeometry(e.to_string()))
}

/// Classified field as a code matrix: one hidden row on top of the visible
/// rows, `R G B Y P J` for pieces and `0` for empty cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldMatrix {
    /// Shape `(cols, hidden + rows)`, indexed `[[x, y]]` with y = 0 at the top.
    codes: Array2<char>,
}

impl FieldMatrix {
    pub fn from_grid(grid: &Array2<Classification>) -> Self {
        let (cols, rows) = grid.dim();
        let codes = Array2::from_shape_fn((cols, rows + FIELD_HIDDEN_ROWS), |(x, y)| {
            if y < FIELD_HIDDEN_ROWS {
                EMPTY_CODE
            } else {
                grid[[x, y - FIELD_HIDDEN_ROWS]].code()
            }
        });
        Self { codes }
    }

    pub fn cols(&self) -> usize {
        self.codes.nrows()
    }

    pub fn rows(&self) -> usize {
        self.codes.ncols()
    }

    pub fn get(&self, x: usize, y: usize) -> char {
        self.codes[[x, y]]
    }

    /// Rows from top to bottom, each read left to right.
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.rows())
            .map(|y| (0..self.cols()).map(|x| self.codes[[x, y]]).collect())
            .collect()
    }
}

impl fmt::Display for FieldMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
