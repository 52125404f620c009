use ndarray::Array2;
use serde::Serialize;

use crate::classify::{Classification, FieldMatrix};
use crate::geometry::Rect;
use crate::layout::{Player, PlayerFields};

/// Result of analyzing one player's field in one frame.
#[derive(Clone, Debug, Serialize)]
pub struct FieldAnalysis {
    pub player: Player,
    /// Game screen the layout was resolved against.
    pub screen: Rect,
    /// Region geometry, for callers drawing overlays.
    pub fields: PlayerFields,
    /// Shape `(cols, rows)`, indexed `[[x, y]]` with y = 0 at the top.
    pub cells: Array2<Classification>,
}

impl FieldAnalysis {
    pub fn get(&self, x: usize, y: usize) -> &Classification {
        &self.cells[[x, y]]
    }

    pub fn matrix(&self) -> FieldMatrix {
        FieldMatrix::from_grid(&self.cells)
    }

    /// Number of cells holding a piece.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}
