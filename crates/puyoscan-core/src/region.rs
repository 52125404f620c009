use std::fmt;

use ndarray::Array2;
use serde::Serialize;

use crate::error::Result;
use crate::frame::FrameView;
use crate::geometry::Rect;
use crate::layout::PlayerFields;

/// What a region stands for on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RegionKind {
    Field,
    Cell { x: usize, y: usize },
    ScoreArea,
    ScoreDigit(usize),
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => write!(f, "field"),
            Self::Cell { x, y } => write!(f, "cell ({x},{y})"),
            Self::ScoreArea => write!(f, "score area"),
            Self::ScoreDigit(i) => write!(f, "score digit {i}"),
        }
    }
}

/// A named rect over a borrowed frame. The pixel view is cropped on demand
/// and shares the frame's storage, so regions cannot outlive their frame.
#[derive(Clone, Copy, Debug)]
pub struct Region<'a> {
    pub kind: RegionKind,
    pub rect: Rect,
    parent: FrameView<'a>,
}

impl<'a> Region<'a> {
    pub fn new(kind: RegionKind, rect: Rect, parent: FrameView<'a>) -> Self {
        Self { kind, rect, parent }
    }

    pub fn view(&self) -> Result<FrameView<'a>> {
        self.parent.crop(&self.rect)
    }
}

impl PlayerFields {
    /// Cell regions over `frame`, shaped like [`PlayerFields::cells`].
    pub fn cell_regions<'a>(&self, frame: FrameView<'a>) -> Array2<Region<'a>> {
        Array2::from_shape_fn(self.cells.dim(), |(x, y)| {
            Region::new(RegionKind::Cell { x, y }, self.cells[[x, y]], frame)
        })
    }

    /// Every region of this player over `frame`: field, cells, score area, digits.
    pub fn regions<'a>(&self, frame: FrameView<'a>) -> Vec<Region<'a>> {
        let mut regions = Vec::with_capacity(self.cells.len() + self.score_digits.len() + 2);
        regions.push(Region::new(RegionKind::Field, self.field, frame));
        regions.extend(self.cell_regions(frame).iter().copied());
        regions.push(Region::new(RegionKind::ScoreArea, self.score_area, frame));
        regions.extend(
            self.score_digits
                .iter()
                .enumerate()
                .map(|(i, rect)| Region::new(RegionKind::ScoreDigit(i), *rect, frame)),
        );
        regions
    }
}
