use std::fmt;

use ndarray::{s, Array3, ArrayView3, ArrayViewMut3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::geometry::{PixelRect, Rect};

/// Color space of a pixel buffer. Tracked explicitly on every frame and view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    Rgba,
    Rgb,
    /// 8-bit HSV: hue in [0, 180), saturation and value in [0, 255].
    Hsv,
}

impl ColorSpace {
    pub fn channels(self) -> usize {
        match self {
            Self::Rgba => 4,
            Self::Rgb | Self::Hsv => 3,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgba => write!(f, "RGBA"),
            Self::Rgb => write!(f, "RGB"),
            Self::Hsv => write!(f, "HSV"),
        }
    }
}

fn check_channels(color_space: ColorSpace, actual: usize) -> Result<()> {
    let expected = color_space.channels();
    if actual != expected {
        return Err(ScanError::InvalidChannelCount {
            color_space: color_space.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Truncate `rect` to pixels and check it fits a `width` x `height` buffer.
fn checked_bounds(rect: &Rect, width: usize, height: usize) -> Result<PixelRect> {
    let px = rect.pixel_bounds();
    if !px.fits(width, height) {
        return Err(ScanError::OutOfBounds {
            x: px.x,
            y: px.y,
            width: px.width,
            height: px.height,
            bound_width: width,
            bound_height: height,
        });
    }
    Ok(px)
}

/// An owned 8-bit image. Pixel data is row-major, shape = (height, width, channels).
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Array3<u8>,
    color_space: ColorSpace,
}

impl Frame {
    pub fn new(data: Array3<u8>, color_space: ColorSpace) -> Result<Self> {
        check_channels(color_space, data.dim().2)?;
        Ok(Self { data, color_space })
    }

    /// Wrap an interleaved pixel buffer.
    pub fn from_raw(
        width: usize,
        height: usize,
        color_space: ColorSpace,
        pixels: Vec<u8>,
    ) -> Result<Self> {
        let channels = color_space.channels();
        let expected = width * height * channels;
        if pixels.len() != expected {
            return Err(ScanError::InvalidGeometry(format!(
                "buffer of {} bytes does not hold {width}x{height}x{channels} pixels",
                pixels.len()
            )));
        }
        let data = Array3::from_shape_vec((height, width, channels), pixels)
            .map_err(|e| ScanError::InvalidGeometry(e.to_string()))?;
        Ok(Self { data, color_space })
    }

    /// A frame with every pixel set to `pixel`.
    pub fn filled(
        width: usize,
        height: usize,
        color_space: ColorSpace,
        pixel: &[u8],
    ) -> Result<Self> {
        check_channels(color_space, pixel.len())?;
        let data = Array3::from_shape_fn((height, width, pixel.len()), |(_, _, c)| pixel[c]);
        Ok(Self { data, color_space })
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    /// Rect covering the whole frame.
    pub fn bounds(&self) -> Rect {
        Rect::full(self.width(), self.height())
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            data: self.data.view(),
            color_space: self.color_space,
        }
    }

    pub fn view_mut(&mut self) -> FrameViewMut<'_> {
        FrameViewMut {
            data: self.data.view_mut(),
            color_space: self.color_space,
        }
    }

    /// Borrow a sub-region without copying.
    pub fn crop(&self, rect: &Rect) -> Result<FrameView<'_>> {
        self.view().crop(rect)
    }

    /// Mutably borrow a sub-region; writes land in this frame.
    pub fn crop_mut(&mut self, rect: &Rect) -> Result<FrameViewMut<'_>> {
        self.view_mut().crop(rect)
    }
}

/// Read-only window into a frame's pixel storage.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    data: ArrayView3<'a, u8>,
    color_space: ColorSpace,
}

impl<'a> FrameView<'a> {
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn data(&self) -> ArrayView3<'a, u8> {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Crop relative to this view's top-left corner. The result aliases the
    /// same storage and lives as long as the parent frame.
    pub fn crop(&self, rect: &Rect) -> Result<FrameView<'a>> {
        let px = checked_bounds(rect, self.width(), self.height())?;
        let data = self
            .data
            .slice_move(s![px.y..px.y + px.height, px.x..px.x + px.width, ..]);
        Ok(FrameView {
            data,
            color_space: self.color_space,
        })
    }
}

/// Mutable window into a frame's pixel storage.
#[derive(Debug)]
pub struct FrameViewMut<'a> {
    data: ArrayViewMut3<'a, u8>,
    color_space: ColorSpace,
}

impl<'a> FrameViewMut<'a> {
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Narrow this view to `rect` (relative to its top-left corner).
    pub fn crop(self, rect: &Rect) -> Result<FrameViewMut<'a>> {
        let px = checked_bounds(rect, self.width(), self.height())?;
        let data = self
            .data
            .slice_move(s![px.y..px.y + px.height, px.x..px.x + px.width, ..]);
        Ok(FrameViewMut {
            data,
            color_space: self.color_space,
        })
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: &[u8]) -> Result<()> {
        check_channels(self.color_space, pixel.len())?;
        if x >= self.width() || y >= self.height() {
            return Err(ScanError::OutOfBounds {
                x,
                y,
                width: 1,
                height: 1,
                bound_width: self.width(),
                bound_height: self.height(),
            });
        }
        for (c, &v) in pixel.iter().enumerate() {
            self.data[[y, x, c]] = v;
        }
        Ok(())
    }

    pub fn fill(&mut self, pixel: &[u8]) -> Result<()> {
        check_channels(self.color_space, pixel.len())?;
        for mut px in self.data.lanes_mut(ndarray::Axis(2)) {
            for (c, &v) in pixel.iter().enumerate() {
                px[c] = v;
            }
        }
        Ok(())
    }
}
