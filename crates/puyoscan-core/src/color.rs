use ndarray::{Array3, ArrayView1, ArrayViewMut1, Axis, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Result, ScanError};
use crate::frame::{ColorSpace, Frame, FrameView};

/// Convert pixel data from `from` to `to`.
///
/// `from` is taken as the interpretation of the source bytes, which allows
/// reinterpreting a buffer whose tag is wrong. The source channel count must
/// match `from`. RGBA cannot go straight to HSV; collapse to RGB first.
pub fn convert_color_space(view: &FrameView, from: ColorSpace, to: ColorSpace) -> Result<Frame> {
    let actual = view.channels();
    if actual != from.channels() {
        return Err(ScanError::InvalidChannelCount {
            color_space: from.to_string(),
            expected: from.channels(),
            actual,
        });
    }

    let convert: fn(ArrayView1<u8>, ArrayViewMut1<u8>) = match (from, to) {
        (a, b) if a == b => copy_pixel,
        (ColorSpace::Rgba, ColorSpace::Rgb) => copy_pixel,
        (ColorSpace::Rgb, ColorSpace::Rgba) => rgb_to_rgba_pixel,
        (ColorSpace::Rgb, ColorSpace::Hsv) => rgb_to_hsv_pixel,
        (ColorSpace::Hsv, ColorSpace::Rgb) => hsv_to_rgb_pixel,
        _ => {
            return Err(ScanError::UnsupportedConversion {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    };

    let src = view.data();
    let (h, w, _) = src.dim();
    let mut out = Array3::<u8>::zeros((h, w, to.channels()));

    let zip = Zip::from(out.lanes_mut(Axis(2))).and(src.lanes(Axis(2)));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(|dst, px| convert(px, dst));
    } else {
        zip.for_each(|dst, px| convert(px, dst));
    }

    Frame::new(out, to)
}

impl Frame {
    /// Convert using this frame's own color-space tag.
    pub fn convert_to(&self, to: ColorSpace) -> Result<Frame> {
        convert_color_space(&self.view(), self.color_space(), to)
    }

    /// Bring any supported frame into HSV, collapsing alpha first.
    pub fn to_hsv(&self) -> Result<Frame> {
        match self.color_space() {
            ColorSpace::Hsv => Ok(self.clone()),
            ColorSpace::Rgb => self.convert_to(ColorSpace::Hsv),
            ColorSpace::Rgba => self.convert_to(ColorSpace::Rgb)?.convert_to(ColorSpace::Hsv),
        }
    }
}

fn copy_pixel(src: ArrayView1<u8>, mut dst: ArrayViewMut1<u8>) {
    let n = dst.len();
    for c in 0..n {
        dst[c] = src[c];
    }
}

fn rgb_to_rgba_pixel(src: ArrayView1<u8>, mut dst: ArrayViewMut1<u8>) {
    dst[0] = src[0];
    dst[1] = src[1];
    dst[2] = src[2];
    dst[3] = u8::MAX;
}

fn rgb_to_hsv_pixel(src: ArrayView1<u8>, mut dst: ArrayViewMut1<u8>) {
    let [h, s, v] = rgb_to_hsv([src[0], src[1], src[2]]);
    dst[0] = h;
    dst[1] = s;
    dst[2] = v;
}

fn hsv_to_rgb_pixel(src: ArrayView1<u8>, mut dst: ArrayViewMut1<u8>) {
    let [r, g, b] = hsv_to_rgb([src[0], src[1], src[2]]);
    dst[0] = r;
    dst[1] = g;
    dst[2] = b;
}

/// 8-bit RGB to 8-bit HSV (hue halved into [0, 180)).
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(f32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let mut hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let mut h = (hue / 2.0).round();
    if h >= 180.0 {
        h -= 180.0;
    }

    [h as u8, s.round() as u8, max as u8]
}

/// 8-bit HSV (hue in [0, 180)) back to 8-bit RGB.
pub fn hsv_to_rgb(hsv: [u8; 3]) -> [u8; 3] {
    let h = f32::from(hsv[0]) * 2.0;
    let s = f32::from(hsv[1]) / 255.0;
    let v = f32::from(hsv[2]) / 255.0;

    let c = v * s;
    let sector = (h / 60.0) % 6.0;
    let x = c * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r, g, b].map(|ch| ((ch + m) * 255.0).round().clamp(0.0, 255.0) as u8)
}
