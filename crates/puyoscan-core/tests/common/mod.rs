use puyoscan_core::frame::{ColorSpace, Frame};
use puyoscan_core::geometry::Rect;
use puyoscan_core::histogram::Histogram;
use puyoscan_core::profile::{ColorLabel, ColorProfile, SwatchLayout};

/// Opaque black, used as screen and calibration background.
pub const BACKGROUND: [u8; 3] = [0, 0, 0];

/// Solid swatch color per label. Each lands in a distinct joint HSV bin.
pub fn label_rgb(label: ColorLabel) -> [u8; 3] {
    match label {
        ColorLabel::Red => [220, 30, 30],
        ColorLabel::Green => [30, 200, 40],
        ColorLabel::Blue => [40, 60, 220],
        ColorLabel::Yellow => [230, 210, 30],
        ColorLabel::Purple => [150, 40, 200],
        ColorLabel::Garbage => [200, 200, 200],
    }
}

pub fn rgba(rgb: [u8; 3]) -> [u8; 4] {
    [rgb[0], rgb[1], rgb[2], 255]
}

/// RGBA frame filled with the background color.
pub fn blank_rgba(width: usize, height: usize) -> Frame {
    Frame::filled(width, height, ColorSpace::Rgba, &rgba(BACKGROUND)).unwrap()
}

/// Paint `rect` of an RGBA frame with a solid color.
pub fn fill_rect(frame: &mut Frame, rect: &Rect, rgb: [u8; 3]) {
    frame.crop_mut(rect).unwrap().fill(&rgba(rgb)).unwrap();
}

/// Calibration image with every swatch of the default layout painted in its
/// label's solid color on a black background.
pub fn calibration_image() -> Frame {
    let layout = SwatchLayout::default();
    let width = layout.pitch * (layout.garbage_column + layout.garbage_samples);
    let height = layout.pitch * 5;
    let mut frame = blank_rgba(width, height);
    for label in ColorLabel::ALL {
        for rect in layout.swatches(label) {
            fill_rect(&mut frame, &rect, label_rgb(label));
        }
    }
    frame
}

/// Histogram with `value` in bin `index` and zero elsewhere.
pub fn one_hot(len: usize, index: usize, value: f32) -> Histogram {
    let mut bins = vec![0.0; len];
    bins[index] = value;
    Histogram::new(bins)
}

/// Profile whose label `i` reference has all of its mass in bin `i`.
pub fn one_hot_profile(len: usize) -> ColorProfile {
    ColorProfile::from_vec(
        ColorLabel::ALL
            .iter()
            .map(|label| one_hot(len, label.index(), 100.0))
            .collect(),
    )
    .unwrap()
}
