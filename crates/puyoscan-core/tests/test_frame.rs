#[allow(dead_code)]
mod common;

use ndarray::Array3;

use puyoscan_core::color::{convert_color_space, hsv_to_rgb, rgb_to_hsv};
use puyoscan_core::error::ScanError;
use puyoscan_core::frame::{ColorSpace, Frame};
use puyoscan_core::geometry::Rect;

use common::*;

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn test_frame_rejects_wrong_channel_count() {
    let data = Array3::<u8>::zeros((4, 4, 3));
    let err = Frame::new(data, ColorSpace::Rgba).unwrap_err();
    assert!(matches!(
        err,
        ScanError::InvalidChannelCount {
            expected: 4,
            actual: 3,
            ..
        }
    ));
}

#[test]
fn test_from_raw_checks_buffer_length() {
    assert!(Frame::from_raw(2, 2, ColorSpace::Rgb, vec![0; 12]).is_ok());
    assert!(matches!(
        Frame::from_raw(2, 2, ColorSpace::Rgb, vec![0; 11]),
        Err(ScanError::InvalidGeometry(_))
    ));
}

#[test]
fn test_from_raw_is_row_major() {
    let pixels: Vec<u8> = (0..2 * 3 * 3).map(|v| v as u8).collect();
    let frame = Frame::from_raw(3, 2, ColorSpace::Rgb, pixels).unwrap();
    assert_eq!((frame.width(), frame.height(), frame.channels()), (3, 2, 3));
    // Pixel (x=1, y=1) starts at byte (1 * 3 + 1) * 3.
    assert_eq!(frame.data()[[1, 1, 0]], 12);
}

// ---------------------------------------------------------------------------
// Crop
// ---------------------------------------------------------------------------

#[test]
fn test_crop_shares_storage_with_parent() {
    let mut frame = blank_rgba(20, 10);
    let rect = Rect::from_pixels(4, 2, 5, 3);
    fill_rect(&mut frame, &rect, [10, 20, 30]);

    let view = frame.crop(&rect).unwrap();
    assert_eq!((view.width(), view.height()), (5, 3));
    assert!(view
        .data()
        .lanes(ndarray::Axis(2))
        .into_iter()
        .all(|px| px.to_vec() == vec![10, 20, 30, 255]));

    // Outside the rect the parent is untouched.
    assert_eq!(frame.data()[[2, 3, 0]], 0);
    assert_eq!(frame.data()[[1, 4, 0]], 0);
    assert_eq!(frame.data()[[2, 4, 0]], 10);
    assert_eq!(frame.data()[[4, 8, 2]], 30);
}

#[test]
fn test_nested_crop_is_relative_to_view() {
    let mut frame = blank_rgba(20, 20);
    fill_rect(&mut frame, &Rect::from_pixels(7, 9, 1, 1), [99, 0, 0]);

    let outer = frame.crop(&Rect::from_pixels(5, 5, 10, 10)).unwrap();
    let inner = outer.crop(&Rect::from_pixels(2, 4, 3, 3)).unwrap();
    assert_eq!(inner.data()[[0, 0, 0]], 99);
}

#[test]
fn test_crop_truncates_fractional_rect() {
    let frame = blank_rgba(100, 100);
    let view = frame.crop(&Rect::new(10.9, 3.2, 31.99, 29.925).unwrap()).unwrap();
    assert_eq!((view.width(), view.height()), (31, 29));
}

#[test]
fn test_crop_out_of_bounds() {
    let frame = blank_rgba(100, 50);
    let err = frame
        .crop(&Rect::from_pixels(90, 10, 20, 10))
        .unwrap_err();
    assert!(matches!(
        err,
        ScanError::OutOfBounds {
            x: 90,
            width: 20,
            bound_width: 100,
            ..
        }
    ));

    assert!(frame.crop(&Rect::full(100, 50)).is_ok());
}

#[test]
fn test_crop_to_zero_area_is_allowed() {
    let frame = blank_rgba(10, 10);
    let view = frame.crop(&Rect::new(3.0, 3.0, 0.5, 4.0).unwrap()).unwrap();
    assert!(view.is_empty());
}

#[test]
fn test_set_pixel_checks_bounds_and_channels() {
    let mut frame = blank_rgba(10, 10);
    let mut view = frame.crop_mut(&Rect::from_pixels(2, 2, 4, 4)).unwrap();
    assert!(view.set_pixel(3, 3, &[1, 2, 3, 4]).is_ok());
    assert!(matches!(
        view.set_pixel(4, 0, &[1, 2, 3, 4]),
        Err(ScanError::OutOfBounds { .. })
    ));
    assert!(matches!(
        view.set_pixel(0, 0, &[1, 2, 3]),
        Err(ScanError::InvalidChannelCount { .. })
    ));
    assert_eq!(frame.data()[[5, 5, 3]], 4);
}

// ---------------------------------------------------------------------------
// Color conversion
// ---------------------------------------------------------------------------

#[test]
fn test_rgb_to_hsv_primaries() {
    assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
    assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
    assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
    assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
    assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
}

#[test]
fn test_hue_stays_below_180() {
    // Hue just under 360 degrees rounds to 180 and wraps to 0.
    let [h, _, _] = rgb_to_hsv([255, 0, 1]);
    assert!(h < 180);
}

#[test]
fn test_hsv_to_rgb_primaries() {
    assert_eq!(hsv_to_rgb([0, 255, 255]), [255, 0, 0]);
    assert_eq!(hsv_to_rgb([60, 255, 255]), [0, 255, 0]);
    assert_eq!(hsv_to_rgb([120, 255, 255]), [0, 0, 255]);
    assert_eq!(hsv_to_rgb([0, 0, 128]), [128, 128, 128]);
}

#[test]
fn test_to_hsv_from_rgba_drops_alpha() {
    let frame = Frame::filled(4, 3, ColorSpace::Rgba, &[0, 255, 0, 17]).unwrap();
    let hsv = frame.to_hsv().unwrap();
    assert_eq!(hsv.color_space(), ColorSpace::Hsv);
    assert_eq!(hsv.channels(), 3);
    assert_eq!((hsv.width(), hsv.height()), (4, 3));
    assert!(hsv.data().iter().copied().collect::<Vec<_>>().chunks(3).all(|px| px == [60, 255, 255]));
}

#[test]
fn test_convert_on_view_only_touches_view() {
    let mut frame = blank_rgba(8, 8);
    fill_rect(&mut frame, &Rect::from_pixels(0, 0, 2, 2), [0, 0, 255]);
    let view = frame.crop(&Rect::from_pixels(0, 0, 2, 2)).unwrap();
    let rgb = convert_color_space(&view, ColorSpace::Rgba, ColorSpace::Rgb).unwrap();
    let hsv = rgb.convert_to(ColorSpace::Hsv).unwrap();
    assert_eq!((hsv.width(), hsv.height()), (2, 2));
    assert_eq!(hsv.data()[[1, 1, 0]], 120);
}

#[test]
fn test_rgba_to_hsv_directly_is_unsupported() {
    let frame = blank_rgba(2, 2);
    let err = convert_color_space(&frame.view(), ColorSpace::Rgba, ColorSpace::Hsv).unwrap_err();
    assert!(matches!(err, ScanError::UnsupportedConversion { .. }));
}

#[test]
fn test_convert_checks_source_channels() {
    let frame = blank_rgba(2, 2);
    let err = convert_color_space(&frame.view(), ColorSpace::Rgb, ColorSpace::Hsv).unwrap_err();
    assert!(matches!(
        err,
        ScanError::InvalidChannelCount {
            expected: 3,
            actual: 4,
            ..
        }
    ));
}

#[test]
fn test_large_frame_conversion_matches_pixelwise() {
    // Big enough to take the parallel path.
    let frame = Frame::filled(300, 300, ColorSpace::Rgb, &[220, 30, 30]).unwrap();
    let hsv = frame.convert_to(ColorSpace::Hsv).unwrap();
    let expected = rgb_to_hsv([220, 30, 30]);
    assert_eq!(hsv.data()[[0, 0, 0]], expected[0]);
    assert_eq!(hsv.data()[[299, 299, 1]], expected[1]);
    assert_eq!(hsv.data()[[150, 7, 2]], expected[2]);
}
