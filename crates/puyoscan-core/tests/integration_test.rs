#[allow(dead_code)]
mod common;

use approx::assert_relative_eq;

use puyoscan_core::consts::{FIELD_COLS, FIELD_ROWS, SCORE_DIGITS};
use puyoscan_core::frame::{ColorSpace, Frame};
use puyoscan_core::histogram::{HistogramConfig, MaskConfig};
use puyoscan_core::io::image_io::{load_frame, save_png};
use puyoscan_core::layout::Player;
use puyoscan_core::overlay::{draw_player_regions, OUTLINE_RGB};
use puyoscan_core::pipeline::{AnalyzerConfig, FieldAnalyzer};
use puyoscan_core::profile::{build_profile, ColorLabel, ColorProfile, ProfileSet, SwatchLayout};
use puyoscan_core::region::RegionKind;

use common::*;

fn calibrated_profile() -> ColorProfile {
    build_profile(
        &calibration_image(),
        &SwatchLayout::default(),
        &HistogramConfig::default(),
        &MaskConfig::default(),
    )
    .unwrap()
}

fn analyzer() -> FieldAnalyzer {
    let mut profiles = ProfileSet::new();
    profiles.insert("puyo_aqua", calibrated_profile());
    FieldAnalyzer::new(AnalyzerConfig::default(), &profiles).unwrap()
}

#[test]
fn test_single_red_piece_on_blank_screen() {
    let analyzer = analyzer();
    let mut frame = blank_rgba(960, 540);

    let fields = analyzer.locate(&frame, Player::ONE).unwrap();
    fill_rect(&mut frame, &fields.cells[[0, 0]], label_rgb(ColorLabel::Red));

    let analysis = analyzer.analyze(&frame, Player::ONE).unwrap();
    assert_eq!(analysis.cells.dim(), (FIELD_COLS, FIELD_ROWS));

    let top_left = analysis.get(0, 0);
    assert_eq!(top_left.label, Some(ColorLabel::Red));
    assert_relative_eq!(top_left.confidence, 1.0, epsilon = 1e-6);

    let below = analysis.get(0, 1);
    assert_eq!(below.label, None);
    assert!(below.confidence <= AnalyzerConfig::default().threshold);

    assert_eq!(analysis.occupied(), 1);
    let rows = analysis.matrix().to_rows();
    assert_eq!(rows[0], "000000");
    assert_eq!(rows[1], "R00000");
    assert!(rows[2..].iter().all(|r| r == "000000"));
}

#[test]
fn test_every_label_is_recognized_in_place() {
    let analyzer = analyzer();
    let mut frame = blank_rgba(1920, 1080);

    let fields = analyzer.locate(&frame, Player::TWO).unwrap();
    for (x, label) in ColorLabel::ALL.into_iter().enumerate() {
        fill_rect(&mut frame, &fields.cells[[x, FIELD_ROWS - 1]], label_rgb(label));
    }

    let analysis = analyzer.analyze(&frame, Player::TWO).unwrap();
    for (x, label) in ColorLabel::ALL.into_iter().enumerate() {
        assert_eq!(analysis.get(x, FIELD_ROWS - 1).label, Some(label));
    }
    assert_eq!(analysis.occupied(), ColorLabel::COUNT);
    assert_eq!(analysis.matrix().to_rows()[FIELD_ROWS], "RGBYPJ");

    // Player one's field is still empty.
    let other = analyzer.analyze(&frame, Player::ONE).unwrap();
    assert_eq!(other.occupied(), 0);
}

#[test]
fn test_color_space_of_input_does_not_matter() {
    let analyzer = analyzer();
    let mut frame = blank_rgba(960, 540);
    let fields = analyzer.locate(&frame, Player::ONE).unwrap();
    fill_rect(&mut frame, &fields.cells[[2, 5]], label_rgb(ColorLabel::Green));

    let rgb = frame.convert_to(ColorSpace::Rgb).unwrap();
    let hsv = frame.to_hsv().unwrap();

    let a = analyzer.analyze(&frame, Player::ONE).unwrap();
    let b = analyzer.analyze(&rgb, Player::ONE).unwrap();
    let c = analyzer.analyze(&hsv, Player::ONE).unwrap();
    assert_eq!(a.matrix(), b.matrix());
    assert_eq!(a.matrix(), c.matrix());
    assert_eq!(a.get(2, 5).label, Some(ColorLabel::Green));
}

#[test]
fn test_regions_cover_field_and_score() {
    let analyzer = analyzer();
    let frame = blank_rgba(960, 540);
    let fields = analyzer.locate(&frame, Player::ONE).unwrap();

    let regions = fields.regions(frame.view());
    assert_eq!(regions.len(), 1 + FIELD_COLS * FIELD_ROWS + 1 + SCORE_DIGITS);
    assert_eq!(regions[0].kind, RegionKind::Field);
    assert_eq!(regions[1].kind, RegionKind::Cell { x: 0, y: 0 });
    assert_eq!(
        regions.last().map(|r| r.kind),
        Some(RegionKind::ScoreDigit(SCORE_DIGITS - 1))
    );
    for region in &regions {
        let view = region.view().unwrap();
        assert!(!view.is_empty(), "{} is empty", region.kind);
    }
}

#[test]
fn test_profile_survives_json_round_trip() {
    let profile = calibrated_profile();
    let mut set = ProfileSet::new();
    set.insert("puyo_aqua", profile.clone());

    let reloaded = ProfileSet::from_json_str(&set.to_json_string().unwrap()).unwrap();
    assert_eq!(reloaded.get("puyo_aqua").unwrap(), &profile);
}

#[test]
fn test_overlay_after_analysis() {
    let analyzer = analyzer();
    let mut frame = blank_rgba(960, 540);
    let analysis = analyzer.analyze(&frame, Player::ONE).unwrap();

    draw_player_regions(&mut frame, &analysis.fields, OUTLINE_RGB).unwrap();

    let px = analysis.fields.cells[[0, 0]].pixel_bounds();
    let data = frame.data();
    assert_eq!(
        [data[[px.y, px.x, 0]], data[[px.y, px.x, 1]], data[[px.y, px.x, 2]]],
        OUTLINE_RGB
    );
    // Cell interiors stay untouched.
    let (cx, cy) = (px.x + px.width / 2, px.y + px.height / 2);
    assert_eq!(data[[cy, cx, 0]], 0);
}

#[test]
fn test_png_round_trip() {
    let mut frame = blank_rgba(64, 32);
    fill_rect(
        &mut frame,
        &puyoscan_core::geometry::Rect::from_pixels(8, 4, 16, 8),
        label_rgb(ColorLabel::Purple),
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    save_png(&frame, &path).unwrap();

    let loaded: Frame = load_frame(&path).unwrap();
    assert_eq!(loaded.color_space(), ColorSpace::Rgba);
    assert_eq!(loaded, frame);
}
