use approx::assert_relative_eq;

use puyoscan_core::consts::{FIELD_COLS, FIELD_ROWS, SCORE_DIGITS};
use puyoscan_core::error::ScanError;
use puyoscan_core::geometry::{subdivide_grid, FractionalRect, Rect};
use puyoscan_core::layout::{player_fields, LayoutTable, Player};

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

#[test]
fn test_rect_rejects_negative_and_nan() {
    assert!(matches!(
        Rect::new(-1.0, 0.0, 10.0, 10.0),
        Err(ScanError::InvalidGeometry(_))
    ));
    assert!(matches!(
        Rect::new(0.0, 0.0, f64::NAN, 10.0),
        Err(ScanError::InvalidGeometry(_))
    ));
}

#[test]
fn test_rect_deserialize_validates() {
    let ok: Rect = serde_json::from_str(r#"{"x":1.5,"y":2,"width":3,"height":4}"#).unwrap();
    assert_eq!(ok, Rect::new(1.5, 2.0, 3.0, 4.0).unwrap());

    let bad = serde_json::from_str::<Rect>(r#"{"x":-1,"y":2,"width":3,"height":4}"#);
    assert!(bad.is_err());
}

#[test]
fn test_rect_within_checks_containment() {
    let parent = Rect::full(100, 50);
    assert!(Rect::within(&parent, 10.0, 10.0, 90.0, 40.0).is_ok());
    assert!(matches!(
        Rect::within(&parent, 10.0, 10.0, 91.0, 40.0),
        Err(ScanError::InvalidGeometry(_))
    ));
}

#[test]
fn test_pixel_bounds_truncate() {
    let px = Rect::new(10.9, 3.2, 31.99, 29.925).unwrap().pixel_bounds();
    assert_eq!((px.x, px.y, px.width, px.height), (10, 3, 31, 29));
}

// ---------------------------------------------------------------------------
// subdivide_grid
// ---------------------------------------------------------------------------

#[test]
fn test_subdivide_partitions_parent() {
    let parents = [
        Rect::new(0.0, 0.0, 384.0, 718.2).unwrap(),
        Rect::new(280.32, 159.84, 384.0, 718.2).unwrap(),
        Rect::new(7.0, 3.0, 13.0, 11.0).unwrap(),
    ];
    for parent in &parents {
        for (cols, rows) in [(6, 12), (8, 1), (1, 1), (5, 7)] {
            let grid = subdivide_grid(parent, cols, rows).unwrap();
            assert_eq!(grid.dim(), (cols, rows));
            assert_eq!(grid.len(), cols * rows);

            let total: f64 = grid.iter().map(Rect::area).sum();
            assert_relative_eq!(total, parent.area(), max_relative = 1e-9);

            let cells: Vec<&Rect> = grid.iter().collect();
            for (i, a) in cells.iter().enumerate() {
                assert!(a.contained_in(parent));
                for b in &cells[i + 1..] {
                    assert!(
                        a.overlap_area(b) < 1e-9,
                        "cells {a:?} and {b:?} overlap"
                    );
                }
            }
        }
    }
}

#[test]
fn test_subdivide_origins_are_uniform_offsets() {
    let parent = Rect::new(100.0, 50.0, 60.0, 120.0).unwrap();
    let grid = subdivide_grid(&parent, 6, 12).unwrap();

    let cell = grid[[3, 7]];
    assert_relative_eq!(cell.x(), 130.0);
    assert_relative_eq!(cell.y(), 120.0);
    assert_relative_eq!(cell.width(), 10.0);
    assert_relative_eq!(cell.height(), 10.0);
}

#[test]
fn test_subdivide_keeps_fractional_edges() {
    let parent = Rect::new(0.0, 0.0, 100.0, 10.0).unwrap();
    let grid = subdivide_grid(&parent, 3, 1).unwrap();
    assert_relative_eq!(grid[[1, 0]].x(), 100.0 / 3.0);
    assert_relative_eq!(grid[[1, 0]].width(), 100.0 / 3.0);
}

#[test]
fn test_subdivide_is_deterministic() {
    let parent = Rect::new(280.32, 159.84, 384.0, 718.2).unwrap();
    let a = subdivide_grid(&parent, 6, 12).unwrap();
    let b = subdivide_grid(&parent, 6, 12).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_subdivide_rejects_zero_dimensions() {
    let parent = Rect::full(10, 10);
    assert!(matches!(
        subdivide_grid(&parent, 0, 12),
        Err(ScanError::InvalidGeometry(_))
    ));
    assert!(matches!(
        subdivide_grid(&parent, 6, 0),
        Err(ScanError::InvalidGeometry(_))
    ));
}

// ---------------------------------------------------------------------------
// FractionalRect / layout
// ---------------------------------------------------------------------------

#[test]
fn test_fractional_rect_resolves_against_parent() {
    let screen = Rect::new(10.0, 20.0, 1920.0, 1080.0).unwrap();
    let field = FractionalRect::new(0.146, 0.148, 0.2, 0.665)
        .resolve(&screen)
        .unwrap();
    assert_relative_eq!(field.x(), 10.0 + 1920.0 * 0.146);
    assert_relative_eq!(field.y(), 20.0 + 1080.0 * 0.148);
    assert_relative_eq!(field.width(), 384.0);
    assert_relative_eq!(field.height(), 1080.0 * 0.665);
}

#[test]
fn test_fractional_rect_rejects_overflow() {
    let screen = Rect::full(100, 100);
    assert!(FractionalRect::new(0.9, 0.0, 0.2, 0.5).resolve(&screen).is_err());
    assert!(FractionalRect::new(-0.1, 0.0, 0.2, 0.5).resolve(&screen).is_err());
}

#[test]
fn test_player_fields_shape_and_containment() {
    let screen = Rect::full(1920, 1080);
    let layout = LayoutTable::default();

    for player in [Player::ONE, Player::TWO] {
        let fields = player_fields(&screen, &layout, player).unwrap();
        assert_eq!(fields.player, player);
        assert_eq!(fields.cells.dim(), (FIELD_COLS, FIELD_ROWS));
        assert_eq!(fields.score_digits.len(), SCORE_DIGITS);

        assert!(fields.field.contained_in(&screen));
        assert!(fields.score_area.contained_in(&screen));
        for cell in fields.cells.iter() {
            assert!(cell.contained_in(&fields.field));
        }
        for digit in &fields.score_digits {
            assert!(digit.contained_in(&fields.score_area));
            assert_relative_eq!(digit.height(), fields.score_area.height());
        }
    }
}

#[test]
fn test_player_one_field_matches_layout_table() {
    let screen = Rect::full(1920, 1080);
    let fields = player_fields(&screen, &LayoutTable::default(), Player::ONE).unwrap();

    assert_relative_eq!(fields.field.x(), 1920.0 * 0.146);
    assert_relative_eq!(fields.field.y(), 1080.0 * 0.148);
    assert_relative_eq!(fields.field.right(), 1920.0 * (0.146 + 0.2), epsilon = 1e-9);
    assert_relative_eq!(fields.field.bottom(), 1080.0 * (0.148 + 0.665), epsilon = 1e-9);

    let first = fields.cells[[0, 0]];
    assert_relative_eq!(first.x(), fields.field.x());
    assert_relative_eq!(first.width(), 1920.0 * 0.2 / 6.0);
}

#[test]
fn test_player_two_mirrors_player_one() {
    let screen = Rect::full(1920, 1080);
    let layout = LayoutTable::default();
    let p1 = player_fields(&screen, &layout, Player::ONE).unwrap();
    let p2 = player_fields(&screen, &layout, Player::TWO).unwrap();

    assert_relative_eq!(p1.field.x(), 1920.0 - p2.field.right(), epsilon = 1e-6);
    assert_relative_eq!(p1.field.y(), p2.field.y());
    assert_relative_eq!(
        p1.score_area.x(),
        1920.0 - p2.score_area.right(),
        epsilon = 1e-6
    );
}

#[test]
fn test_unknown_player_is_rejected() {
    let screen = Rect::full(1920, 1080);
    let err = player_fields(&screen, &LayoutTable::default(), Player(3)).unwrap_err();
    assert!(matches!(err, ScanError::InvalidGeometry(_)));
}

#[test]
fn test_custom_layout_slot() {
    let mut layout = LayoutTable::default();
    layout.players.push(puyoscan_core::layout::PlayerLayout {
        player: Player(3),
        field: FractionalRect::new(0.0, 0.0, 0.5, 0.5),
        score: FractionalRect::new(0.5, 0.5, 0.5, 0.1),
    });
    let fields = player_fields(&Rect::full(600, 1200), &layout, Player(3)).unwrap();
    assert_relative_eq!(fields.cells[[5, 11]].right(), 300.0);
    assert_relative_eq!(fields.cells[[5, 11]].bottom(), 600.0);
}

#[test]
fn test_duplicate_player_slot_is_rejected() {
    let mut layout = LayoutTable::default();
    layout.players.push(puyoscan_core::layout::PlayerLayout {
        player: Player::ONE,
        field: FractionalRect::new(0.5, 0.148, 0.2, 0.665),
        score: FractionalRect::new(0.5, 0.817, 0.169, 0.056),
    });
    let screen = Rect::full(1920, 1080);
    assert!(matches!(
        player_fields(&screen, &layout, Player::ONE),
        Err(ScanError::InvalidGeometry(_))
    ));
    assert!(player_fields(&screen, &layout, Player::TWO).is_ok());
    assert!(matches!(
        layout.validate(),
        Err(ScanError::InvalidGeometry(_))
    ));
    assert!(LayoutTable::default().validate().is_ok());
}
