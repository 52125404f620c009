use crate::color::rgb_to_hsv;
use crate::error::Result;
use crate::frame::{ColorSpace, Frame};
use crate::geometry::Rect;
use crate::layout::PlayerFields;

/// Outline color for cell and digit rects.
pub const OUTLINE_RGB: [u8; 3] = [255, 0, 0];

fn pixel_for(space: ColorSpace, rgb: [u8; 3]) -> Vec<u8> {
    match space {
        ColorSpace::Rgb => rgb.to_vec(),
        ColorSpace::Rgba => vec![rgb[0], rgb[1], rgb[2], u8::MAX],
        ColorSpace::Hsv => rgb_to_hsv(rgb).to_vec(),
    }
}

/// Draw a 1-pixel outline along the inside edge of `rect`.
pub fn draw_rect_outline(frame: &mut Frame, rect: &Rect, rgb: [u8; 3]) -> Result<()> {
    let pixel = pixel_for(frame.color_space(), rgb);
    let mut view = frame.crop_mut(rect)?;
    let (w, h) = (view.width(), view.height());
    if w == 0 || h == 0 {
        return Ok(());
    }

    for x in 0..w {
        view.set_pixel(x, 0, &pixel)?;
        view.set_pixel(x, h - 1, &pixel)?;
    }
    for y in 0..h {
        view.set_pixel(0, y, &pixel)?;
        view.set_pixel(w - 1, y, &pixel)?;
    }
    Ok(())
}

/// Outline every cell and score digit of a player.
///
/// Takes the frame mutably, so it can only run once every view used for
/// histogramming has been dropped.
pub fn draw_player_regions(frame: &mut Frame, fields: &PlayerFields, rgb: [u8; 3]) -> Result<()> {
    for rect in fields.cells.iter().chain(&fields.score_digits) {
        draw_rect_outline(frame, rect, rgb)?;
    }
    Ok(())
}
