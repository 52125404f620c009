use std::path::Path;

use image::{ImageFormat, RgbImage, RgbaImage};

use crate::error::{Result, ScanError};
use crate::frame::{ColorSpace, Frame};

/// Wrap a decoded RGBA image as a frame.
pub fn frame_from_rgba_image(img: RgbaImage) -> Result<Frame> {
    let (w, h) = img.dimensions();
    Frame::from_raw(w as usize, h as usize, ColorSpace::Rgba, img.into_raw())
}

/// Load any image format the `image` crate understands as an RGBA frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    frame_from_rgba_image(img.to_rgba8())
}

/// Encode a frame as an RGB image. HSV frames are converted back first.
pub fn frame_to_rgb_image(frame: &Frame) -> Result<RgbImage> {
    let rgb = match frame.color_space() {
        ColorSpace::Rgb => frame.clone(),
        _ => frame.convert_to(ColorSpace::Rgb)?,
    };
    let (w, h) = (rgb.width() as u32, rgb.height() as u32);
    let pixels: Vec<u8> = rgb.data().iter().copied().collect();

    RgbImage::from_raw(w, h, pixels).ok_or_else(|| {
        ScanError::InvalidGeometry(format!("pixel buffer does not match {w}x{h}"))
    })
}

/// Save a frame as 8-bit RGB PNG.
pub fn save_png(frame: &Frame, path: &Path) -> Result<()> {
    frame_to_rgb_image(frame)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
