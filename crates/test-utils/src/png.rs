//! Helpers for inspecting rendered PNG output.

use image::RgbaImage;
use std::collections::HashSet;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Decode PNG bytes into an RGBA image, panicking on invalid data.
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .expect("output should be a valid PNG")
        .to_rgba8()
}

/// RGBA value of the pixel at `(x, y)`.
pub fn pixel_at(img: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
    img.get_pixel(x, y).0
}

/// Number of distinct RGBA values in an image.
pub fn count_unique_colors(img: &RgbaImage) -> usize {
    img.pixels().map(|p| p.0).collect::<HashSet<_>>().len()
}

/// Whether any pixel in the image has exactly this RGBA value.
pub fn contains_color(img: &RgbaImage, rgba: [u8; 4]) -> bool {
    img.pixels().any(|p| p.0 == rgba)
}
