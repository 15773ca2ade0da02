use image::{ImageError, Rgb, RgbImage};
use raypool_core::{Color, Image};
use std::path::Path;

pub fn to_rgb_image(image: &Image) -> RgbImage {
    let mut out = RgbImage::new(image.width(), image.height());
    for (x, y, color) in image.pixels_row_major() {
        out.put_pixel(x, y, to_rgb(color));
    }
    out
}

/// Encodes `image` with the format implied by the extension of `path`.
pub fn save_image(path: &Path, image: &Image) -> Result<(), ImageError> {
    to_rgb_image(image).save(path)
}

fn to_rgb(color: Color) -> Rgb<u8> {
    let c = color.clamp01();
    Rgb([
        (c.r * 255.0).round() as u8,
        (c.g * 255.0).round() as u8,
        (c.b * 255.0).round() as u8,
    ])
}
