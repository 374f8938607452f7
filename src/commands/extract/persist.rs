use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};

/// Flatten any color mode to opaque RGB over a white backing. JPEG has
/// no alpha channel, so transparent regions must render as white rather
/// than black.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        let blend =
            |channel: u8| ((u16::from(channel) * alpha + 255 * (255 - alpha)) / 255) as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    rgb
}

/// Encode the raster as lossy JPEG at the given quality and write it to
/// `path`. Returns the number of bytes written.
pub fn persist_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<u64> {
    let rgb = flatten_onto_white(image);

    let mut encoded = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut encoded, quality);
    encoder
        .encode_image(&rgb)
        .with_context(|| format!("failed to encode image: {}", path.display()))?;

    fs::write(path, &encoded)
        .with_context(|| format!("failed to write image: {}", path.display()))?;

    Ok(encoded.len() as u64)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn transparent_pixels_flatten_to_white() {
        let mut rgba = image::RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 255]));

        let rgb = flatten_onto_white(&DynamicImage::ImageRgba8(rgba));

        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(1, 0).0, [10, 20, 30]);
    }

    #[test]
    fn semi_transparent_pixels_blend_toward_white() {
        let mut rgba = image::RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 128]));

        let rgb = flatten_onto_white(&DynamicImage::ImageRgba8(rgba));
        let [r, g, b] = rgb.get_pixel(0, 0).0;

        assert_eq!(r, g);
        assert_eq!(g, b);
        assert!(r > 120 && r < 132);
    }

    #[test]
    fn opaque_rgb_input_round_trips_through_flattening() {
        let mut source = RgbImage::new(2, 2);
        for (index, pixel) in source.pixels_mut().enumerate() {
            *pixel = Rgb([index as u8 * 40, 100, 200]);
        }

        let flattened = flatten_onto_white(&DynamicImage::ImageRgb8(source.clone()));
        assert_eq!(flattened, source);
    }

    #[test]
    fn persisted_file_has_no_alpha_and_reports_written_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DHP484_p001_i00.jpg");

        let mut rgba = image::RgbaImage::new(8, 8);
        for pixel in rgba.pixels_mut() {
            *pixel = Rgba([200, 50, 50, 0]);
        }

        let bytes = persist_jpeg(&DynamicImage::ImageRgba8(rgba), &path, 85).unwrap();
        assert_eq!(bytes, fs::metadata(&path).unwrap().len());

        let reloaded = image::open(&path).unwrap();
        assert!(!reloaded.color().has_alpha());
        // Fully transparent source renders as (near-)white after the
        // lossy round trip.
        let rgb = reloaded.to_rgb8();
        let [r, g, b] = rgb.get_pixel(4, 4).0;
        assert!(r > 245 && g > 245 && b > 245);
    }
}
