//! WebP encoding for still stickers.

use anyhow::{anyhow, Result};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView};

/// Encode `img` as lossy WebP at `quality` (0-100).
pub fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Bytes> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(anyhow!("Cannot encode an empty {}x{} image", width, height));
    }

    // Convert to RGBA for WebP encoding
    let rgba_img = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode(quality.clamp(0.0, 100.0));

    Ok(Bytes::copy_from_slice(&webp_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    #[test]
    fn test_encode_produces_riff_webp() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 255])));
        let data = encode_webp(&img, 80.0).unwrap();

        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WEBP");
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::WebP);
    }
}
