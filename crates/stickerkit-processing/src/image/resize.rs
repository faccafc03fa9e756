use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Pick a resampling filter from how far the image is scaled on its worst axis.
    ///
    /// Heavy downscales use the cheap triangle filter; near-1:1 and upscales
    /// get Lanczos.
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Stretch to exactly `size`×`size`, ignoring the source aspect ratio.
    pub fn stretch_square(img: &DynamicImage, size: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if orig_width == size && orig_height == size {
            return img.clone();
        }
        let filter = Self::select_filter(orig_width, orig_height, size, size);
        img.resize_exact(size, size, filter)
    }
}
