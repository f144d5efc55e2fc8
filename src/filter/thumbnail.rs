//! Cover-scale and crop to exact dimensions.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::FilterError;
use crate::filter::{Filter, Gravity};

/// Scales the image so it covers `width` x `height`, then crops the
/// excess at the configured gravity, yielding exact output dimensions.
#[derive(Debug)]
pub struct Thumbnail {
    width: u32,
    height: u32,
    gravity: Gravity,
}

impl Thumbnail {
    pub fn new(width: u32, height: u32, gravity: Gravity) -> Self {
        Self {
            width,
            height,
            gravity,
        }
    }
}

impl Filter for Thumbnail {
    fn name(&self) -> &'static str {
        "thumbnail"
    }

    fn apply(&self, img: DynamicImage) -> Result<DynamicImage, FilterError> {
        let ratio = img.width() as f32 / img.height() as f32;

        // Scale so both axes cover the target box.
        let (mut w, mut h) = (self.width, (self.width as f32 / ratio) as u32);
        if w < self.width || h < self.height {
            w = (self.height as f32 * ratio) as u32;
            h = self.height;
        }

        let scaled = img.resize_exact(w.max(self.width), h.max(self.height), FilterType::Triangle);
        let (x, y) = self
            .gravity
            .offsets(scaled.width(), scaled.height(), self.width, self.height);

        Ok(scaled.crop_imm(x, y, self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn img(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::new(w, h))
    }

    #[test]
    fn test_exact_output_dimensions() {
        for (w, h) in [(200, 100), (100, 200), (64, 64)] {
            let out = Thumbnail::new(50, 50, Gravity::Center).apply(img(w, h)).unwrap();
            assert_eq!((out.width(), out.height()), (50, 50), "input {}x{}", w, h);
        }
    }

    #[test]
    fn test_wide_input_cropped_horizontally() {
        // 400x100 covers 50x50 at 200x50; the crop removes width only.
        let out = Thumbnail::new(50, 50, Gravity::West).apply(img(400, 100)).unwrap();
        assert_eq!((out.width(), out.height()), (50, 50));
    }
}
