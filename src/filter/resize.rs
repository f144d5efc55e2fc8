//! Aspect-preserving downscale.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::FilterError;
use crate::filter::Filter;

/// Scales the image down to fit inside `width` x `height`, preserving
/// aspect ratio.
///
/// A zero dimension leaves that axis unconstrained. Images that already
/// fit are returned unchanged; this filter never upscales.
#[derive(Debug)]
pub struct Resize {
    width: u32,
    height: u32,
}

impl Resize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Filter for Resize {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn apply(&self, img: DynamicImage) -> Result<DynamicImage, FilterError> {
        if self.width == 0 && self.height == 0 {
            return Ok(img);
        }

        let (w, h) = (img.width(), img.height());
        let fits_w = self.width == 0 || w < self.width;
        let fits_h = self.height == 0 || h < self.height;
        if fits_w && fits_h {
            return Ok(img);
        }

        let ratio = w as f32 / h as f32;
        let (tw, th) = if self.width == 0 {
            ((self.height as f32 * ratio) as u32, self.height)
        } else if self.height == 0 {
            (self.width, (self.width as f32 / ratio) as u32)
        } else {
            let (tw, th) = (self.width, (self.width as f32 / ratio) as u32);
            if tw > self.width || th > self.height {
                ((self.height as f32 * ratio) as u32, self.height)
            } else {
                (tw, th)
            }
        };

        Ok(img.resize_exact(tw.max(1), th.max(1), FilterType::Triangle))
    }
}
