//! Gaussian blur.

use image::DynamicImage;

use crate::error::FilterError;
use crate::filter::Filter;

/// Gaussian blur with a fixed sigma.
#[derive(Debug)]
pub struct Blur {
    sigma: f32,
}

impl Blur {
    pub fn new(sigma: f32) -> Self {
        Self { sigma }
    }
}

impl Filter for Blur {
    fn name(&self) -> &'static str {
        "blur"
    }

    fn apply(&self, img: DynamicImage) -> Result<DynamicImage, FilterError> {
        if self.sigma <= 0.0 {
            return Ok(img);
        }
        Ok(img.blur(self.sigma))
    }
}
