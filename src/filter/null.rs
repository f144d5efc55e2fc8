//! Identity filter.

use image::DynamicImage;

use crate::error::FilterError;
use crate::filter::Filter;

/// Passes the image through untouched. Useful as a placeholder in
/// profiles that only re-encode.
#[derive(Debug, Default)]
pub struct Null;

impl Filter for Null {
    fn name(&self) -> &'static str {
        "null"
    }

    fn apply(&self, img: DynamicImage) -> Result<DynamicImage, FilterError> {
        Ok(img)
    }
}
