//! PNG encoding.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::encoder::Encoder;
use crate::error::EncodeError;

/// Lossless PNG output.
#[derive(Debug, Default)]
pub struct Png;

impl Encoder for Png {
    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    fn mime(&self) -> &'static str {
        "image/png"
    }
}
