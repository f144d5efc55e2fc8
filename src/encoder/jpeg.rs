//! JPEG encoding.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::encoder::Encoder;
use crate::error::EncodeError;

/// Lossy JPEG output with a configured quality (1..=100).
#[derive(Debug)]
pub struct Jpeg {
    quality: u8,
}

impl Jpeg {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Encoder for Jpeg {
    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buf, self.quality);
        // JPEG has no alpha channel.
        img.to_rgb8().write_with_encoder(encoder)?;
        Ok(buf)
    }

    fn mime(&self) -> &'static str {
        "image/jpeg"
    }
}
