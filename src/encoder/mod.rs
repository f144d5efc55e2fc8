//! Output encoding.
//!
//! # Responsibilities
//! - Serialize the transformed image into the profile's output format
//! - Expose the matching content type for the edge layer

pub mod jpeg;
pub mod png;

pub use jpeg::Jpeg;
pub use png::Png;

use image::DynamicImage;

use crate::error::EncodeError;

/// Serializes an in-memory image into transportable bytes.
pub trait Encoder: Send + Sync + std::fmt::Debug {
    /// Encode the image.
    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, EncodeError>;

    /// Content type of the encoded bytes.
    fn mime(&self) -> &'static str;
}
