//! Decoding and EXIF orientation correction.
//!
//! # Responsibilities
//! - Decode raw source bytes into an in-memory image (format sniffing)
//! - Read the EXIF orientation tag, best-effort
//! - Apply the rotation the orientation value calls for
//!
//! # Design Decisions
//! - Orientation handling never fails a job: unreadable or absent
//!   metadata simply skips correction
//! - Only orientation values 3, 6 and 8 trigger a rotation (180/90/270
//!   degrees); mirrored variants are passed through untouched

use image::DynamicImage;

use crate::error::JobError;

/// Decode raw bytes into an image, guessing the format from the content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, JobError> {
    image::load_from_memory(bytes).map_err(|e| JobError::Decode(e.to_string()))
}

/// Read the EXIF orientation tag (1..=8) from raw source bytes.
///
/// Returns `None` when the container has no EXIF block, the block is
/// unreadable, or the tag is missing.
pub fn read_orientation(bytes: &[u8]) -> Option<u32> {
    let mut cursor = std::io::Cursor::new(bytes);
    let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
}

/// Rotate the image according to an EXIF orientation value.
///
/// Values other than 3, 6 and 8 (including absent) are a no-op.
pub fn apply_orientation(img: DynamicImage, orientation: Option<u32>) -> DynamicImage {
    match orientation {
        Some(3) => img.rotate180(),
        Some(6) => img.rotate90(),
        Some(8) => img.rotate270(),
        _ => img,
    }
}
