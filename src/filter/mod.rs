//! Image filters applied between decode and encode.
//!
//! # Responsibilities
//! - Define the `Filter` contract the transform stage consumes
//! - Provide the concrete filters a profile can be configured with
//!
//! # Design Decisions
//! - Filters are synchronous and CPU-bound; the transform stage runs
//!   the whole chain on a blocking thread
//! - A chain is applied strictly in declared order; the first failure
//!   aborts the chain
//! - Filters consume and return the image (no in-place mutation), so a
//!   failed chain never leaves a half-transformed result behind

pub mod blur;
pub mod null;
pub mod overlay;
pub mod resize;
pub mod thumbnail;

pub use blur::Blur;
pub use null::Null;
pub use overlay::Overlay;
pub use resize::Resize;
pub use thumbnail::Thumbnail;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// A single image transformation step.
pub trait Filter: Send + Sync + std::fmt::Debug {
    /// Short name used in timing breakdowns and logs.
    fn name(&self) -> &'static str;

    /// Apply the filter, consuming the input image.
    fn apply(&self, img: DynamicImage) -> Result<DynamicImage, FilterError>;
}

/// Anchor point for crop and overlay placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
    #[default]
    Center,
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Gravity {
    /// Top-left offset that places an `inner_w` x `inner_h` box inside an
    /// `outer_w` x `outer_h` box at this anchor.
    ///
    /// The inner box must fit inside the outer one.
    pub fn offsets(self, outer_w: u32, outer_h: u32, inner_w: u32, inner_h: u32) -> (u32, u32) {
        let span_x = outer_w.saturating_sub(inner_w);
        let span_y = outer_h.saturating_sub(inner_h);

        let x = match self {
            Gravity::West | Gravity::NorthWest | Gravity::SouthWest => 0,
            Gravity::East | Gravity::NorthEast | Gravity::SouthEast => span_x,
            _ => span_x / 2,
        };
        let y = match self {
            Gravity::North | Gravity::NorthEast | Gravity::NorthWest => 0,
            Gravity::South | Gravity::SouthEast | Gravity::SouthWest => span_y,
            _ => span_y / 2,
        };

        (x, y)
    }
}
