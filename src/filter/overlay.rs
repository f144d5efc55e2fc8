//! Foreground image composition (watermark-style overlay).

use image::imageops::FilterType;
use image::{imageops, DynamicImage, RgbaImage};

use crate::error::FilterError;
use crate::filter::{Filter, Gravity};

/// Composites a foreground image onto the input at the configured
/// gravity, keeping `padding` pixels of clearance from the edges.
///
/// A foreground larger than the padded surface is scaled down to fit,
/// preserving its aspect ratio. Surfaces too small to hold any
/// foreground at all are passed through untouched.
#[derive(Debug)]
pub struct Overlay {
    foreground: RgbaImage,
    gravity: Gravity,
    padding: u32,
}

impl Overlay {
    pub fn new(foreground: RgbaImage, gravity: Gravity, padding: u32) -> Self {
        Self {
            foreground,
            gravity,
            padding,
        }
    }

    /// Foreground sized to fit the padded surface, or `None` when the
    /// surface is too small for an overlay.
    fn fit_foreground(&self, surface_w: u32, surface_h: u32) -> Option<RgbaImage> {
        let pad2 = self.padding * 2;
        if surface_w <= pad2 || surface_h <= pad2 {
            return None;
        }

        let (fw, fh) = self.foreground.dimensions();
        if fw + pad2 < surface_w && fh + pad2 < surface_h {
            return Some(self.foreground.clone());
        }

        let ratio = fw as f32 / fh as f32;
        let mut w = surface_w - pad2;
        let mut h = (w as f32 / ratio) as u32;
        if h + pad2 > surface_h {
            h = surface_h - pad2;
            w = (h as f32 * ratio) as u32;
        }
        if w == 0 || h == 0 {
            return None;
        }

        Some(imageops::resize(&self.foreground, w, h, FilterType::Triangle))
    }
}

impl Filter for Overlay {
    fn name(&self) -> &'static str {
        "overlay"
    }

    fn apply(&self, img: DynamicImage) -> Result<DynamicImage, FilterError> {
        let (sw, sh) = (img.width(), img.height());
        let Some(fg) = self.fit_foreground(sw, sh) else {
            return Ok(img);
        };

        let inner_w = sw - self.padding * 2;
        let inner_h = sh - self.padding * 2;
        let (ox, oy) = self.gravity.offsets(inner_w, inner_h, fg.width(), fg.height());

        let mut base = img.into_rgba8();
        imageops::overlay(
            &mut base,
            &fg,
            (self.padding + ox) as i64,
            (self.padding + oy) as i64,
        );

        Ok(DynamicImage::ImageRgba8(base))
    }
}
