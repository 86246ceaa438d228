use serde::{Deserialize, Serialize};

use super::constants::MIN_SAMPLE_SIDE;

/// Face bounding box as reported by the detector, in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A requested sampling rectangle. May lie partly or wholly outside the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A rectangle guaranteed to lie inside the image it was clamped against.
///
/// `x + width <= img_width` and `y + height <= img_height` always hold.
/// Sides are at least [`MIN_SAMPLE_SIDE`] unless the origin sits closer
/// than that to the far edge, in which case they run to the edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClampedRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Snaps the request to the pixel grid and clamps it into the image.
    ///
    /// The origin is clamped first; width and height are then bounded by
    /// what remains between the clamped origin and the far edge. Returns
    /// `None` for an empty image.
    pub fn clamp(&self, img_width: u32, img_height: u32) -> Option<ClampedRegion> {
        if img_width == 0 || img_height == 0 {
            return None;
        }
        let iw = img_width as i64;
        let ih = img_height as i64;

        let x = (self.x.floor() as i64).clamp(0, iw - 1);
        let y = (self.y.floor() as i64).clamp(0, ih - 1);
        let width = clamp_extent(self.width.round() as i64, iw - x);
        let height = clamp_extent(self.height.round() as i64, ih - y);

        Some(ClampedRegion {
            x: x as u32,
            y: y as u32,
            width: width as u32,
            height: height as u32,
        })
    }
}

/// `available` is always >= 1 here, so the result is too.
fn clamp_extent(requested: i64, available: i64) -> i64 {
    requested
        .min(available)
        .max(MIN_SAMPLE_SIDE.min(available))
}
