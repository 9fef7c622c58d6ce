//! Screen ↔ image coordinate mapping.
//!
//! The viewport collaborator reports the background surface's *rendered*
//! rectangle, which already reflects the live pan and zoom. Mapping a pointer
//! through that rectangle and the surface's natural size therefore yields the
//! same image pixel no matter how the view is transformed.
//!
//! Rounding is to the nearest integer with ties away from zero
//! (`f64::round`), and results are clamped into the image bounds.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The surface's bounding box as rendered on screen (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.left
            && px <= self.left + self.width
            && py >= self.top
            && py <= self.top + self.height
    }

    fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// The surface's natural (intrinsic) resolution in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An integer position in natural pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: i32,
    pub y: i32,
}

/// Per-axis scale between rendered and natural size, for one pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMapping {
    pub rect: ScreenRect,
    pub natural: ImageSize,
    /// Natural pixels per screen unit along x.
    pub scale_x: f64,
    /// Natural pixels per screen unit along y.
    pub scale_y: f64,
}

impl SurfaceMapping {
    /// Build the mapping for the current frame.
    ///
    /// Fails with `MissingSurfaceSize` before the image has loaded and with
    /// `DegenerateSurface` when it is rendered with no area.
    pub fn new(rect: ScreenRect, natural: Option<ImageSize>) -> Result<Self> {
        let natural = natural.ok_or(Error::MissingSurfaceSize)?;
        if rect.is_degenerate() {
            return Err(Error::DegenerateSurface {
                width: rect.width,
                height: rect.height,
            });
        }
        Ok(Self {
            rect,
            natural,
            scale_x: f64::from(natural.width) / rect.width,
            scale_y: f64::from(natural.height) / rect.height,
        })
    }

    /// Map a screen position into natural pixel space.
    pub fn to_image(&self, px: f64, py: f64) -> ImagePoint {
        let x = ((px - self.rect.left) * self.scale_x).round();
        let y = ((py - self.rect.top) * self.scale_y).round();
        ImagePoint {
            x: x.clamp(0.0, f64::from(self.natural.width)) as i32,
            y: y.clamp(0.0, f64::from(self.natural.height)) as i32,
        }
    }

    /// Map a natural pixel position back onto the screen.
    pub fn to_screen(&self, x: i32, y: i32) -> (f64, f64) {
        (
            self.rect.left + f64::from(x) / self.scale_x,
            self.rect.top + f64::from(y) / self.scale_y,
        )
    }
}

/// One-shot mapping of a pointer position into natural pixel space.
pub fn screen_to_image(
    px: f64,
    py: f64,
    rect: ScreenRect,
    natural: Option<ImageSize>,
) -> Result<ImagePoint> {
    Ok(SurfaceMapping::new(rect, natural)?.to_image(px, py))
}
