//! Drawing-to-page transformation
//!
//! A uniform scale about the drawing's minimum corner followed by a
//! translation into the page's printable area.

use crate::types::{LogicalPoint, Vector2};
use std::fmt;

/// Affine map `page = (drawing - origin) * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    /// Uniform scale, page points per drawing unit
    pub scale: f64,
    /// Drawing-space point mapped to `offset`
    pub origin: Vector2,
    /// Page-space position of `origin`
    pub offset: Vector2,
}

impl PageTransform {
    /// Create identity transform
    pub fn identity() -> Self {
        PageTransform {
            scale: 1.0,
            origin: Vector2::ZERO,
            offset: Vector2::ZERO,
        }
    }

    /// Create a transform from its parts
    pub fn new(scale: f64, origin: Vector2, offset: Vector2) -> Self {
        PageTransform {
            scale,
            origin,
            offset,
        }
    }

    /// Map a drawing-space point to page space
    pub fn apply(&self, point: Vector2) -> Vector2 {
        (point - self.origin) * self.scale + self.offset
    }

    /// Map a logical point to page space
    pub fn apply_logical(&self, point: LogicalPoint) -> Vector2 {
        self.apply(point.to_vector())
    }

    /// Scale a length (radius, line weight, font height)
    pub fn apply_length(&self, length: f64) -> f64 {
        length * self.scale
    }

    /// Map a page-space point back to drawing space
    pub fn inverse_apply(&self, point: Vector2) -> Vector2 {
        if self.scale == 0.0 {
            return self.origin;
        }
        (point - self.offset) * (1.0 / self.scale) + self.origin
    }
}

impl Default for PageTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for PageTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PageTransform[scale={} origin={} offset={}]",
            self.scale, self.origin, self.offset
        )
    }
}
