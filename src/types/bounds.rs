//! Axis-aligned extents in logical units.

use super::Vector2;
use std::fmt;

/// Axis-aligned rectangle spanned by `min` and `max`.
///
/// Extents only grow. [`include`](Self::include) and [`merge`](Self::merge)
/// take the componentwise min/max and nothing else touches the corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2D {
    pub min: Vector2,
    pub max: Vector2,
}

impl BoundingBox2D {
    pub fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    /// Zero-area box sitting on `p`.
    pub fn at(p: Vector2) -> Self {
        Self::new(p, p)
    }

    /// Smallest box holding every point, `None` for an empty slice.
    pub fn from_points(points: &[Vector2]) -> Option<Self> {
        let mut iter = points.iter().copied();
        let seed = Self::at(iter.next()?);
        Some(iter.fold(seed, |mut acc, p| {
            acc.include(p);
            acc
        }))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// No area to scale into.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    pub fn include(&mut self, p: Vector2) {
        self.min = Vector2::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Vector2::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    pub fn merge(&self, other: &BoundingBox2D) -> BoundingBox2D {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }
}

impl fmt::Display for BoundingBox2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}] ({} x {})", self.min, self.max, self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_all_points() {
        let bbox = BoundingBox2D::from_points(&[
            Vector2::new(0.0, 0.0),
            Vector2::new(10.0, 5.0),
            Vector2::new(-5.0, 3.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, Vector2::new(-5.0, 0.0));
        assert_eq!(bbox.max, Vector2::new(10.0, 5.0));
        assert_eq!(bbox.width(), 15.0);
        assert_eq!(bbox.height(), 5.0);
        assert!(BoundingBox2D::from_points(&[]).is_none());
    }

    #[test]
    fn zero_width_is_degenerate() {
        let bbox =
            BoundingBox2D::from_points(&[Vector2::new(600.0, 300.0), Vector2::new(600.0, 350.0)])
                .unwrap();
        assert_eq!(bbox.height(), 50.0);
        assert!(bbox.is_degenerate());
        assert!(BoundingBox2D::at(Vector2::new(1.0, 1.0)).is_degenerate());
        assert!(!BoundingBox2D::new(Vector2::ZERO, Vector2::new(1.0, 1.0)).is_degenerate());
    }

    #[test]
    fn merge_never_shrinks() {
        let a = BoundingBox2D::new(Vector2::new(0.0, 0.0), Vector2::new(10.0, 10.0));
        let b = BoundingBox2D::new(Vector2::new(2.0, -4.0), Vector2::new(5.0, 5.0));
        let m = a.merge(&b);
        assert_eq!(m.min, Vector2::new(0.0, -4.0));
        assert_eq!(m.max, Vector2::new(10.0, 10.0));
        assert_eq!(m.merge(&a), m);
    }
}
