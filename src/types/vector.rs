//! Points in drawing space (integer) and page space (float).

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Integer point in drawing ("logical") units.
///
/// Wire coordinates are 16- or 32-bit. They widen to `i64` so chains of
/// relative deltas cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LogicalPoint {
    pub x: i64,
    pub y: i64,
}

/// Floating point position, used for extents and page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

macro_rules! componentwise {
    ($ty:ident) => {
        impl Add for $ty {
            type Output = $ty;
            fn add(self, rhs: $ty) -> $ty {
                $ty::new(self.x + rhs.x, self.y + rhs.y)
            }
        }

        impl Sub for $ty {
            type Output = $ty;
            fn sub(self, rhs: $ty) -> $ty {
                $ty::new(self.x - rhs.x, self.y - rhs.y)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "({}, {})", self.x, self.y)
            }
        }
    };
}

componentwise!(LogicalPoint);
componentwise!(Vector2);

impl LogicalPoint {
    pub const ZERO: LogicalPoint = LogicalPoint::new(0, 0);

    pub const fn new(x: i64, y: i64) -> Self {
        LogicalPoint { x, y }
    }

    pub fn to_vector(self) -> Vector2 {
        Vector2::new(self.x as f64, self.y as f64)
    }
}

impl AddAssign for LogicalPoint {
    fn add_assign(&mut self, rhs: LogicalPoint) {
        *self = *self + rhs;
    }
}

impl From<(i64, i64)> for LogicalPoint {
    fn from((x, y): (i64, i64)) -> Self {
        LogicalPoint::new(x, y)
    }
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    fn mul(self, k: f64) -> Vector2 {
        Vector2::new(self.x * k, self.y * k)
    }
}

impl From<LogicalPoint> for Vector2 {
    fn from(p: LogicalPoint) -> Self {
        p.to_vector()
    }
}
