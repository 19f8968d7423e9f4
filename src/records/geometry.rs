//! Geometry records: lines, point lists, arcs, curves and shaded primitives

use crate::types::{LogicalPoint, Rgba};

/// A single line segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub start: LogicalPoint,
    pub end: LogicalPoint,
    /// Points are chained deltas from the current origin
    pub relative: bool,
}

/// Ordered list of vertices (polyline, polytriangle strip, polymarker)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointList {
    pub vertices: Vec<LogicalPoint>,
    pub relative: bool,
}

impl PointList {
    pub fn new(vertices: Vec<LogicalPoint>, relative: bool) -> Self {
        PointList { vertices, relative }
    }
}

/// Full circle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circle {
    pub center: LogicalPoint,
    pub radius: u32,
    pub relative: bool,
}

/// Elliptical arc.
///
/// Angles are stored as the raw 16-bit wire values, a full turn being
/// 65 536; use the `*_degrees` accessors for the converted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ellipse {
    pub center: LogicalPoint,
    pub major: u32,
    pub minor: u32,
    pub start_angle: u16,
    pub end_angle: u16,
    pub tilt: u16,
    pub relative: bool,
}

/// Convert a 16-bit wire angle to degrees
pub fn angle_to_degrees(value: u16) -> f64 {
    value as f64 * 360.0 / 65536.0
}

impl Ellipse {
    pub fn start_degrees(&self) -> f64 {
        angle_to_degrees(self.start_angle)
    }

    pub fn end_degrees(&self) -> f64 {
        angle_to_degrees(self.end_angle)
    }

    pub fn tilt_degrees(&self) -> f64 {
        angle_to_degrees(self.tilt)
    }

    /// Larger of the two semi-axes
    pub fn max_radius(&self) -> u32 {
        self.major.max(self.minor)
    }

    /// True when start and end angles describe the closed curve
    pub fn is_full(&self) -> bool {
        self.start_angle == self.end_angle
    }
}

/// Chain of cubic Bezier segments.
///
/// `points` holds `1 + 3n` points: each segment is (start, control 1,
/// control 2, end) and consecutive segments share the end/start point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bezier {
    pub points: Vec<LogicalPoint>,
    pub relative: bool,
}

impl Bezier {
    /// Number of curve segments
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1) / 3
    }

    /// Iterate segments as four-point arrays
    pub fn segments(&self) -> impl Iterator<Item = [LogicalPoint; 4]> + '_ {
        (0..self.segment_count()).map(move |i| {
            let base = i * 3;
            [
                self.points[base],
                self.points[base + 1],
                self.points[base + 2],
                self.points[base + 3],
            ]
        })
    }
}

/// Set of closed contours filled together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContourSet {
    pub contours: Vec<Vec<LogicalPoint>>,
    pub relative: bool,
}

impl ContourSet {
    /// Total number of points across all contours
    pub fn point_count(&self) -> usize {
        self.contours.iter().map(Vec::len).sum()
    }
}

/// Vertex carrying its own color for smooth shading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GouraudVertex {
    pub position: LogicalPoint,
    pub color: Rgba,
}

/// Gouraud-shaded triangle strip or polyline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gouraud {
    pub vertices: Vec<GouraudVertex>,
    pub relative: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_conversion() {
        assert_eq!(angle_to_degrees(0), 0.0);
        assert_eq!(angle_to_degrees(16384), 90.0);
        assert_eq!(angle_to_degrees(32768), 180.0);
    }

    #[test]
    fn test_bezier_segments_share_points() {
        let pts: Vec<LogicalPoint> = (0..7).map(|i| LogicalPoint::new(i, i)).collect();
        let bezier = Bezier {
            points: pts,
            relative: false,
        };
        let segments: Vec<_> = bezier.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0][3], segments[1][0]);
        assert_eq!(segments[1][3], LogicalPoint::new(6, 6));
    }

    #[test]
    fn test_ellipse_helpers() {
        let e = Ellipse {
            center: LogicalPoint::ZERO,
            major: 40,
            minor: 90,
            start_angle: 0,
            end_angle: 0,
            tilt: 8192,
            relative: false,
        };
        assert_eq!(e.max_radius(), 90);
        assert!(e.is_full());
        assert_eq!(e.tilt_degrees(), 45.0);
    }
}
