//! Relative-to-absolute coordinate resolution.
//!
//! Relative coordinates are deltas from the previous point. The running
//! point starts at the context's current origin and is written back after
//! every record, so consecutive records chain. A `SetOrigin` record
//! replaces the running point outright.

use crate::io::w2d::context::DecodeContext;
use crate::records::{OpcodeRecord, Text};
use crate::types::LogicalPoint;

/// Resolves records against a decode context.
pub struct CoordinateResolver<'a> {
    ctx: &'a mut DecodeContext,
}

impl<'a> CoordinateResolver<'a> {
    pub fn new(ctx: &'a mut DecodeContext) -> Self {
        Self { ctx }
    }

    /// Current running point.
    pub fn origin(&self) -> LogicalPoint {
        self.ctx.current_origin
    }

    /// Resolve one record in place.
    ///
    /// Records that are already absolute (including ones resolved by an
    /// earlier pass) are left untouched.
    pub fn resolve(&mut self, record: &mut OpcodeRecord) {
        if let OpcodeRecord::SetOrigin(point) = record {
            self.ctx.current_origin = *point;
            return;
        }
        if !record.is_relative() {
            return;
        }

        match record {
            OpcodeRecord::Line(line) => {
                self.chain(std::slice::from_mut(&mut line.start));
                self.chain(std::slice::from_mut(&mut line.end));
                line.relative = false;
            }
            OpcodeRecord::Polyline(list)
            | OpcodeRecord::Polytriangle(list)
            | OpcodeRecord::Polymarker(list) => {
                self.chain(&mut list.vertices);
                list.relative = false;
            }
            OpcodeRecord::Circle(circle) => {
                self.chain(std::slice::from_mut(&mut circle.center));
                circle.relative = false;
            }
            OpcodeRecord::Ellipse(ellipse) => {
                self.chain(std::slice::from_mut(&mut ellipse.center));
                ellipse.relative = false;
            }
            OpcodeRecord::Bezier(bezier) => {
                self.chain(&mut bezier.points);
                bezier.relative = false;
            }
            OpcodeRecord::ContourSet(set) => {
                for contour in &mut set.contours {
                    self.chain(contour);
                }
                set.relative = false;
            }
            OpcodeRecord::GouraudTriangles(g) | OpcodeRecord::GouraudPolyline(g) => {
                for vertex in &mut g.vertices {
                    self.chain(std::slice::from_mut(&mut vertex.position));
                }
                g.relative = false;
            }
            OpcodeRecord::Text(text) => self.resolve_text(text),
            _ => {}
        }
    }

    /// Resolve a whole record sequence in order.
    pub fn resolve_all(&mut self, records: &mut [OpcodeRecord]) {
        for record in records {
            self.resolve(record);
        }
    }

    fn chain(&mut self, points: &mut [LogicalPoint]) {
        let mut running = self.ctx.current_origin;
        for point in points.iter_mut() {
            running += *point;
            *point = running;
        }
        self.ctx.current_origin = running;
    }

    /// Bounds offsets are relative to the resolved anchor, not chained.
    fn resolve_text(&mut self, text: &mut Text) {
        self.chain(std::slice::from_mut(&mut text.position));
        if let Some(bounds) = &mut text.options.bounds {
            for corner in bounds.iter_mut() {
                *corner += text.position;
            }
        }
        text.relative = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Circle, ContourSet, Line, PointList, TextOptions};

    fn p(x: i64, y: i64) -> LogicalPoint {
        LogicalPoint::new(x, y)
    }

    #[test]
    fn test_origin_then_relative_polyline() {
        let mut ctx = DecodeContext::new();
        let mut records = vec![
            OpcodeRecord::SetOrigin(p(500, 300)),
            OpcodeRecord::Polyline(PointList::new(vec![p(100, 0), p(0, 50)], true)),
        ];
        CoordinateResolver::new(&mut ctx).resolve_all(&mut records);

        assert_eq!(
            records[1],
            OpcodeRecord::Polyline(PointList::new(vec![p(600, 300), p(600, 350)], false))
        );
        assert_eq!(ctx.current_origin, p(600, 350));
    }

    #[test]
    fn test_records_chain() {
        let mut ctx = DecodeContext::new();
        let mut records = vec![
            OpcodeRecord::Line(Line {
                start: p(10, 10),
                end: p(5, 0),
                relative: true,
            }),
            OpcodeRecord::Circle(Circle {
                center: p(0, 5),
                radius: 3,
                relative: true,
            }),
        ];
        CoordinateResolver::new(&mut ctx).resolve_all(&mut records);
        match &records[1] {
            OpcodeRecord::Circle(c) => {
                assert_eq!(c.center, p(15, 15));
                assert_eq!(c.radius, 3);
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_absolute_passthrough() {
        let mut ctx = DecodeContext::with_origin(p(1000, 1000));
        let mut record = OpcodeRecord::Polyline(PointList::new(vec![p(1, 1), p(2, 2)], false));
        let before = record.clone();
        CoordinateResolver::new(&mut ctx).resolve(&mut record);
        assert_eq!(record, before);
        assert_eq!(ctx.current_origin, p(1000, 1000));
    }

    #[test]
    fn test_resolving_twice_is_noop() {
        let mut records = vec![
            OpcodeRecord::SetOrigin(p(7, 7)),
            OpcodeRecord::Polymarker(PointList::new(vec![p(1, 0), p(1, 0)], true)),
        ];
        CoordinateResolver::new(&mut DecodeContext::new()).resolve_all(&mut records);
        let once = records.clone();
        CoordinateResolver::new(&mut DecodeContext::new()).resolve_all(&mut records);
        assert_eq!(records, once);
    }

    #[test]
    fn test_contours_chain_across_contours() {
        let mut ctx = DecodeContext::new();
        let mut record = OpcodeRecord::ContourSet(ContourSet {
            contours: vec![
                vec![p(0, 0), p(10, 0), p(0, 10)],
                vec![p(1, 1), p(1, 0), p(0, 1)],
            ],
            relative: true,
        });
        CoordinateResolver::new(&mut ctx).resolve(&mut record);
        match record {
            OpcodeRecord::ContourSet(set) => {
                assert_eq!(set.contours[0][2], p(10, 10));
                assert_eq!(set.contours[1][0], p(11, 11));
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_text_bounds_follow_anchor() {
        let mut ctx = DecodeContext::with_origin(p(100, 100));
        let mut record = OpcodeRecord::Text(Text {
            position: p(10, 0),
            string: "A".to_string(),
            font_ref: None,
            options: TextOptions {
                bounds: Some([p(0, 0), p(8, 0), p(8, 12), p(0, 12)]),
                ..TextOptions::default()
            },
            relative: true,
        });
        CoordinateResolver::new(&mut ctx).resolve(&mut record);
        match record {
            OpcodeRecord::Text(text) => {
                assert_eq!(text.position, p(110, 100));
                assert_eq!(text.options.bounds.unwrap()[2], p(118, 112));
            }
            other => panic!("unexpected record {:?}", other),
        }
        assert_eq!(ctx.current_origin, p(110, 100));
    }
}
