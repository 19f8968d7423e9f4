//! Rendering seam.
//!
//! [`render_drawing`] replays a resolved drawing against a
//! [`RenderBackend`], mapping every coordinate and length to page space
//! with the [`ScaleResult`] it is given. Backends receive page points and
//! must not apply any scale of their own.
//!
//! All backend methods default to doing nothing, so a backend only
//! implements the primitives it cares about.

use crate::drawing::W2dDrawing;
use crate::layout::ScaleResult;
use crate::records::{angle_to_degrees, FontRef, Image, OpcodeRecord};
use crate::types::{Color, ColorMap, LinePattern, PageTransform, Rgba, Vector2};

/// Graphics state in effect for a primitive
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub color: Rgba,
    pub fill: bool,
    pub visible: bool,
    /// Line width in page points
    pub line_width: f64,
    pub line_pattern: LinePattern,
    pub layer: Option<i32>,
    pub font: Option<FontRef>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            color: Color::default().resolve(&ColorMap::default()),
            fill: false,
            visible: true,
            line_width: 0.0,
            line_pattern: LinePattern::default(),
            layer: None,
            font: None,
        }
    }
}

/// Target for page-space primitives.
#[allow(unused_variables)]
pub trait RenderBackend {
    /// Open path; `state.fill` asks for a filled polygon instead.
    fn polyline(&mut self, points: &[Vector2], state: &RenderState) {}

    /// Triangle strip
    fn triangles(&mut self, points: &[Vector2], state: &RenderState) {}

    fn markers(&mut self, points: &[Vector2], state: &RenderState) {}

    /// Closed contours filled together (holes by even-odd)
    fn contours(&mut self, contours: &[Vec<Vector2>], state: &RenderState) {}

    /// Elliptical arc; angles in degrees, counter-clockwise.
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &mut self,
        center: Vector2,
        radius_x: f64,
        radius_y: f64,
        start_degrees: f64,
        end_degrees: f64,
        tilt_degrees: f64,
        state: &RenderState,
    ) {
    }

    /// Cubic segments as `[start, control1, control2, end]`
    fn bezier(&mut self, segments: &[[Vector2; 4]], state: &RenderState) {}

    /// Per-vertex colored triangle strip (`strip == true`) or polyline
    fn gouraud(&mut self, vertices: &[(Vector2, Rgba)], strip: bool, state: &RenderState) {}

    fn text(
        &mut self,
        anchor: Vector2,
        string: &str,
        size: f64,
        rotation_degrees: f64,
        state: &RenderState,
    ) {
    }

    fn image(&mut self, min: Vector2, max: Vector2, image: &Image, state: &RenderState) {}
}

/// Replay `drawing` against `backend`. Returns the number of primitives
/// emitted.
///
/// Invisible primitives and records that still hold deltas are skipped.
pub fn render_drawing<B: RenderBackend + ?Sized>(
    drawing: &W2dDrawing,
    placement: &ScaleResult,
    backend: &mut B,
) -> usize {
    let t = placement.transform;
    let mut palette = ColorMap::default();
    let mut color = Color::default();
    let mut state = RenderState::default();
    let mut emitted = 0;

    for record in &drawing.records {
        match record {
            OpcodeRecord::SetColor(c) => {
                color = *c;
                state.color = color.resolve(&palette);
                continue;
            }
            OpcodeRecord::SetColorMap(map) => {
                palette = map.clone();
                state.color = color.resolve(&palette);
                continue;
            }
            OpcodeRecord::SetFill(on) => {
                state.fill = *on;
                continue;
            }
            OpcodeRecord::SetVisibility(on) => {
                state.visible = *on;
                continue;
            }
            OpcodeRecord::SetLineWeight(weight) => {
                state.line_width = t.apply_length(weight.value().max(0) as f64);
                continue;
            }
            OpcodeRecord::SetLinePattern(pattern) => {
                state.line_pattern = *pattern;
                continue;
            }
            OpcodeRecord::SetLayer(layer) => {
                state.layer = Some(layer.number);
                continue;
            }
            OpcodeRecord::SetFont(font) => {
                state.font = Some(font.clone());
                continue;
            }
            _ => {}
        }

        if !record.is_geometry() || !state.visible {
            continue;
        }
        if record.is_relative() {
            log::warn!("not rendering unresolved {}", record.name());
            continue;
        }
        draw(record, &t, &state, backend);
        emitted += 1;
    }
    emitted
}

fn page_points(t: &PageTransform, points: &[crate::types::LogicalPoint]) -> Vec<Vector2> {
    points.iter().map(|p| t.apply_logical(*p)).collect()
}

fn draw<B: RenderBackend + ?Sized>(
    record: &OpcodeRecord,
    t: &PageTransform,
    state: &RenderState,
    backend: &mut B,
) {
    match record {
        OpcodeRecord::Line(line) => backend.polyline(&page_points(t, &[line.start, line.end]), state),
        OpcodeRecord::Polyline(list) => backend.polyline(&page_points(t, &list.vertices), state),
        OpcodeRecord::Polytriangle(list) => {
            backend.triangles(&page_points(t, &list.vertices), state)
        }
        OpcodeRecord::Polymarker(list) => backend.markers(&page_points(t, &list.vertices), state),
        OpcodeRecord::Circle(circle) => {
            let r = t.apply_length(circle.radius as f64);
            backend.ellipse(t.apply_logical(circle.center), r, r, 0.0, 360.0, 0.0, state)
        }
        OpcodeRecord::Ellipse(e) => {
            let end = if e.is_full() { 360.0 } else { e.end_degrees() };
            backend.ellipse(
                t.apply_logical(e.center),
                t.apply_length(e.major as f64),
                t.apply_length(e.minor as f64),
                e.start_degrees(),
                end,
                e.tilt_degrees(),
                state,
            )
        }
        OpcodeRecord::Bezier(bezier) => {
            let segments: Vec<[Vector2; 4]> = bezier
                .segments()
                .map(|s| s.map(|p| t.apply_logical(p)))
                .collect();
            backend.bezier(&segments, state)
        }
        OpcodeRecord::ContourSet(set) => {
            let contours: Vec<Vec<Vector2>> =
                set.contours.iter().map(|c| page_points(t, c)).collect();
            backend.contours(&contours, state)
        }
        OpcodeRecord::GouraudTriangles(g) | OpcodeRecord::GouraudPolyline(g) => {
            let vertices: Vec<(Vector2, Rgba)> = g
                .vertices
                .iter()
                .map(|v| (t.apply_logical(v.position), v.color))
                .collect();
            let strip = matches!(record, OpcodeRecord::GouraudTriangles(_));
            backend.gouraud(&vertices, strip, state)
        }
        OpcodeRecord::Text(text) => {
            let font = text.font_ref.as_ref().or(state.font.as_ref());
            let height = font.map(|f| f.height).unwrap_or(0).max(0) as f64;
            let rotation = font.map(|f| angle_to_degrees(f.rotation)).unwrap_or(0.0);
            backend.text(
                t.apply_logical(text.position),
                &text.string,
                t.apply_length(height),
                rotation,
                state,
            )
        }
        OpcodeRecord::Image(image) => backend.image(
            t.apply_logical(image.min_corner),
            t.apply_logical(image.max_corner),
            image,
            state,
        ),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_scale, LayoutOptions};
    use crate::records::{Circle, Line};
    use crate::types::{BoundingBox2D, LogicalPoint};

    /// Backend that records all calls.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl RenderBackend for Recorder {
        fn polyline(&mut self, points: &[Vector2], state: &RenderState) {
            self.calls
                .push(format!("polyline {:?} fill={}", points, state.fill));
        }

        fn ellipse(
            &mut self,
            center: Vector2,
            radius_x: f64,
            _radius_y: f64,
            _start_degrees: f64,
            end_degrees: f64,
            _tilt_degrees: f64,
            _state: &RenderState,
        ) {
            self.calls.push(format!(
                "ellipse ({}, {}) r={} end={}",
                center.x, center.y, radius_x, end_degrees
            ));
        }
    }

    fn placement() -> ScaleResult {
        let bbox = BoundingBox2D::new(Vector2::new(0.0, 0.0), Vector2::new(100.0, 100.0));
        let options = LayoutOptions {
            page_width: 220.0,
            page_height: 220.0,
            margin: 10.0,
            ..LayoutOptions::default()
        };
        compute_scale(Some(&bbox), &options).unwrap()
    }

    #[test]
    fn test_render_maps_to_page() {
        let mut drawing = W2dDrawing::new();
        drawing.records = vec![
            OpcodeRecord::SetFill(true),
            OpcodeRecord::Line(Line {
                start: LogicalPoint::new(0, 0),
                end: LogicalPoint::new(100, 100),
                relative: false,
            }),
            OpcodeRecord::Circle(Circle {
                center: LogicalPoint::new(50, 50),
                radius: 10,
                relative: false,
            }),
        ];
        let mut backend = Recorder::default();
        let count = render_drawing(&drawing, &placement(), &mut backend);

        assert_eq!(count, 2);
        assert_eq!(
            backend.calls[0],
            "polyline [Vector2 { x: 10.0, y: 10.0 }, Vector2 { x: 210.0, y: 210.0 }] fill=true"
        );
        assert_eq!(backend.calls[1], "ellipse (110, 110) r=20 end=360");
    }

    #[test]
    fn test_invisible_and_unresolved_skipped() {
        let mut drawing = W2dDrawing::new();
        drawing.records = vec![
            OpcodeRecord::Line(Line {
                start: LogicalPoint::new(0, 0),
                end: LogicalPoint::new(1, 1),
                relative: true,
            }),
            OpcodeRecord::SetVisibility(false),
            OpcodeRecord::Line(Line {
                start: LogicalPoint::new(0, 0),
                end: LogicalPoint::new(1, 1),
                relative: false,
            }),
        ];
        let mut backend = Recorder::default();
        assert_eq!(render_drawing(&drawing, &placement(), &mut backend), 0);
        assert!(backend.calls.is_empty());
    }
}
