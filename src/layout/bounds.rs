//! Bounding boxes over resolved records, overall and per primitive kind.

use indexmap::IndexMap;

use crate::records::{OpcodeRecord, PrimitiveKind, Text};
use crate::types::{BoundingBox2D, LogicalPoint, Vector2};

/// Width of one character relative to the font size.
///
/// Text extents are an estimate from the character count, not glyph
/// metrics.
pub const TEXT_ADVANCE_FACTOR: f64 = 0.6;

/// Accumulated extents of a record sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsReport {
    /// Union of every primitive's box, `None` when nothing was drawn
    pub overall: Option<BoundingBox2D>,
    /// One box per primitive kind, in first-seen order
    pub per_kind: IndexMap<PrimitiveKind, BoundingBox2D>,
    /// Geometry records skipped because they still held deltas
    pub unresolved: usize,
}

impl BoundsReport {
    pub fn is_empty(&self) -> bool {
        self.overall.is_none()
    }

    pub fn get(&self, kind: PrimitiveKind) -> Option<&BoundingBox2D> {
        self.per_kind.get(&kind)
    }
}

/// Single pass over resolved records.
#[derive(Debug, Clone)]
pub struct BoundsCalculator {
    default_font_size: f64,
    report: BoundsReport,
}

impl BoundsCalculator {
    /// `default_font_size` is used for text without a positive font height.
    pub fn new(default_font_size: f64) -> Self {
        Self {
            default_font_size,
            report: BoundsReport::default(),
        }
    }

    pub fn add(&mut self, record: &OpcodeRecord) {
        let Some(kind) = record.kind() else {
            return;
        };
        if record.is_relative() {
            log::debug!("skipping unresolved {} in bounds", record.name());
            self.report.unresolved += 1;
            return;
        }

        let points = record_extents(record, self.default_font_size);
        let Some(bbox) = BoundingBox2D::from_points(&points) else {
            return;
        };

        self.report
            .per_kind
            .entry(kind)
            .and_modify(|b| *b = b.merge(&bbox))
            .or_insert(bbox);
        self.report.overall = Some(match &self.report.overall {
            Some(overall) => overall.merge(&bbox),
            None => bbox,
        });
    }

    pub fn add_all<'r>(&mut self, records: impl IntoIterator<Item = &'r OpcodeRecord>) {
        for record in records {
            self.add(record);
        }
    }

    pub fn finish(self) -> BoundsReport {
        self.report
    }
}

/// Bounds of a resolved record sequence.
pub fn compute_bounds(records: &[OpcodeRecord], default_font_size: f64) -> BoundsReport {
    let mut calculator = BoundsCalculator::new(default_font_size);
    calculator.add_all(records);
    calculator.finish()
}

fn vectors(points: &[LogicalPoint]) -> Vec<Vector2> {
    points.iter().map(|p| p.to_vector()).collect()
}

/// Corners of the square of half-size `radius` around `center`.
fn around(center: LogicalPoint, radius: f64) -> Vec<Vector2> {
    let c = center.to_vector();
    vec![
        Vector2::new(c.x - radius, c.y - radius),
        Vector2::new(c.x + radius, c.y + radius),
    ]
}

fn text_extents(text: &Text, default_font_size: f64) -> Vec<Vector2> {
    let size = match &text.font_ref {
        Some(font) if font.height > 0 => font.height as f64,
        _ => default_font_size,
    };
    let anchor = text.position.to_vector();
    let width = text.char_count() as f64 * size * TEXT_ADVANCE_FACTOR;
    vec![anchor, Vector2::new(anchor.x + width, anchor.y + size)]
}

/// Points whose box encloses the record.
fn record_extents(record: &OpcodeRecord, default_font_size: f64) -> Vec<Vector2> {
    match record {
        OpcodeRecord::Line(line) => vectors(&[line.start, line.end]),
        OpcodeRecord::Polyline(list)
        | OpcodeRecord::Polytriangle(list)
        | OpcodeRecord::Polymarker(list) => vectors(&list.vertices),
        OpcodeRecord::Circle(circle) => around(circle.center, circle.radius as f64),
        OpcodeRecord::Ellipse(ellipse) => around(ellipse.center, ellipse.max_radius() as f64),
        OpcodeRecord::Bezier(bezier) => vectors(&bezier.points),
        OpcodeRecord::ContourSet(set) => set
            .contours
            .iter()
            .flat_map(|c| c.iter().map(|p| p.to_vector()))
            .collect(),
        OpcodeRecord::GouraudTriangles(g) | OpcodeRecord::GouraudPolyline(g) => g
            .vertices
            .iter()
            .map(|v| v.position.to_vector())
            .collect(),
        OpcodeRecord::Text(text) => text_extents(text, default_font_size),
        OpcodeRecord::Image(image) => vectors(&[image.min_corner, image.max_corner]),
        _ => Vec::new(),
    }
}
