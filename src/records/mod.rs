//! Decoded opcode records
//!
//! Every opcode in a W2D stream decodes to exactly one [`OpcodeRecord`].
//! Geometry variants carry a `relative` flag; after coordinate resolution
//! the flag is cleared and every point is absolute.

use crate::types::{Color, ColorMap, LineWeight, LinePattern, LogicalPoint};
use std::fmt;

pub mod geometry;
pub mod image;
pub mod text;

pub use geometry::{
    angle_to_degrees, Bezier, Circle, ContourSet, Ellipse, Gouraud, GouraudVertex, Line,
    PointList,
};
pub use image::{Image, ImageFormat};
pub use text::{FontRef, Text, TextOptionFlags, TextOptions};

/// Layer assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub number: i32,
    pub name: Option<String>,
}

/// Object node (grouping id for the primitives that follow)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNode {
    /// Absolute node number after delta/auto-increment addressing
    pub id: i64,
    pub name: Option<String>,
}

/// Payloads carried through without interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    EmbeddedFont,
    Signature,
    UserData,
}

/// The wire sub-format an opcode was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeFormat {
    SingleByte,
    ExtendedAscii,
    ExtendedBinary,
}

impl fmt::Display for OpcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpcodeFormat::SingleByte => write!(f, "single-byte"),
            OpcodeFormat::ExtendedAscii => write!(f, "extended ASCII"),
            OpcodeFormat::ExtendedBinary => write!(f, "extended binary"),
        }
    }
}

/// Opcode the decoder could not interpret, with the bytes it skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecord {
    pub format: OpcodeFormat,
    /// Opcode name (extended ASCII) or hex id
    pub opcode: String,
    pub offset: u64,
    pub raw_bytes: Vec<u8>,
}

/// Primitive kinds that contribute to a bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Line,
    Polyline,
    Polytriangle,
    Polymarker,
    Circle,
    Ellipse,
    Bezier,
    ContourSet,
    GouraudTriangles,
    GouraudPolyline,
    Text,
    Image,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One decoded opcode
#[derive(Debug, Clone, PartialEq)]
pub enum OpcodeRecord {
    // Geometry
    Line(Line),
    Polyline(PointList),
    Polytriangle(PointList),
    Polymarker(PointList),
    Circle(Circle),
    Ellipse(Ellipse),
    Bezier(Bezier),
    ContourSet(ContourSet),
    GouraudTriangles(Gouraud),
    GouraudPolyline(Gouraud),
    Text(Text),
    Image(Image),

    // Graphics state
    SetOrigin(LogicalPoint),
    SetColor(Color),
    SetColorMap(ColorMap),
    SetFill(bool),
    SetVisibility(bool),
    SetLineWeight(LineWeight),
    SetLinePattern(LinePattern),
    SetLayer(Layer),
    SetFont(FontRef),
    ObjectNode(ObjectNode),

    // Stream metadata
    Version { major: u8, minor: u8 },
    Metadata { name: String, value: String },
    Opaque { kind: OpaqueKind, opcode: u16, bytes: Vec<u8> },
    EndOfStream,
    Unknown(UnknownRecord),
}

impl OpcodeRecord {
    /// Bounding-box category, `None` for state and metadata records
    pub fn kind(&self) -> Option<PrimitiveKind> {
        let kind = match self {
            OpcodeRecord::Line(_) => PrimitiveKind::Line,
            OpcodeRecord::Polyline(_) => PrimitiveKind::Polyline,
            OpcodeRecord::Polytriangle(_) => PrimitiveKind::Polytriangle,
            OpcodeRecord::Polymarker(_) => PrimitiveKind::Polymarker,
            OpcodeRecord::Circle(_) => PrimitiveKind::Circle,
            OpcodeRecord::Ellipse(_) => PrimitiveKind::Ellipse,
            OpcodeRecord::Bezier(_) => PrimitiveKind::Bezier,
            OpcodeRecord::ContourSet(_) => PrimitiveKind::ContourSet,
            OpcodeRecord::GouraudTriangles(_) => PrimitiveKind::GouraudTriangles,
            OpcodeRecord::GouraudPolyline(_) => PrimitiveKind::GouraudPolyline,
            OpcodeRecord::Text(_) => PrimitiveKind::Text,
            OpcodeRecord::Image(_) => PrimitiveKind::Image,
            _ => return None,
        };
        Some(kind)
    }

    /// True for records that draw something
    pub fn is_geometry(&self) -> bool {
        self.kind().is_some()
    }

    /// True for geometry whose points are still deltas
    pub fn is_relative(&self) -> bool {
        match self {
            OpcodeRecord::Line(r) => r.relative,
            OpcodeRecord::Polyline(r)
            | OpcodeRecord::Polytriangle(r)
            | OpcodeRecord::Polymarker(r) => r.relative,
            OpcodeRecord::Circle(r) => r.relative,
            OpcodeRecord::Ellipse(r) => r.relative,
            OpcodeRecord::Bezier(r) => r.relative,
            OpcodeRecord::ContourSet(r) => r.relative,
            OpcodeRecord::GouraudTriangles(r) | OpcodeRecord::GouraudPolyline(r) => r.relative,
            OpcodeRecord::Text(r) => r.relative,
            _ => false,
        }
    }

    /// Short record name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            OpcodeRecord::Line(_) => "Line",
            OpcodeRecord::Polyline(_) => "Polyline",
            OpcodeRecord::Polytriangle(_) => "Polytriangle",
            OpcodeRecord::Polymarker(_) => "Polymarker",
            OpcodeRecord::Circle(_) => "Circle",
            OpcodeRecord::Ellipse(_) => "Ellipse",
            OpcodeRecord::Bezier(_) => "Bezier",
            OpcodeRecord::ContourSet(_) => "ContourSet",
            OpcodeRecord::GouraudTriangles(_) => "GouraudTriangles",
            OpcodeRecord::GouraudPolyline(_) => "GouraudPolyline",
            OpcodeRecord::Text(_) => "Text",
            OpcodeRecord::Image(_) => "Image",
            OpcodeRecord::SetOrigin(_) => "SetOrigin",
            OpcodeRecord::SetColor(_) => "SetColor",
            OpcodeRecord::SetColorMap(_) => "SetColorMap",
            OpcodeRecord::SetFill(_) => "SetFill",
            OpcodeRecord::SetVisibility(_) => "SetVisibility",
            OpcodeRecord::SetLineWeight(_) => "SetLineWeight",
            OpcodeRecord::SetLinePattern(_) => "SetLinePattern",
            OpcodeRecord::SetLayer(_) => "SetLayer",
            OpcodeRecord::SetFont(_) => "SetFont",
            OpcodeRecord::ObjectNode(_) => "ObjectNode",
            OpcodeRecord::Version { .. } => "Version",
            OpcodeRecord::Metadata { .. } => "Metadata",
            OpcodeRecord::Opaque { .. } => "Opaque",
            OpcodeRecord::EndOfStream => "EndOfStream",
            OpcodeRecord::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for OpcodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpcodeRecord::Line(l) => write!(f, "Line {} -> {}", l.start, l.end),
            OpcodeRecord::Polyline(p) | OpcodeRecord::Polytriangle(p) | OpcodeRecord::Polymarker(p) => {
                write!(f, "{} [{} points]", self.name(), p.vertices.len())
            }
            OpcodeRecord::Circle(c) => write!(f, "Circle {} r={}", c.center, c.radius),
            OpcodeRecord::Ellipse(e) => write!(
                f,
                "Ellipse {} {}x{} {:.1}..{:.1} tilt {:.1}",
                e.center,
                e.major,
                e.minor,
                e.start_degrees(),
                e.end_degrees(),
                e.tilt_degrees()
            ),
            OpcodeRecord::Bezier(b) => write!(f, "Bezier [{} segments]", b.segment_count()),
            OpcodeRecord::ContourSet(c) => write!(
                f,
                "ContourSet [{} contours, {} points]",
                c.contours.len(),
                c.point_count()
            ),
            OpcodeRecord::GouraudTriangles(g) | OpcodeRecord::GouraudPolyline(g) => {
                write!(f, "{} [{} vertices]", self.name(), g.vertices.len())
            }
            OpcodeRecord::Text(t) => {
                write!(f, "Text {} {:?}", t.position, t.string)?;
                let flags = t.options.flags();
                if !flags.is_empty() {
                    f.write_str(" [")?;
                    bitflags::parser::to_writer(&flags, &mut *f)?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            OpcodeRecord::Image(i) => write!(
                f,
                "Image {} {}x{} {} -> {}",
                i.format, i.columns, i.rows, i.min_corner, i.max_corner
            ),
            OpcodeRecord::SetOrigin(p) => write!(f, "SetOrigin {}", p),
            OpcodeRecord::SetColor(c) => write!(f, "SetColor {}", c),
            OpcodeRecord::SetColorMap(m) => write!(f, "SetColorMap [{} entries]", m.len()),
            OpcodeRecord::SetFill(on) => write!(f, "SetFill {}", on),
            OpcodeRecord::SetVisibility(on) => write!(f, "SetVisibility {}", on),
            OpcodeRecord::SetLineWeight(w) => write!(f, "SetLineWeight {}", w.value()),
            OpcodeRecord::SetLinePattern(p) => write!(f, "SetLinePattern {}", p),
            OpcodeRecord::SetLayer(l) => match &l.name {
                Some(name) => write!(f, "SetLayer {} {:?}", l.number, name),
                None => write!(f, "SetLayer {}", l.number),
            },
            OpcodeRecord::SetFont(font) => {
                write!(f, "SetFont {:?} h={}", font.name, font.height)
            }
            OpcodeRecord::ObjectNode(n) => write!(f, "ObjectNode {}", n.id),
            OpcodeRecord::Version { major, minor } => {
                write!(f, "Version {}.{:02}", major, minor)
            }
            OpcodeRecord::Metadata { name, value } => write!(f, "{} = {:?}", name, value),
            OpcodeRecord::Opaque { kind, opcode, bytes } => {
                write!(f, "Opaque {:?} {:#06X} [{} bytes]", kind, opcode, bytes.len())
            }
            OpcodeRecord::EndOfStream => write!(f, "EndOfStream"),
            OpcodeRecord::Unknown(u) => write!(
                f,
                "Unknown {} opcode {} @{} [{} bytes]",
                u.format,
                u.opcode,
                u.offset,
                u.raw_bytes.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_records_are_not_geometry() {
        assert!(!OpcodeRecord::SetFill(true).is_geometry());
        assert!(!OpcodeRecord::SetOrigin(LogicalPoint::ZERO).is_geometry());
        assert_eq!(OpcodeRecord::SetFill(true).kind(), None);
    }

    #[test]
    fn test_kind_and_relative() {
        let rec = OpcodeRecord::Polymarker(PointList::new(vec![LogicalPoint::ZERO], true));
        assert_eq!(rec.kind(), Some(PrimitiveKind::Polymarker));
        assert!(rec.is_relative());
        assert_eq!(rec.name(), "Polymarker");
    }

    #[test]
    fn test_display() {
        let rec = OpcodeRecord::Line(Line {
            start: LogicalPoint::new(0, 100),
            end: LogicalPoint::new(200, 300),
            relative: false,
        });
        assert_eq!(rec.to_string(), "Line (0, 100) -> (200, 300)");
        assert_eq!(
            OpcodeRecord::Version { major: 6, minor: 0 }.to_string(),
            "Version 6.00"
        );
    }

    #[test]
    fn test_text_display_lists_options() {
        let mut text = Text {
            position: LogicalPoint::new(10, 20),
            string: "A1".to_string(),
            font_ref: None,
            options: TextOptions::default(),
            relative: false,
        };
        assert_eq!(
            OpcodeRecord::Text(text.clone()).to_string(),
            "Text (10, 20) \"A1\""
        );

        text.options.underscore = vec![0, 1];
        text.options.bounds = Some([LogicalPoint::ZERO; 4]);
        assert_eq!(
            OpcodeRecord::Text(text).to_string(),
            "Text (10, 20) \"A1\" [UNDERSCORE | BOUNDS]"
        );
    }
}
