//! Stream builders for integration tests.
//!
//! `StreamBuilder` writes opcodes with the library's own encoders so test
//! streams stay byte-exact without hand-assembled hex.

#![allow(dead_code)]

use dwfrust::io::w2d::opcode::{binary_ids, Precision};
use dwfrust::io::w2d::W2dStreamWriter;
use dwfrust::{LogicalPoint, Rgba};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

fn pt(p: (i64, i64)) -> LogicalPoint {
    LogicalPoint::new(p.0, p.1)
}

#[derive(Default)]
pub struct StreamBuilder {
    w: W2dStreamWriter,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(W2D V06.00)`
    pub fn header(self) -> Self {
        self.ascii("W2D", "V06.00")
    }

    pub fn ascii(mut self, name: &str, args: &str) -> Self {
        self.w.write_extended_ascii(name, args).unwrap();
        self
    }

    pub fn binary(mut self, id: u16, payload: &[u8]) -> Self {
        self.w.write_extended_binary(id, payload).unwrap();
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.w.write_bytes(bytes).unwrap();
        self
    }

    pub fn origin(mut self, x: i64, y: i64) -> Self {
        self.w.write_u8(b'O').unwrap();
        self.w
            .write_point(LogicalPoint::new(x, y), Precision::Absolute32)
            .unwrap();
        self
    }

    pub fn line16(mut self, a: (i64, i64), b: (i64, i64)) -> Self {
        self.w.write_u8(0x0C).unwrap();
        self.w.write_point(pt(a), Precision::Relative16).unwrap();
        self.w.write_point(pt(b), Precision::Relative16).unwrap();
        self
    }

    pub fn line32(mut self, a: (i64, i64), b: (i64, i64)) -> Self {
        self.w.write_u8(b'l').unwrap();
        self.w.write_point(pt(a), Precision::Relative32).unwrap();
        self.w.write_point(pt(b), Precision::Relative32).unwrap();
        self
    }

    fn point_list(mut self, opcode: u8, precision: Precision, points: &[(i64, i64)]) -> Self {
        self.w.write_u8(opcode).unwrap();
        self.w.write_count(points.len()).unwrap();
        for p in points {
            self.w.write_point(pt(*p), precision).unwrap();
        }
        self
    }

    pub fn polyline16(self, points: &[(i64, i64)]) -> Self {
        self.point_list(0x10, Precision::Relative16, points)
    }

    pub fn polyline32(self, points: &[(i64, i64)]) -> Self {
        self.point_list(b'p', Precision::Relative32, points)
    }

    pub fn polytriangle16(self, points: &[(i64, i64)]) -> Self {
        self.point_list(0x14, Precision::Relative16, points)
    }

    pub fn polymarker32(self, points: &[(i64, i64)]) -> Self {
        self.point_list(b'm', Precision::Relative32, points)
    }

    pub fn circle16(mut self, center: (i64, i64), radius: u16) -> Self {
        self.w.write_u8(0x12).unwrap();
        self.w.write_point(pt(center), Precision::Relative16).unwrap();
        self.w.write_u16(radius).unwrap();
        self
    }

    pub fn ellipse(mut self, center: (i64, i64), major: u32, minor: u32, angles: [u16; 3]) -> Self {
        self.w.write_u8(b'e').unwrap();
        self.w.write_point(pt(center), Precision::Relative32).unwrap();
        self.w.write_u32(major).unwrap();
        self.w.write_u32(minor).unwrap();
        for a in angles {
            self.w.write_u16(a).unwrap();
        }
        self
    }

    pub fn contours16(mut self, contours: &[&[(i64, i64)]]) -> Self {
        self.w.write_u8(0x0B).unwrap();
        self.w.write_count(contours.len()).unwrap();
        for c in contours {
            self.w.write_count(c.len()).unwrap();
        }
        for c in contours {
            for p in c.iter() {
                self.w.write_point(pt(*p), Precision::Relative16).unwrap();
            }
        }
        self
    }

    pub fn gouraud_polyline16(mut self, vertices: &[((i64, i64), Rgba)]) -> Self {
        self.w.write_u8(0x11).unwrap();
        self.w.write_count(vertices.len()).unwrap();
        for (p, color) in vertices {
            self.w.write_point(pt(*p), Precision::Relative16).unwrap();
            self.w.write_rgba(*color).unwrap();
        }
        self
    }

    pub fn text(mut self, delta: (i64, i64), string: &str) -> Self {
        self.w.write_u8(b'x').unwrap();
        self.w.write_point(pt(delta), Precision::Relative32).unwrap();
        self.w.write_utf16_string(string).unwrap();
        self
    }

    pub fn color_rgba(mut self, color: Rgba) -> Self {
        self.w.write_u8(0x03).unwrap();
        self.w.write_rgba(color).unwrap();
        self
    }

    pub fn color_index(mut self, index: u8) -> Self {
        self.w.write_u8(b'C').unwrap();
        self.w.write_u8(index).unwrap();
        self
    }

    pub fn layer(mut self, number: usize) -> Self {
        self.w.write_u8(0xAC).unwrap();
        self.w.write_count(number).unwrap();
        self
    }

    pub fn node_absolute(mut self, id: i32) -> Self {
        self.w.write_u8(b'N').unwrap();
        self.w.write_i32(id).unwrap();
        self
    }

    pub fn node_delta(mut self, delta: i16) -> Self {
        self.w.write_u8(0x0E).unwrap();
        self.w.write_i16(delta).unwrap();
        self
    }

    pub fn node_next(mut self) -> Self {
        self.w.write_u8(b'n').unwrap();
        self
    }

    pub fn color_map(self, entries: &[Rgba]) -> Self {
        let mut payload = vec![(entries.len() % 256) as u8];
        for e in entries {
            payload.extend_from_slice(&e.to_bytes());
        }
        self.binary(binary_ids::COLOR_MAP, &payload)
    }

    /// Self-delimiting zlib section wrapping `inner`, closed with `}`.
    pub fn zlib_section(mut self, inner: &[u8]) -> Self {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(inner).unwrap();
        let compressed = encoder.finish().unwrap();

        self.w.write_u8(b'{').unwrap();
        self.w.write_u32(0).unwrap();
        self.w.write_u16(binary_ids::ZLIB_COMPRESSION).unwrap();
        self.w.write_bytes(&compressed).unwrap();
        self.w.write_u8(b'}').unwrap();
        self
    }

    pub fn end(self) -> Self {
        self.ascii("EndOfDWF", "")
    }

    pub fn build(self) -> Vec<u8> {
        self.w.into_inner()
    }
}
