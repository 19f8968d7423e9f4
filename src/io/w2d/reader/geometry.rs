//! Geometry opcode decoders.
//!
//! Decoders only read and tag coordinates; turning deltas into absolute
//! points is the coordinate resolver's job.

use crate::error::{DwfError, Result};
use crate::io::w2d::opcode::{GeometryOp, Precision};
use crate::io::w2d::stream_reader::W2dStreamReader;
use crate::records::{
    Bezier, Circle, ContourSet, Ellipse, Gouraud, GouraudVertex, Line, OpcodeRecord, PointList,
};

/// Minimum vertex counts per opcode family
const MIN_POLYLINE: usize = 2;
const MIN_POLYTRIANGLE: usize = 3;
const MIN_POLYMARKER: usize = 1;
const MIN_CONTOUR: usize = 3;
const MIN_GOURAUD_TRIANGLES: usize = 3;
const MIN_GOURAUD_POLYLINE: usize = 2;

/// Decode the payload of a geometry opcode (the opcode byte is already
/// consumed).
pub(crate) fn read_geometry(
    reader: &mut W2dStreamReader<'_>,
    op: GeometryOp,
    precision: Precision,
) -> Result<OpcodeRecord> {
    let relative = precision.is_relative();
    let record = match op {
        GeometryOp::Line => {
            let points = reader.read_points(2, precision)?;
            OpcodeRecord::Line(Line {
                start: points[0],
                end: points[1],
                relative,
            })
        }
        GeometryOp::Polyline => {
            OpcodeRecord::Polyline(read_point_list(reader, precision, MIN_POLYLINE)?)
        }
        GeometryOp::Polytriangle => {
            OpcodeRecord::Polytriangle(read_point_list(reader, precision, MIN_POLYTRIANGLE)?)
        }
        GeometryOp::Polymarker => {
            OpcodeRecord::Polymarker(read_point_list(reader, precision, MIN_POLYMARKER)?)
        }
        GeometryOp::Circle => OpcodeRecord::Circle(read_circle(reader, precision)?),
        GeometryOp::Ellipse => OpcodeRecord::Ellipse(read_ellipse(reader, precision)?),
        GeometryOp::Bezier => OpcodeRecord::Bezier(read_bezier(reader, precision)?),
        GeometryOp::ContourSet => OpcodeRecord::ContourSet(read_contour_set(reader, precision)?),
        GeometryOp::GouraudPolytriangle => OpcodeRecord::GouraudTriangles(read_gouraud(
            reader,
            precision,
            MIN_GOURAUD_TRIANGLES,
        )?),
        GeometryOp::GouraudPolyline => OpcodeRecord::GouraudPolyline(read_gouraud(
            reader,
            precision,
            MIN_GOURAUD_POLYLINE,
        )?),
    };
    Ok(record)
}

/// Read a count and reject it when below `minimum`.
fn read_count_at_least(reader: &mut W2dStreamReader<'_>, minimum: usize) -> Result<usize> {
    let offset = reader.position();
    let count = reader.read_count()?;
    if count < minimum {
        return Err(DwfError::InvalidCount {
            offset,
            count,
            minimum,
        });
    }
    Ok(count)
}

fn read_point_list(
    reader: &mut W2dStreamReader<'_>,
    precision: Precision,
    minimum: usize,
) -> Result<PointList> {
    let count = read_count_at_least(reader, minimum)?;
    let vertices = reader.read_points(count, precision)?;
    Ok(PointList::new(vertices, precision.is_relative()))
}

fn read_circle(reader: &mut W2dStreamReader<'_>, precision: Precision) -> Result<Circle> {
    let radius_size = match precision {
        Precision::Relative16 => 2,
        _ => 4,
    };
    reader.ensure(precision.point_size() + radius_size)?;

    let center = reader.read_point(precision)?;
    let radius = match precision {
        Precision::Relative16 => reader.read_u16()? as u32,
        _ => reader.read_u32()?,
    };
    Ok(Circle {
        center,
        radius,
        relative: precision.is_relative(),
    })
}

fn read_ellipse(reader: &mut W2dStreamReader<'_>, precision: Precision) -> Result<Ellipse> {
    reader.ensure(precision.point_size() + 4 + 4 + 2 + 2 + 2)?;

    let center = reader.read_point(precision)?;
    let major = reader.read_u32()?;
    let minor = reader.read_u32()?;
    let start_angle = reader.read_u16()?;
    let end_angle = reader.read_u16()?;
    let tilt = reader.read_u16()?;
    Ok(Ellipse {
        center,
        major,
        minor,
        start_angle,
        end_angle,
        tilt,
        relative: precision.is_relative(),
    })
}

/// Segment count, then the shared start point and three points per
/// segment.
fn read_bezier(reader: &mut W2dStreamReader<'_>, precision: Precision) -> Result<Bezier> {
    let segments = read_count_at_least(reader, 1)?;
    let points = reader.read_points(1 + 3 * segments, precision)?;
    Ok(Bezier {
        points,
        relative: precision.is_relative(),
    })
}

/// Contour count, then one point count per contour, then every point in
/// contour order.
fn read_contour_set(
    reader: &mut W2dStreamReader<'_>,
    precision: Precision,
) -> Result<ContourSet> {
    let contour_count = read_count_at_least(reader, 1)?;
    let mut counts = Vec::with_capacity(contour_count);
    for _ in 0..contour_count {
        counts.push(read_count_at_least(reader, MIN_CONTOUR)?);
    }

    let total: usize = counts.iter().sum();
    reader.ensure(total * precision.point_size())?;

    let contours = counts
        .into_iter()
        .map(|n| reader.read_points(n, precision))
        .collect::<Result<Vec<_>>>()?;
    Ok(ContourSet {
        contours,
        relative: precision.is_relative(),
    })
}

/// Vertex count, then (point, RGBA) per vertex.
fn read_gouraud(
    reader: &mut W2dStreamReader<'_>,
    precision: Precision,
    minimum: usize,
) -> Result<Gouraud> {
    let count = read_count_at_least(reader, minimum)?;
    reader.ensure(count * (precision.point_size() + 4))?;

    let mut vertices = Vec::with_capacity(count);
    for _ in 0..count {
        let position = reader.read_point(precision)?;
        let color = reader.read_rgba()?;
        vertices.push(GouraudVertex { position, color });
    }
    Ok(Gouraud {
        vertices,
        relative: precision.is_relative(),
    })
}
