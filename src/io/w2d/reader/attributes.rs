//! Attribute / graphics-state opcode decoders.
//!
//! Each decoder updates the matching field of the decode context and
//! returns a record describing the change. None of them produce geometry.

use crate::error::Result;
use crate::io::w2d::context::DecodeContext;
use crate::io::w2d::opcode::NodeAddressing;
use crate::io::w2d::stream_reader::W2dStreamReader;
use crate::records::{Layer, ObjectNode, OpcodeRecord};
use crate::types::{Color, LinePattern, LineWeight};

/// Absolute 32-bit origin. The resolver applies it to the context.
pub(crate) fn read_set_origin(reader: &mut W2dStreamReader<'_>) -> Result<OpcodeRecord> {
    Ok(OpcodeRecord::SetOrigin(reader.read_point32()?))
}

pub(crate) fn read_color_index(
    reader: &mut W2dStreamReader<'_>,
    ctx: &mut DecodeContext,
) -> Result<OpcodeRecord> {
    let color = Color::Index(reader.read_u8()?);
    ctx.current_color = color;
    Ok(OpcodeRecord::SetColor(color))
}

pub(crate) fn read_color_rgba(
    reader: &mut W2dStreamReader<'_>,
    ctx: &mut DecodeContext,
) -> Result<OpcodeRecord> {
    let color = Color::Rgba(reader.read_rgba()?);
    ctx.current_color = color;
    Ok(OpcodeRecord::SetColor(color))
}

pub(crate) fn set_fill(ctx: &mut DecodeContext, on: bool) -> OpcodeRecord {
    ctx.current_fill = on;
    OpcodeRecord::SetFill(on)
}

pub(crate) fn set_visibility(ctx: &mut DecodeContext, on: bool) -> OpcodeRecord {
    ctx.current_visibility = on;
    OpcodeRecord::SetVisibility(on)
}

pub(crate) fn read_line_weight(
    reader: &mut W2dStreamReader<'_>,
    ctx: &mut DecodeContext,
) -> Result<OpcodeRecord> {
    let weight = LineWeight::from_value(reader.read_i32()?);
    ctx.current_line_weight = weight;
    Ok(OpcodeRecord::SetLineWeight(weight))
}

pub(crate) fn read_line_pattern(
    reader: &mut W2dStreamReader<'_>,
    ctx: &mut DecodeContext,
) -> Result<OpcodeRecord> {
    let pattern = LinePattern::from_id(reader.read_u8()?);
    ctx.current_line_pattern = pattern;
    Ok(OpcodeRecord::SetLinePattern(pattern))
}

/// Layer number in the short count form.
pub(crate) fn read_layer(
    reader: &mut W2dStreamReader<'_>,
    ctx: &mut DecodeContext,
) -> Result<OpcodeRecord> {
    let layer = Layer {
        number: reader.read_count()? as i32,
        name: None,
    };
    ctx.set_layer(&layer);
    Ok(OpcodeRecord::SetLayer(layer))
}

/// Object node in one of the three addressing modes.
pub(crate) fn read_object_node(
    reader: &mut W2dStreamReader<'_>,
    ctx: &mut DecodeContext,
    addressing: NodeAddressing,
    opcode_offset: u64,
) -> Result<OpcodeRecord> {
    let value = match addressing {
        NodeAddressing::Absolute32 => reader.read_i32()? as i64,
        NodeAddressing::Delta16 => reader.read_i16()? as i64,
        NodeAddressing::AutoIncrement => 0,
    };
    let id = ctx.next_object_node(addressing, value, opcode_offset)?;
    Ok(OpcodeRecord::ObjectNode(ObjectNode { id, name: None }))
}
