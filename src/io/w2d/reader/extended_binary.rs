//! Extended binary opcodes: `{` + `u32` size + `u16` id + payload + `}`.
//!
//! The size counts the id, the payload and the closing brace, so a frame
//! with an empty payload has size 3. Size 0 marks a self-delimiting
//! compressed section whose end is only known after inflating it.

use crate::error::{DwfError, Result};
use crate::io::w2d::context::DecodeContext;
use crate::io::w2d::opcode::{ExtendedBinaryOpcode, EXTENDED_BINARY_OPEN};
use crate::io::w2d::stream_reader::W2dStreamReader;
use crate::records::OpcodeRecord;

use super::image::{read_color_map, read_image};

use flate2::bufread::ZlibDecoder;
use std::io::Read;

/// Bytes of a frame's size field that are not payload (id + `}`)
pub const FRAME_OVERHEAD: u32 = 3;

/// Fixed part of an extended binary frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryHeader {
    pub size: u32,
    pub id: u16,
}

impl BinaryHeader {
    /// Payload length, or `None` for the self-delimiting form.
    pub fn payload_len(&self) -> Option<usize> {
        match self.size {
            0 => None,
            n => Some(n.saturating_sub(FRAME_OVERHEAD) as usize),
        }
    }
}

/// Consume `{`, the size and the id.
pub(crate) fn read_header(reader: &mut W2dStreamReader<'_>) -> Result<BinaryHeader> {
    let offset = reader.position();
    reader.ensure(7)?;
    if reader.read_u8()? != EXTENDED_BINARY_OPEN {
        return Err(DwfError::MalformedExtendedFrame {
            offset,
            reason: "expected '{'".to_string(),
        });
    }
    let size = reader.read_u32()?;
    let id = reader.read_u16()?;
    if size != 0 && size < FRAME_OVERHEAD {
        return Err(DwfError::MalformedExtendedFrame {
            offset,
            reason: format!("frame size {} is smaller than its header", size),
        });
    }
    Ok(BinaryHeader { size, id })
}

/// Decode the payload of a recognised frame.
///
/// Returns the record and the number of payload bytes left unread.
pub(crate) fn decode_payload(
    op: ExtendedBinaryOpcode,
    id: u16,
    payload: &[u8],
    payload_offset: u64,
    ctx: &mut DecodeContext,
) -> Result<(OpcodeRecord, usize)> {
    let mut reader = W2dStreamReader::with_base_offset(payload, payload_offset);
    let record = match op {
        ExtendedBinaryOpcode::ColorMap => {
            let map = read_color_map(&mut reader)?;
            ctx.color_map = map.clone();
            OpcodeRecord::SetColorMap(map)
        }
        ExtendedBinaryOpcode::Image(format) => OpcodeRecord::Image(read_image(&mut reader, format)?),
        ExtendedBinaryOpcode::Opaque(kind) => OpcodeRecord::Opaque {
            kind,
            opcode: id,
            bytes: reader.read_bytes(payload.len())?.to_vec(),
        },
        ExtendedBinaryOpcode::Compression(_) => {
            return Err(DwfError::MalformedExtendedFrame {
                offset: payload_offset,
                reason: "compression marker has no record payload".to_string(),
            })
        }
    };
    Ok((record, reader.remaining()))
}

/// Inflate one zlib stream from the front of `data`.
///
/// Returns the inflated bytes and how many input bytes the stream
/// occupied. Output beyond `limit` bytes is rejected.
pub(crate) fn inflate_zlib(data: &[u8], limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut input = data;
    let mut inflated = Vec::new();
    {
        let decoder = ZlibDecoder::new(&mut input);
        decoder
            .take(limit as u64 + 1)
            .read_to_end(&mut inflated)
            .map_err(|e| DwfError::Decompression(e.to_string()))?;
    }
    if inflated.len() > limit {
        return Err(DwfError::Decompression(format!(
            "inflated section exceeds {} bytes",
            limit
        )));
    }
    Ok((inflated, data.len() - input.len()))
}
