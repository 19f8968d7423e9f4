//! Encoders for the W2D primitive codecs.
//!
//! The byte layouts mirror [`W2dStreamReader`](super::stream_reader::W2dStreamReader)
//! exactly; this writer is what test fixtures and benchmarks use to build
//! opcode streams.

use crate::error::{DwfError, Result};
use crate::io::w2d::opcode::{Precision, EXTENDED_BINARY_CLOSE, EXTENDED_BINARY_OPEN};
use crate::io::w2d::stream_reader::MAX_COUNT;
use crate::types::{LogicalPoint, Rgba};

use byteorder::{LittleEndian, WriteBytesExt};

/// Encode a count in the short form (`1..=65 791`).
pub fn encode_count(count: usize) -> Result<Vec<u8>> {
    let mut writer = W2dStreamWriter::new();
    writer.write_count(count)?;
    Ok(writer.into_inner())
}

/// Growable buffer with W2D primitive encoders.
#[derive(Debug, Default, Clone)]
pub struct W2dStreamWriter {
    buffer: Vec<u8>,
}

impl W2dStreamWriter {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.buffer.write_u8(value)?;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.buffer.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.buffer.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.buffer.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.buffer.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Short count form: one byte for `1..=255`, else `0x00` + `count - 256`.
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        match count {
            1..=255 => self.write_u8(count as u8),
            256..=MAX_COUNT => {
                self.write_u8(0)?;
                self.write_u16((count - 256) as u16)
            }
            _ => Err(DwfError::Custom(format!(
                "count {} outside encodable range 1..={}",
                count, MAX_COUNT
            ))),
        }
    }

    /// Size-prefix count form.
    pub fn write_extended_count(&mut self, count: usize) -> Result<()> {
        if count < 0xFE {
            self.write_u8(count as u8)
        } else if count <= u16::MAX as usize {
            self.write_u8(0xFE)?;
            self.write_u16(count as u16)
        } else {
            let value = u32::try_from(count)
                .map_err(|_| DwfError::Custom(format!("count {} exceeds u32", count)))?;
            self.write_u8(0xFF)?;
            self.write_u32(value)
        }
    }

    /// Count-prefixed UTF-16LE string.
    pub fn write_utf16_string(&mut self, value: &str) -> Result<()> {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_count(units.len())?;
        for unit in units {
            self.write_u16(unit)?;
        }
        Ok(())
    }

    pub fn write_rgba(&mut self, color: Rgba) -> Result<()> {
        self.write_bytes(&color.to_bytes())
    }

    /// Coordinate pair at the given precision; 16-bit values must fit.
    pub fn write_point(&mut self, point: LogicalPoint, precision: Precision) -> Result<()> {
        match precision {
            Precision::Relative16 => {
                self.write_i16(narrow_i16(point.x)?)?;
                self.write_i16(narrow_i16(point.y)?)
            }
            Precision::Relative32 | Precision::Absolute32 => {
                self.write_i32(narrow_i32(point.x)?)?;
                self.write_i32(narrow_i32(point.y)?)
            }
        }
    }

    /// Wrap `payload` in an extended binary frame for opcode `id`.
    pub fn write_extended_binary(&mut self, id: u16, payload: &[u8]) -> Result<()> {
        let size = u32::try_from(payload.len() + 3)
            .map_err(|_| DwfError::Custom("extended binary payload too large".to_string()))?;
        self.write_u8(EXTENDED_BINARY_OPEN)?;
        self.write_u32(size)?;
        self.write_u16(id)?;
        self.write_bytes(payload)?;
        self.write_u8(EXTENDED_BINARY_CLOSE)
    }

    /// Write an extended ASCII opcode `(name args)`.
    pub fn write_extended_ascii(&mut self, name: &str, args: &str) -> Result<()> {
        self.write_u8(b'(')?;
        self.write_bytes(name.as_bytes())?;
        if !args.is_empty() {
            self.write_u8(b' ')?;
            self.write_bytes(args.as_bytes())?;
        }
        self.write_u8(b')')
    }
}

fn narrow_i16(value: i64) -> Result<i16> {
    i16::try_from(value).map_err(|_| DwfError::Custom(format!("{} does not fit in i16", value)))
}

fn narrow_i32(value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| DwfError::Custom(format!("{} does not fit in i32", value)))
}
