//! Forward-only byte cursor with the W2D primitive codecs.
//!
//! Every read checks availability up front: a read that fails with
//! [`DwfError::TruncatedStream`] leaves the cursor where it was, so callers
//! never observe a half-decoded field.
//!
//! Two count encodings exist and are not interchangeable:
//!
//! - [`read_count`](W2dStreamReader::read_count): one byte, or `0` followed
//!   by a `u16` meaning `256 + value`. Used for point/vertex counts, contour
//!   counts, UTF-16 string lengths and layer numbers.
//! - [`read_extended_count`](W2dStreamReader::read_extended_count): one
//!   byte, or `0xFE` + `u16`, or `0xFF` + `u32`. Used for complex-text
//!   position lists and image color maps.

use crate::error::{DwfError, Result};
use crate::io::w2d::opcode::{Precision, EXTENDED_ASCII_CLOSE, EXTENDED_ASCII_OPEN};
use crate::types::{LogicalPoint, Rgba};

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// Largest value the short count form can carry
pub const MAX_COUNT: usize = 256 + u16::MAX as usize;

/// Byte cursor over an in-memory opcode stream.
pub struct W2dStreamReader<'a> {
    cursor: Cursor<&'a [u8]>,
    base_offset: u64,
}

impl<'a> W2dStreamReader<'a> {
    /// Create a reader over a full stream.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base_offset(data, 0)
    }

    /// Create a reader over a sub-slice whose first byte sits at
    /// `base_offset` in the enclosing stream. Error offsets are reported
    /// relative to the enclosing stream.
    pub fn with_base_offset(data: &'a [u8], base_offset: u64) -> Self {
        Self {
            cursor: Cursor::new(data),
            base_offset,
        }
    }

    /// Absolute offset of the next byte.
    pub fn position(&self) -> u64 {
        self.base_offset + self.cursor.position()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        let data = *self.cursor.get_ref();
        data.len().saturating_sub(self.cursor.position() as usize)
    }

    /// True when the stream is exhausted.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread bytes, without consuming them.
    pub fn remaining_slice(&self) -> &'a [u8] {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = (self.cursor.position() as usize).min(data.len());
        &data[start..]
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.remaining_slice().first().copied()
    }

    /// Fail with `TruncatedStream` unless `needed` bytes are available.
    pub fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(DwfError::TruncatedStream {
                offset: self.position(),
                needed,
                available,
            });
        }
        Ok(())
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.cursor.set_position(self.cursor.position() + n as u64);
        Ok(())
    }

    /// Borrow the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.remaining_slice()[..n];
        self.cursor.set_position(self.cursor.position() + n as u64);
        Ok(slice)
    }

    // ---------------------------------------------------------------
    // Fixed-width integers
    // ---------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.cursor.read_i16::<LittleEndian>()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    // ---------------------------------------------------------------
    // Variable-length counts
    // ---------------------------------------------------------------

    /// Short count form: `1..=255` in one byte, otherwise `0x00` + `u16`
    /// giving `256 + value` (range 1..=65 791).
    pub fn read_count(&mut self) -> Result<usize> {
        self.ensure(1)?;
        match self.peek_u8() {
            Some(0) => {
                self.ensure(3)?;
                self.skip(1)?;
                Ok(256 + self.read_u16()? as usize)
            }
            _ => Ok(self.read_u8()? as usize),
        }
    }

    /// Size-prefix count form: `0xFE` + `u16`, `0xFF` + `u32`, otherwise
    /// the byte itself.
    pub fn read_extended_count(&mut self) -> Result<usize> {
        self.ensure(1)?;
        match self.peek_u8() {
            Some(0xFE) => {
                self.ensure(3)?;
                self.skip(1)?;
                Ok(self.read_u16()? as usize)
            }
            Some(0xFF) => {
                self.ensure(5)?;
                self.skip(1)?;
                Ok(self.read_u32()? as usize)
            }
            _ => Ok(self.read_u8()? as usize),
        }
    }

    // ---------------------------------------------------------------
    // Composite values
    // ---------------------------------------------------------------

    /// Count-prefixed UTF-16LE string; the count is in code units.
    pub fn read_utf16_string(&mut self) -> Result<String> {
        let offset = self.position();
        let units = self.read_count()?;
        let bytes = self.read_bytes(units * 2)?;
        let code_units = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
        char::decode_utf16(code_units)
            .collect::<std::result::Result<String, _>>()
            .map_err(|_| DwfError::InvalidString { offset })
    }

    /// Four channel bytes in R, G, B, A order.
    pub fn read_rgba(&mut self) -> Result<Rgba> {
        let b = self.read_bytes(4)?;
        Ok(Rgba::new(b[0], b[1], b[2], b[3]))
    }

    /// Pair of signed 16-bit coordinates.
    pub fn read_point16(&mut self) -> Result<LogicalPoint> {
        self.ensure(4)?;
        let x = self.read_i16()? as i64;
        let y = self.read_i16()? as i64;
        Ok(LogicalPoint::new(x, y))
    }

    /// Pair of signed 32-bit coordinates.
    pub fn read_point32(&mut self) -> Result<LogicalPoint> {
        self.ensure(8)?;
        let x = self.read_i32()? as i64;
        let y = self.read_i32()? as i64;
        Ok(LogicalPoint::new(x, y))
    }

    /// One coordinate pair at the given precision.
    pub fn read_point(&mut self, precision: Precision) -> Result<LogicalPoint> {
        match precision {
            Precision::Relative16 => self.read_point16(),
            Precision::Relative32 | Precision::Absolute32 => self.read_point32(),
        }
    }

    /// `count` coordinate pairs; all bytes are checked before any is read.
    pub fn read_points(&mut self, count: usize, precision: Precision) -> Result<Vec<LogicalPoint>> {
        self.ensure(count * precision.point_size())?;
        (0..count).map(|_| self.read_point(precision)).collect()
    }

    // ---------------------------------------------------------------
    // Extended ASCII framing
    // ---------------------------------------------------------------

    /// Consume a `( ... )` frame and return the bytes between the
    /// delimiters. Nested parentheses and quoted strings are honoured
    /// when locating the closing `)`.
    pub fn read_extended_ascii_frame(&mut self) -> Result<&'a [u8]> {
        let offset = self.position();
        let data = self.remaining_slice();
        if data.first() != Some(&EXTENDED_ASCII_OPEN) {
            return Err(DwfError::MalformedExtendedFrame {
                offset,
                reason: "expected '('".to_string(),
            });
        }

        let end = find_frame_end(data).ok_or_else(|| DwfError::MalformedExtendedFrame {
            offset,
            reason: "missing closing ')'".to_string(),
        })?;
        self.skip(end + 1)?;
        Ok(&data[1..end])
    }
}

/// Index of the `)` matching the `(` at `data[0]`.
fn find_frame_end(data: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut token_start = true;

    for (i, &b) in data.iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'"' => quote = Some(b),
            b'\'' if token_start => quote = Some(b),
            EXTENDED_ASCII_OPEN => depth += 1,
            EXTENDED_ASCII_CLOSE => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        token_start = b.is_ascii_whitespace() || b == EXTENDED_ASCII_OPEN;
    }
    None
}
