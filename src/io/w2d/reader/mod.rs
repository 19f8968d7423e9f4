//! W2D opcode-stream reader.
//!
//! The dispatcher walks the stream one opcode at a time:
//!
//! 1. Skip whitespace separators between opcodes.
//! 2. `(` starts an extended ASCII opcode, `{` an extended binary opcode,
//!    anything else is looked up in the single-byte table.
//! 3. Each decoded record passes through the coordinate resolver (unless
//!    reading unresolved) and is appended to the drawing.
//! 4. The loop ends when the buffer is exhausted or `(EndOfDWF)` is seen.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dwfrust::io::w2d::W2dReader;
//!
//! let drawing = W2dReader::from_file("sheet.w2d")?.read()?;
//! ```

pub mod attributes;
pub mod extended_ascii;
pub mod extended_binary;
pub mod geometry;
pub mod image;
pub mod text;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::drawing::W2dDrawing;
use crate::error::{DwfError, Result};
use crate::io::w2d::context::DecodeContext;
use crate::io::w2d::opcode::{
    CompressionKind, ExtendedAsciiOpcode, ExtendedBinaryOpcode, SingleByteOpcode,
    EXTENDED_ASCII_OPEN, EXTENDED_BINARY_CLOSE, EXTENDED_BINARY_OPEN,
};
use crate::io::w2d::stream_reader::W2dStreamReader;
use crate::layout::resolver::CoordinateResolver;
use crate::notification::{NotificationCollection, NotificationType};
use crate::records::{OpcodeFormat, OpcodeRecord, UnknownRecord};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration options for the W2D reader.
#[derive(Debug, Clone)]
pub struct W2dReaderConfiguration {
    /// When `true`, a fatal decode error stops the read but the records
    /// decoded so far are returned, with the error recorded as a
    /// notification.
    ///
    /// Default: `false` (strict mode).
    pub failsafe: bool,

    /// When `true`, unrecognised extended opcodes are kept as
    /// [`OpcodeRecord::Unknown`] records rather than dropped.
    pub keep_unknown_opcodes: bool,

    /// Upper bound on the inflated size of one compressed section.
    pub max_inflated_size: usize,

    /// How deeply compressed sections may nest inside one another.
    ///
    /// Default: `1` (a compressed section may not contain another).
    pub max_section_depth: usize,
}

impl Default for W2dReaderConfiguration {
    fn default() -> Self {
        Self {
            failsafe: false,
            keep_unknown_opcodes: true,
            max_inflated_size: 256 * 1024 * 1024,
            max_section_depth: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// W2dReader
// ---------------------------------------------------------------------------

/// W2D stream reader: decodes a fully buffered opcode stream into a
/// [`W2dDrawing`].
pub struct W2dReader {
    data: Vec<u8>,
    config: W2dReaderConfiguration,
}

impl W2dReader {
    /// Reader over an in-memory stream.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            config: W2dReaderConfiguration::default(),
        }
    }

    /// Open a W2D stream by path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Buffer an entire byte stream.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_bytes(data))
    }

    /// Set configuration options.
    pub fn with_config(mut self, config: W2dReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Decode the stream with every coordinate resolved to absolute.
    pub fn read(self) -> Result<W2dDrawing> {
        decode(&self.data, &self.config, true)
    }

    /// Decode the stream, leaving relative coordinates as raw deltas.
    ///
    /// The result can be resolved later with [`W2dDrawing::resolve`].
    pub fn read_unresolved(self) -> Result<W2dDrawing> {
        decode(&self.data, &self.config, false)
    }
}

/// Decode independent streams in parallel, one context per stream.
pub fn read_many(streams: &[&[u8]], config: &W2dReaderConfiguration) -> Vec<Result<W2dDrawing>> {
    streams
        .par_iter()
        .map(|data| decode(data, config, true))
        .collect()
}

fn decode(data: &[u8], config: &W2dReaderConfiguration, resolve: bool) -> Result<W2dDrawing> {
    let mut dispatcher = Dispatcher::new(config, resolve);
    let mut reader = W2dStreamReader::new(data);

    if let Err(e) = dispatcher.run(&mut reader) {
        if !config.failsafe {
            return Err(e);
        }
        log::warn!("stopping decode: {}", e);
        dispatcher.notify_error(&e);
    }
    Ok(dispatcher.finish())
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

struct Dispatcher<'c> {
    config: &'c W2dReaderConfiguration,
    resolve: bool,
    ctx: DecodeContext,
    records: Vec<OpcodeRecord>,
    version: Option<(u8, u8)>,
    metadata: IndexMap<String, String>,
    notifications: NotificationCollection,
    terminated: bool,
    section_depth: usize,
}

impl<'c> Dispatcher<'c> {
    fn new(config: &'c W2dReaderConfiguration, resolve: bool) -> Self {
        Self {
            config,
            resolve,
            ctx: DecodeContext::new(),
            records: Vec::new(),
            version: None,
            metadata: IndexMap::new(),
            notifications: NotificationCollection::new(),
            terminated: false,
            section_depth: 0,
        }
    }

    fn finish(self) -> W2dDrawing {
        W2dDrawing {
            version: self.version,
            records: self.records,
            metadata: self.metadata,
            layers: self.ctx.layers,
            notifications: self.notifications,
            terminated: self.terminated,
        }
    }

    /// Decode opcodes until the reader is exhausted or the stream ends.
    fn run(&mut self, reader: &mut W2dStreamReader<'_>) -> Result<()> {
        while !self.terminated {
            let Some(byte) = reader.peek_u8() else {
                break;
            };
            let offset = reader.position();
            let record = match byte {
                EXTENDED_ASCII_OPEN => self.read_extended_ascii(reader, offset)?,
                EXTENDED_BINARY_OPEN => self.read_extended_binary(reader, offset)?,
                _ => self.read_single_byte(reader, offset)?,
            };
            if let Some(record) = record {
                self.emit(record, offset);
            }
        }
        Ok(())
    }

    fn emit(&mut self, mut record: OpcodeRecord, offset: u64) {
        if self.resolve {
            CoordinateResolver::new(&mut self.ctx).resolve(&mut record);
        }

        match &record {
            OpcodeRecord::Version { major, minor } => self.version = Some((*major, *minor)),
            OpcodeRecord::Metadata { name, value } => {
                self.metadata.insert(name.clone(), value.clone());
            }
            OpcodeRecord::EndOfStream => self.terminated = true,
            OpcodeRecord::Unknown(unknown) => {
                self.notifications.notify_at(
                    NotificationType::NotImplemented,
                    offset,
                    format!("unknown {} opcode {}", unknown.format, unknown.opcode),
                );
                if !self.config.keep_unknown_opcodes {
                    return;
                }
            }
            _ => {}
        }

        log::trace!("@{} {}", offset, record);
        self.records.push(record);
    }

    /// Record a recovered error and carry on.
    fn notify_error(&mut self, error: &DwfError) {
        match error.offset() {
            Some(offset) => {
                self.notifications
                    .notify_at(NotificationType::Error, offset, error.to_string())
            }
            None => self
                .notifications
                .notify(NotificationType::Error, error.to_string()),
        }
    }

    fn recover(&mut self, error: DwfError) {
        log::warn!("skipping opcode: {}", error);
        self.notify_error(&error);
    }

    // ------------------------------------------------------------------
    // Single-byte opcodes
    // ------------------------------------------------------------------

    fn read_single_byte(
        &mut self,
        reader: &mut W2dStreamReader<'_>,
        offset: u64,
    ) -> Result<Option<OpcodeRecord>> {
        let byte = reader.read_u8()?;
        let op = SingleByteOpcode::from_byte(byte).ok_or(DwfError::UnknownOpcode {
            offset,
            opcode: byte as u16,
        })?;

        let record = match op {
            SingleByteOpcode::Separator => return Ok(None),
            SingleByteOpcode::Geometry(shape, precision) => {
                geometry::read_geometry(reader, shape, precision)?
            }
            SingleByteOpcode::TextBasic => text::read_text(reader, &self.ctx, false)?,
            SingleByteOpcode::TextComplex => text::read_text(reader, &self.ctx, true)?,
            SingleByteOpcode::SetOrigin => attributes::read_set_origin(reader)?,
            SingleByteOpcode::ColorIndex => attributes::read_color_index(reader, &mut self.ctx)?,
            SingleByteOpcode::ColorRgba => attributes::read_color_rgba(reader, &mut self.ctx)?,
            SingleByteOpcode::Fill(on) => attributes::set_fill(&mut self.ctx, on),
            SingleByteOpcode::Visibility(on) => attributes::set_visibility(&mut self.ctx, on),
            SingleByteOpcode::LineWeight => attributes::read_line_weight(reader, &mut self.ctx)?,
            SingleByteOpcode::LinePattern => {
                attributes::read_line_pattern(reader, &mut self.ctx)?
            }
            SingleByteOpcode::Layer => attributes::read_layer(reader, &mut self.ctx)?,
            SingleByteOpcode::ObjectNode(addressing) => {
                attributes::read_object_node(reader, &mut self.ctx, addressing, offset)?
            }
        };
        Ok(Some(record))
    }

    // ------------------------------------------------------------------
    // Extended ASCII opcodes
    // ------------------------------------------------------------------

    fn read_extended_ascii(
        &mut self,
        reader: &mut W2dStreamReader<'_>,
        offset: u64,
    ) -> Result<Option<OpcodeRecord>> {
        let start = reader.remaining_slice();
        let body = reader.read_extended_ascii_frame()?;
        let raw = &start[..body.len() + 2];

        let frame = match extended_ascii::parse_frame(body, offset) {
            Ok(frame) => frame,
            Err(e) => {
                self.recover(e);
                return Ok(None);
            }
        };
        log::debug!("extended ASCII ({}) at {}", frame.name, offset);

        let Some(op) = ExtendedAsciiOpcode::from_name(&frame.name) else {
            return Ok(Some(OpcodeRecord::Unknown(UnknownRecord {
                format: OpcodeFormat::ExtendedAscii,
                opcode: frame.name,
                offset,
                raw_bytes: raw.to_vec(),
            })));
        };

        match extended_ascii::interpret(op, &frame, &mut self.ctx, offset) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                self.recover(e);
                Ok(None)
            }
        }
    }

    // ------------------------------------------------------------------
    // Extended binary opcodes
    // ------------------------------------------------------------------

    fn read_extended_binary(
        &mut self,
        reader: &mut W2dStreamReader<'_>,
        offset: u64,
    ) -> Result<Option<OpcodeRecord>> {
        let start = reader.remaining_slice();
        let header = extended_binary::read_header(reader)?;
        let op = ExtendedBinaryOpcode::from_id(header.id);
        log::debug!(
            "extended binary 0x{:04X} size {} at {}",
            header.id,
            header.size,
            offset
        );

        match op {
            Some(ExtendedBinaryOpcode::Compression(CompressionKind::Lz)) => {
                return Err(DwfError::UnsupportedCompression {
                    offset,
                    opcode: header.id,
                });
            }
            Some(ExtendedBinaryOpcode::Compression(CompressionKind::Zlib)) => {
                self.read_zlib_section(reader, header.payload_len(), offset)?;
                return Ok(None);
            }
            _ => {}
        }

        let Some(len) = header.payload_len() else {
            return Err(DwfError::MalformedExtendedFrame {
                offset,
                reason: format!("size 0 is not valid for opcode 0x{:04X}", header.id),
            });
        };
        let payload_offset = reader.position();
        let payload = reader.read_bytes(len)?;
        expect_close(reader)?;
        let raw = &start[..(reader.position() - offset) as usize];

        let Some(op) = op else {
            return Ok(Some(OpcodeRecord::Unknown(UnknownRecord {
                format: OpcodeFormat::ExtendedBinary,
                opcode: format!("0x{:04X}", header.id),
                offset,
                raw_bytes: raw.to_vec(),
            })));
        };

        match extended_binary::decode_payload(op, header.id, payload, payload_offset, &mut self.ctx)
        {
            Ok((record, trailing)) => {
                if trailing > 0 {
                    self.notifications.notify_at(
                        NotificationType::Warning,
                        offset,
                        format!(
                            "{} trailing byte(s) in opcode 0x{:04X}",
                            trailing, header.id
                        ),
                    );
                }
                Ok(Some(record))
            }
            Err(e) => {
                self.recover(e);
                Ok(None)
            }
        }
    }

    /// Inflate a zlib section and decode its contents with the same
    /// context. Offsets inside the section are relative to the inflated
    /// bytes.
    fn read_zlib_section(
        &mut self,
        reader: &mut W2dStreamReader<'_>,
        payload_len: Option<usize>,
        offset: u64,
    ) -> Result<()> {
        if self.section_depth >= self.config.max_section_depth {
            return Err(DwfError::MalformedExtendedFrame {
                offset,
                reason: format!(
                    "compressed sections nested deeper than {}",
                    self.config.max_section_depth
                ),
            });
        }

        let inflated = match payload_len {
            Some(len) => {
                let compressed = reader.read_bytes(len)?;
                expect_close(reader)?;
                extended_binary::inflate_zlib(compressed, self.config.max_inflated_size)?.0
            }
            None => {
                let (inflated, consumed) = extended_binary::inflate_zlib(
                    reader.remaining_slice(),
                    self.config.max_inflated_size,
                )?;
                reader.skip(consumed)?;
                if reader.peek_u8() == Some(EXTENDED_BINARY_CLOSE) {
                    reader.skip(1)?;
                }
                inflated
            }
        };

        log::debug!(
            "zlib section at {} inflated to {} bytes",
            offset,
            inflated.len()
        );
        let mut section = W2dStreamReader::new(&inflated);
        self.section_depth += 1;
        let result = self.run(&mut section);
        self.section_depth -= 1;
        result
    }
}

fn expect_close(reader: &mut W2dStreamReader<'_>) -> Result<()> {
    let offset = reader.position();
    match reader.read_u8()? {
        EXTENDED_BINARY_CLOSE => Ok(()),
        other => Err(DwfError::MalformedExtendedFrame {
            offset,
            reason: format!("expected '}}', found 0x{:02X}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::w2d::opcode::{binary_ids, Precision};
    use crate::io::w2d::stream_writer::W2dStreamWriter;
    use crate::types::LogicalPoint;

    #[test]
    fn test_default_configuration() {
        let config = W2dReaderConfiguration::default();
        assert!(!config.failsafe);
        assert!(config.keep_unknown_opcodes);
        assert_eq!(config.max_section_depth, 1);
    }

    #[test]
    fn test_empty_stream() {
        let drawing = W2dReader::from_bytes(Vec::new()).read().unwrap();
        assert!(drawing.records.is_empty());
        assert!(!drawing.terminated);
    }

    #[test]
    fn test_separators_produce_nothing() {
        let drawing = W2dReader::from_bytes(b" \t\r\n".to_vec()).read().unwrap();
        assert!(drawing.records.is_empty());
    }

    #[test]
    fn test_end_of_dwf_stops() {
        let drawing = W2dReader::from_bytes(b"(W2D V06.00)(EndOfDWF)F".to_vec())
            .read()
            .unwrap();
        assert_eq!(drawing.version, Some((6, 0)));
        assert!(drawing.terminated);
        assert_eq!(drawing.records.last(), Some(&OpcodeRecord::EndOfStream));
    }

    #[test]
    fn test_unknown_single_byte_is_fatal() {
        let err = W2dReader::from_bytes(vec![b'F', 0x5A]).read().unwrap_err();
        assert!(matches!(
            err,
            DwfError::UnknownOpcode {
                offset: 1,
                opcode: 0x5A
            }
        ));
    }

    #[test]
    fn test_failsafe_keeps_partial_drawing() {
        let config = W2dReaderConfiguration {
            failsafe: true,
            ..Default::default()
        };
        let drawing = W2dReader::from_bytes(vec![b'F', 0x5A, b'f'])
            .with_config(config)
            .read()
            .unwrap();
        assert_eq!(drawing.records, vec![OpcodeRecord::SetFill(true)]);
        assert!(drawing.notifications.has_type(NotificationType::Error));
    }

    #[test]
    fn test_unknown_extended_ascii_is_kept() {
        let drawing = W2dReader::from_bytes(b"(Mystery 1 (a b))V".to_vec())
            .read()
            .unwrap();
        match &drawing.records[0] {
            OpcodeRecord::Unknown(u) => {
                assert_eq!(u.format, OpcodeFormat::ExtendedAscii);
                assert_eq!(u.opcode, "Mystery");
                assert_eq!(u.raw_bytes, b"(Mystery 1 (a b))".to_vec());
            }
            other => panic!("unexpected record {:?}", other),
        }
        assert_eq!(drawing.records[1], OpcodeRecord::SetVisibility(true));
    }

    #[test]
    fn test_drop_unknown_when_configured() {
        let config = W2dReaderConfiguration {
            keep_unknown_opcodes: false,
            ..Default::default()
        };
        let drawing = W2dReader::from_bytes(b"(Mystery)".to_vec())
            .with_config(config)
            .read()
            .unwrap();
        assert!(drawing.records.is_empty());
        assert!(drawing
            .notifications
            .has_type(NotificationType::NotImplemented));
    }

    #[test]
    fn test_bad_binary_payload_is_recoverable() {
        let mut w = W2dStreamWriter::new();
        // Color map claiming 3 entries with only one byte of data
        w.write_extended_binary(binary_ids::COLOR_MAP, &[3, 1]).unwrap();
        w.write_u8(b'F').unwrap();
        let drawing = W2dReader::from_bytes(w.into_inner()).read().unwrap();
        assert_eq!(drawing.records, vec![OpcodeRecord::SetFill(true)]);
        assert_eq!(drawing.notifications.len(), 1);
    }

    #[test]
    fn test_lz_section_is_unsupported() {
        let mut w = W2dStreamWriter::new();
        w.write_u8(b'{').unwrap();
        w.write_u32(0).unwrap();
        w.write_u16(binary_ids::LZ_COMPRESSION).unwrap();
        let err = W2dReader::from_bytes(w.into_inner()).read().unwrap_err();
        assert!(matches!(err, DwfError::UnsupportedCompression { offset: 0, .. }));
    }

    #[test]
    fn test_missing_close_brace_is_fatal() {
        let mut bytes = vec![b'{'];
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&binary_ids::USER_DATA.to_le_bytes());
        bytes.extend_from_slice(&[0xAA, b'X']);
        let err = W2dReader::from_bytes(bytes).read().unwrap_err();
        assert!(matches!(err, DwfError::MalformedExtendedFrame { offset: 8, .. }));
    }

    #[test]
    fn test_read_unresolved_keeps_deltas() {
        let mut w = W2dStreamWriter::new();
        w.write_u8(b'O').unwrap();
        w.write_point(LogicalPoint::new(10, 10), Precision::Absolute32)
            .unwrap();
        w.write_u8(b'l').unwrap();
        w.write_point(LogicalPoint::new(1, 1), Precision::Relative32)
            .unwrap();
        w.write_point(LogicalPoint::new(1, 1), Precision::Relative32)
            .unwrap();
        let bytes = w.into_inner();

        let raw = W2dReader::from_bytes(bytes.clone()).read_unresolved().unwrap();
        assert!(raw.records[1].is_relative());

        let resolved = W2dReader::from_bytes(bytes).read().unwrap();
        match &resolved.records[1] {
            OpcodeRecord::Line(line) => {
                assert_eq!(line.start, LogicalPoint::new(11, 11));
                assert_eq!(line.end, LogicalPoint::new(12, 12));
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_read_many_isolates_contexts() {
        let a: &[u8] = b"(Origin 5,5)";
        let b: &[u8] = b"(Layer 3 \"Doors\")";
        let results = read_many(&[a, b], &W2dReaderConfiguration::default());
        assert_eq!(results.len(), 2);
        let second = results[1].as_ref().unwrap();
        assert_eq!(second.layers.get(&3).map(String::as_str), Some("Doors"));
        assert!(results[0].as_ref().unwrap().layers.is_empty());
    }
}
