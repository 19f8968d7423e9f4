//! Opcode identifiers for the three W2D sub-formats.
//!
//! Single-byte opcodes are dispatched on the byte value itself. Extended
//! ASCII opcodes start with `(` and are identified by name; extended binary
//! opcodes start with `{` and carry a 16-bit id after their size.

/// Opens an extended ASCII opcode
pub const EXTENDED_ASCII_OPEN: u8 = b'(';
/// Closes an extended ASCII opcode
pub const EXTENDED_ASCII_CLOSE: u8 = b')';
/// Opens an extended binary opcode
pub const EXTENDED_BINARY_OPEN: u8 = b'{';
/// Closes an extended binary opcode
pub const EXTENDED_BINARY_CLOSE: u8 = b'}';

/// Coordinate encoding of a geometry opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Signed 16-bit deltas
    Relative16,
    /// Signed 32-bit deltas
    Relative32,
    /// Signed 32-bit absolute coordinates
    Absolute32,
}

impl Precision {
    /// Bytes per coordinate pair
    pub fn point_size(self) -> usize {
        match self {
            Precision::Relative16 => 4,
            Precision::Relative32 | Precision::Absolute32 => 8,
        }
    }

    pub fn is_relative(self) -> bool {
        !matches!(self, Precision::Absolute32)
    }
}

/// Geometry carried by a single-byte opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryOp {
    Line,
    Polyline,
    Polytriangle,
    Polymarker,
    Circle,
    Ellipse,
    Bezier,
    ContourSet,
    GouraudPolytriangle,
    GouraudPolyline,
}

/// Object-node addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAddressing {
    Absolute32,
    Delta16,
    AutoIncrement,
}

/// Decoded identity of a single-byte opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleByteOpcode {
    Geometry(GeometryOp, Precision),
    TextBasic,
    TextComplex,
    SetOrigin,
    ColorIndex,
    ColorRgba,
    Fill(bool),
    Visibility(bool),
    LineWeight,
    LinePattern,
    Layer,
    ObjectNode(NodeAddressing),
    /// Whitespace between opcodes
    Separator,
}

impl SingleByteOpcode {
    /// Dispatch table for single-byte opcodes
    pub fn from_byte(byte: u8) -> Option<Self> {
        use GeometryOp::*;
        use Precision::*;
        use SingleByteOpcode::*;

        let op = match byte {
            0x0C => Geometry(Line, Relative16),
            b'l' => Geometry(Line, Relative32),
            0x10 => Geometry(Polyline, Relative16),
            b'p' => Geometry(Polyline, Relative32),
            0x14 => Geometry(Polytriangle, Relative16),
            b't' => Geometry(Polytriangle, Relative32),
            0x8D => Geometry(Polymarker, Relative16),
            b'm' => Geometry(Polymarker, Relative32),
            0x12 => Geometry(Circle, Relative16),
            b'r' => Geometry(Circle, Relative32),
            b'e' => Geometry(Ellipse, Relative32),
            0x02 => Geometry(Bezier, Relative16),
            b'b' => Geometry(Bezier, Relative32),
            0x0B => Geometry(ContourSet, Relative16),
            b'k' => Geometry(ContourSet, Relative32),
            0x07 => Geometry(GouraudPolytriangle, Relative16),
            b'g' => Geometry(GouraudPolytriangle, Relative32),
            0x11 => Geometry(GouraudPolyline, Relative16),
            b'q' => Geometry(GouraudPolyline, Relative32),
            b'x' => TextBasic,
            0x18 => TextComplex,
            b'O' => SetOrigin,
            b'C' => ColorIndex,
            0x03 => ColorRgba,
            b'F' => Fill(true),
            b'f' => Fill(false),
            b'V' => Visibility(true),
            b'v' => Visibility(false),
            0x17 => LineWeight,
            0xCC => LinePattern,
            0xAC => Layer,
            b'N' => ObjectNode(NodeAddressing::Absolute32),
            0x0E => ObjectNode(NodeAddressing::Delta16),
            b'n' => ObjectNode(NodeAddressing::AutoIncrement),
            b' ' | b'\t' | b'\n' | b'\r' => Separator,
            _ => return None,
        };
        Some(op)
    }
}

/// Extended binary opcode ids
pub mod binary_ids {
    pub const COLOR_MAP: u16 = 0x0001;
    pub const IMAGE_BITONAL_MAPPED: u16 = 0x0002;
    pub const IMAGE_GROUP3X_MAPPED: u16 = 0x0003;
    pub const IMAGE_INDEXED: u16 = 0x0004;
    pub const IMAGE_MAPPED: u16 = 0x0005;
    pub const IMAGE_RGB: u16 = 0x0006;
    pub const IMAGE_RGBA: u16 = 0x0007;
    pub const IMAGE_JPEG: u16 = 0x0008;
    pub const IMAGE_GROUP4: u16 = 0x0009;
    pub const IMAGE_PNG: u16 = 0x000C;
    pub const IMAGE_GROUP4X_MAPPED: u16 = 0x000D;
    pub const LZ_COMPRESSION: u16 = 0x0010;
    pub const ZLIB_COMPRESSION: u16 = 0x0011;
    pub const EMBEDDED_FONT: u16 = 0x0012;
    pub const SIGNATURE: u16 = 0x0014;
    pub const USER_DATA: u16 = 0x0020;
}

/// Decoded identity of an extended binary opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedBinaryOpcode {
    ColorMap,
    Image(crate::records::ImageFormat),
    Compression(CompressionKind),
    Opaque(crate::records::OpaqueKind),
}

/// Compressed-section markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionKind {
    Lz,
    Zlib,
}

impl ExtendedBinaryOpcode {
    /// Dispatch table for extended binary ids
    pub fn from_id(id: u16) -> Option<Self> {
        use crate::records::{ImageFormat, OpaqueKind};
        use binary_ids::*;

        let op = match id {
            COLOR_MAP => ExtendedBinaryOpcode::ColorMap,
            IMAGE_BITONAL_MAPPED => ExtendedBinaryOpcode::Image(ImageFormat::BitonalMapped),
            IMAGE_GROUP3X_MAPPED => ExtendedBinaryOpcode::Image(ImageFormat::Group3XMapped),
            IMAGE_INDEXED => ExtendedBinaryOpcode::Image(ImageFormat::Indexed),
            IMAGE_MAPPED => ExtendedBinaryOpcode::Image(ImageFormat::Mapped),
            IMAGE_RGB => ExtendedBinaryOpcode::Image(ImageFormat::Rgb),
            IMAGE_RGBA => ExtendedBinaryOpcode::Image(ImageFormat::Rgba),
            IMAGE_JPEG => ExtendedBinaryOpcode::Image(ImageFormat::Jpeg),
            IMAGE_GROUP4 => ExtendedBinaryOpcode::Image(ImageFormat::Group4),
            IMAGE_PNG => ExtendedBinaryOpcode::Image(ImageFormat::Png),
            IMAGE_GROUP4X_MAPPED => ExtendedBinaryOpcode::Image(ImageFormat::Group4XMapped),
            LZ_COMPRESSION => ExtendedBinaryOpcode::Compression(CompressionKind::Lz),
            ZLIB_COMPRESSION => ExtendedBinaryOpcode::Compression(CompressionKind::Zlib),
            EMBEDDED_FONT => ExtendedBinaryOpcode::Opaque(OpaqueKind::EmbeddedFont),
            SIGNATURE => ExtendedBinaryOpcode::Opaque(OpaqueKind::Signature),
            USER_DATA => ExtendedBinaryOpcode::Opaque(OpaqueKind::UserData),
            _ => return None,
        };
        Some(op)
    }
}

/// Decoded identity of an extended ASCII opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedAsciiOpcode {
    Version,
    EndOfDwf,
    Color,
    LineWeight,
    LinePattern,
    Layer,
    Visible,
    Fill,
    Origin,
    Font,
    Node,
    /// Descriptive field stored as name/value metadata
    Metadata,
}

impl ExtendedAsciiOpcode {
    /// Dispatch table for extended ASCII names (case-sensitive, as written
    /// by the toolkits that produce these streams)
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name {
            "W2D" | "DWF" => ExtendedAsciiOpcode::Version,
            "EndOfDWF" => ExtendedAsciiOpcode::EndOfDwf,
            "Color" => ExtendedAsciiOpcode::Color,
            "LineWeight" => ExtendedAsciiOpcode::LineWeight,
            "LinePattern" => ExtendedAsciiOpcode::LinePattern,
            "Layer" => ExtendedAsciiOpcode::Layer,
            "Visible" => ExtendedAsciiOpcode::Visible,
            "Fill" => ExtendedAsciiOpcode::Fill,
            "Origin" => ExtendedAsciiOpcode::Origin,
            "Font" => ExtendedAsciiOpcode::Font,
            "Node" => ExtendedAsciiOpcode::Node,
            "Author" | "Creator" | "Title" | "Subject" | "Description" | "Comments"
            | "Copyright" | "Keywords" | "Creation" | "Modification" | "SourceCreation"
            | "SourceModification" | "SourceFilename" | "Units" | "View" | "Plot_Info"
            | "NamedView" | "Background" => ExtendedAsciiOpcode::Metadata,
            _ => return None,
        };
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte_table() {
        assert_eq!(
            SingleByteOpcode::from_byte(0x0C),
            Some(SingleByteOpcode::Geometry(GeometryOp::Line, Precision::Relative16))
        );
        assert_eq!(
            SingleByteOpcode::from_byte(b'n'),
            Some(SingleByteOpcode::ObjectNode(NodeAddressing::AutoIncrement))
        );
        assert_eq!(SingleByteOpcode::from_byte(b'\n'), Some(SingleByteOpcode::Separator));
        assert_eq!(SingleByteOpcode::from_byte(0x5A), None);
    }

    #[test]
    fn test_extended_tables() {
        assert_eq!(
            ExtendedBinaryOpcode::from_id(0x0011),
            Some(ExtendedBinaryOpcode::Compression(CompressionKind::Zlib))
        );
        assert_eq!(ExtendedBinaryOpcode::from_id(0x7777), None);
        assert_eq!(
            ExtendedAsciiOpcode::from_name("Author"),
            Some(ExtendedAsciiOpcode::Metadata)
        );
        assert_eq!(ExtendedAsciiOpcode::from_name("author"), None);
    }

    #[test]
    fn test_precision_sizes() {
        assert_eq!(Precision::Relative16.point_size(), 4);
        assert_eq!(Precision::Absolute32.point_size(), 8);
        assert!(!Precision::Absolute32.is_relative());
    }
}
