//! Text records and font references

use crate::types::LogicalPoint;
use bitflags::bitflags;

/// Font selection in effect when a text record was decoded
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontRef {
    /// Typeface name, if the stream named one
    pub name: Option<String>,
    /// Cell height in drawing units
    pub height: i32,
    /// Baseline rotation as a 16-bit wire angle
    pub rotation: u16,
}

bitflags! {
    /// Optional sub-records present on complex text
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextOptionFlags: u8 {
        const OVERSCORE = 0b0000_0001;
        const UNDERSCORE = 0b0000_0010;
        const BOUNDS = 0b0000_0100;
    }
}

/// Option sub-records of complex text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextOptions {
    /// Character positions carrying an overscore
    pub overscore: Vec<u16>,
    /// Character positions carrying an underscore
    pub underscore: Vec<u16>,
    /// Bounding quadrilateral. Offsets from the anchor until resolved,
    /// absolute afterwards.
    pub bounds: Option<[LogicalPoint; 4]>,
}

impl TextOptions {
    /// Which sub-records are present
    pub fn flags(&self) -> TextOptionFlags {
        let mut flags = TextOptionFlags::empty();
        if !self.overscore.is_empty() {
            flags |= TextOptionFlags::OVERSCORE;
        }
        if !self.underscore.is_empty() {
            flags |= TextOptionFlags::UNDERSCORE;
        }
        if self.bounds.is_some() {
            flags |= TextOptionFlags::BOUNDS;
        }
        flags
    }
}

/// Text string anchored at a point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub position: LogicalPoint,
    pub string: String,
    pub font_ref: Option<FontRef>,
    pub options: TextOptions,
    pub relative: bool,
}

impl Text {
    /// Number of characters (not UTF-16 units)
    pub fn char_count(&self) -> usize {
        self.string.chars().count()
    }
}
