//! Error types for dwfrust library

use std::io;
use thiserror::Error;

/// Main error type for dwfrust operations
#[derive(Debug, Error)]
pub enum DwfError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes are available than a fixed-size field requires
    #[error("Truncated stream at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedStream {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// A decoded count is below the minimum its opcode allows
    #[error("Invalid count {count} at offset {offset} (minimum {minimum})")]
    InvalidCount {
        offset: u64,
        count: usize,
        minimum: usize,
    },

    /// Opcode id not present in the dispatch table
    #[error("Unknown opcode {opcode:#04X} at offset {offset}")]
    UnknownOpcode { offset: u64, opcode: u16 },

    /// Missing or corrupt `(`/`{` frame delimiters
    #[error("Malformed extended opcode frame at offset {offset}: {reason}")]
    MalformedExtendedFrame { offset: u64, reason: String },

    /// Relative object-node addressing used before an absolute node was set
    #[error("Object node at offset {offset} is relative but no absolute node precedes it")]
    InvalidObjectNodeState { offset: u64 },

    /// String payload is not valid UTF-16
    #[error("Invalid UTF-16 string at offset {offset}")]
    InvalidString { offset: u64 },

    /// Compression scheme the decoder cannot unpack
    #[error("Unsupported compression opcode {opcode:#06X} at offset {offset}")]
    UnsupportedCompression { offset: u64, opcode: u16 },

    /// Decompression error
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Bounding box has no area; a page scale cannot be derived
    #[error("Degenerate geometry: bounding box is {width} x {height}")]
    DegenerateGeometry { width: f64, height: f64 },

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

impl DwfError {
    /// Byte offset in the opcode stream where the error was detected.
    pub fn offset(&self) -> Option<u64> {
        match self {
            DwfError::TruncatedStream { offset, .. }
            | DwfError::InvalidCount { offset, .. }
            | DwfError::UnknownOpcode { offset, .. }
            | DwfError::MalformedExtendedFrame { offset, .. }
            | DwfError::InvalidObjectNodeState { offset }
            | DwfError::InvalidString { offset }
            | DwfError::UnsupportedCompression { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Result type alias for dwfrust operations
pub type Result<T> = std::result::Result<T, DwfError>;

impl From<String> for DwfError {
    fn from(s: String) -> Self {
        DwfError::Custom(s)
    }
}

impl From<&str> for DwfError {
    fn from(s: &str) -> Self {
        DwfError::Custom(s.to_string())
    }
}
