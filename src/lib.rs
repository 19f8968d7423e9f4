//! # dwfrust
//!
//! A pure Rust library for decoding the W2D ("WHIP!") vector graphics
//! streams found inside DWF drawings, and for placing the decoded drawing
//! on a fixed-size page.
//!
//! ## Features
//!
//! - Byte-exact decoding of the three interleaved opcode encodings
//!   (single-byte binary, `(`-framed extended ASCII, `{`-framed extended
//!   binary), including zlib-compressed sections
//! - Explicit per-stream graphics state (origin, color, layer, font,
//!   object nodes)
//! - Relative-to-absolute coordinate resolution
//! - Bounding boxes per primitive kind and fit-to-page scaling
//! - A rendering trait receiving page-space geometry
//! - Parallel decoding of independent streams
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dwfrust::{LayoutOptions, W2dReader};
//!
//! let drawing = W2dReader::from_file("sheet.w2d")?.read()?;
//! let placement = drawing.fit_to_page(&LayoutOptions::default())?;
//! println!("scale {:.4}", placement.scale);
//! # Ok::<(), dwfrust::error::DwfError>(())
//! ```
//!
//! ## Architecture
//!
//! - `io::w2d` - primitive codecs, opcode tables and the dispatcher
//! - `records` - the `OpcodeRecord` enum produced by the dispatcher
//! - `layout` - coordinate resolver, bounds and scale calculators
//! - `render` - `RenderBackend` and the replay driver

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod drawing;
pub mod error;
pub mod io;
pub mod layout;
pub mod notification;
pub mod records;
pub mod render;
pub mod types;

// Re-export commonly used types
pub use error::{DwfError, Result};
pub use types::{
    BoundingBox2D, Color, ColorMap, LinePattern, LineWeight, LogicalPoint, PageTransform, Rgba,
    Vector2,
};

// Re-export records
pub use records::{OpcodeRecord, PrimitiveKind};

// Re-export the decode result and layout
pub use drawing::W2dDrawing;
pub use layout::{BoundsReport, CoordinateResolver, LayoutOptions, ScaleResult};
pub use render::{render_drawing, RenderBackend, RenderState};

// Re-export I/O types
pub use io::w2d::{read_many, DecodeContext, W2dReader, W2dReaderConfiguration};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_drawing_creation() {
        let drawing = W2dDrawing::new();
        assert!(drawing.records.is_empty());
        assert_eq!(drawing.version, None);
    }
}
