//! Raster image records

use crate::types::{LogicalPoint, Rgba};
use std::fmt;

/// Pixel encoding of an image payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    BitonalMapped,
    Group3XMapped,
    Indexed,
    Mapped,
    Rgb,
    Rgba,
    Jpeg,
    Group4,
    Png,
    Group4XMapped,
}

impl ImageFormat {
    /// Whether the payload carries its own color map before the pixels
    pub fn has_color_map(&self) -> bool {
        matches!(
            self,
            ImageFormat::BitonalMapped
                | ImageFormat::Group3XMapped
                | ImageFormat::Indexed
                | ImageFormat::Mapped
                | ImageFormat::Group4XMapped
        )
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Image placed between two absolute corners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub format: ImageFormat,
    pub columns: u16,
    pub rows: u16,
    pub min_corner: LogicalPoint,
    pub max_corner: LogicalPoint,
    pub identifier: i32,
    pub color_map: Option<Vec<Rgba>>,
    /// Encoded pixel data, passed through without decompression
    pub pixels: Vec<u8>,
}

impl Image {
    /// Pixel dimensions as (columns, rows)
    pub fn dims(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }
}
