//! Decoded W2D drawing

use indexmap::IndexMap;

use crate::error::Result;
use crate::io::w2d::context::DecodeContext;
use crate::layout::{compute_bounds, compute_scale, BoundsReport, CoordinateResolver};
use crate::layout::{LayoutOptions, ScaleResult};
use crate::notification::NotificationCollection;
use crate::records::OpcodeRecord;

/// Result of decoding one opcode stream.
#[derive(Debug, Clone, Default)]
pub struct W2dDrawing {
    /// Stream version from the `(W2D Vmm.nn)` header
    pub version: Option<(u8, u8)>,
    /// Records in stream order
    pub records: Vec<OpcodeRecord>,
    /// Descriptive fields (`Author`, `Title`, ...) in stream order
    pub metadata: IndexMap<String, String>,
    /// Layer names by number
    pub layers: IndexMap<i32, String>,
    /// Non-fatal problems met while decoding
    pub notifications: NotificationCollection,
    /// True when the stream ended with an explicit end-of-stream opcode
    pub terminated: bool,
}

impl W2dDrawing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that draw something.
    pub fn geometry(&self) -> impl Iterator<Item = &OpcodeRecord> {
        self.records.iter().filter(|r| r.is_geometry())
    }

    /// True when no record still holds relative coordinates.
    pub fn is_resolved(&self) -> bool {
        !self.records.iter().any(OpcodeRecord::is_relative)
    }

    /// Resolve records read with
    /// [`read_unresolved`](crate::io::w2d::W2dReader::read_unresolved),
    /// starting from a fresh context.
    pub fn resolve(&mut self) {
        let mut ctx = DecodeContext::new();
        CoordinateResolver::new(&mut ctx).resolve_all(&mut self.records);
    }

    pub fn bounds(&self, options: &LayoutOptions) -> BoundsReport {
        compute_bounds(&self.records, options.default_font_size)
    }

    /// Scale and translation placing the whole drawing on the page.
    pub fn fit_to_page(&self, options: &LayoutOptions) -> Result<ScaleResult> {
        let report = self.bounds(options);
        compute_scale(report.overall.as_ref(), options)
    }
}
