//! Per-stream graphics state threaded through every decoder call.
//!
//! A `DecodeContext` is created when a stream starts, mutated by state
//! opcodes and by the coordinate resolver, and dropped when the stream has
//! been consumed. It is never shared between streams.

use crate::error::{DwfError, Result};
use crate::io::w2d::opcode::NodeAddressing;
use crate::records::{FontRef, Layer};
use crate::types::{Color, ColorMap, LinePattern, LineWeight, LogicalPoint, Rgba};

use indexmap::IndexMap;

/// Mutable decode state for one stream.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    /// Base point for relative coordinates
    pub current_origin: LogicalPoint,
    pub current_color: Color,
    pub color_map: ColorMap,
    pub current_fill: bool,
    pub current_visibility: bool,
    pub current_line_weight: LineWeight,
    pub current_line_pattern: LinePattern,
    /// Active layer number
    pub current_layer: Option<i32>,
    /// Layer names seen so far, in first-seen order
    pub layers: IndexMap<i32, String>,
    pub current_font: Option<FontRef>,
    /// Last object-node number, established by an absolute node opcode
    pub current_object_node: Option<i64>,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeContext {
    pub fn new() -> Self {
        Self {
            current_origin: LogicalPoint::ZERO,
            current_color: Color::default(),
            color_map: ColorMap::default(),
            current_fill: false,
            current_visibility: true,
            current_line_weight: LineWeight::default(),
            current_line_pattern: LinePattern::default(),
            current_layer: None,
            layers: IndexMap::new(),
            current_font: None,
            current_object_node: None,
        }
    }

    /// Context whose relative coordinates start from `origin`.
    pub fn with_origin(origin: LogicalPoint) -> Self {
        Self {
            current_origin: origin,
            ..Self::new()
        }
    }

    /// Current color as a true color.
    pub fn resolved_color(&self) -> Rgba {
        self.current_color.resolve(&self.color_map)
    }

    /// Make `layer` current, remembering its name when one is given.
    pub fn set_layer(&mut self, layer: &Layer) {
        self.current_layer = Some(layer.number);
        if let Some(name) = &layer.name {
            self.layers.insert(layer.number, name.clone());
        }
    }

    /// Name of the active layer, if it has one.
    pub fn current_layer_name(&self) -> Option<&str> {
        self.current_layer
            .and_then(|n| self.layers.get(&n))
            .map(String::as_str)
    }

    /// Advance the object-node chain.
    ///
    /// `Absolute32` establishes the chain; `Delta16` and `AutoIncrement`
    /// require an established node. `value` is ignored for
    /// `AutoIncrement`. A chain that would leave the `i64` range is
    /// rejected like a missing one.
    pub fn next_object_node(
        &mut self,
        addressing: NodeAddressing,
        value: i64,
        offset: u64,
    ) -> Result<i64> {
        let id = match (addressing, self.current_object_node) {
            (NodeAddressing::Absolute32, _) => Some(value),
            (NodeAddressing::Delta16, Some(previous)) => previous.checked_add(value),
            (NodeAddressing::AutoIncrement, Some(previous)) => previous.checked_add(1),
            (_, None) => None,
        }
        .ok_or(DwfError::InvalidObjectNodeState { offset })?;
        self.current_object_node = Some(id);
        Ok(id)
    }
}
