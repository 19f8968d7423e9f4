//! Core value types shared by the decoder and the layout calculator

pub mod bounds;
pub mod color;
pub mod line_weight;
pub mod transform;
pub mod vector;

pub use bounds::BoundingBox2D;
pub use color::{Color, ColorMap, Rgba, DEFAULT_COLOR_MAP};
pub use line_weight::{LinePattern, LineWeight};
pub use transform::PageTransform;
pub use vector::{LogicalPoint, Vector2};
