//! Second pass over decoded records: coordinate resolution, bounding boxes
//! and page placement.

pub mod bounds;
pub mod resolver;
pub mod scale;

pub use bounds::{compute_bounds, BoundsCalculator, BoundsReport};
pub use resolver::CoordinateResolver;
pub use scale::{compute_scale, LayoutOptions, ScaleResult};
