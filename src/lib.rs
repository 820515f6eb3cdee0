// Public library interface for treemap-engine
// Shared by the diagnostic binaries and the integration tests

pub mod board;
pub mod error;
pub mod layout;
pub mod tree;

pub use error::{LayoutError, Result};
pub use layout::{
    compute_layout, compute_layouts, Algorithm, Bounds, ElementOrder, LayoutConfig, LayoutJob, LayoutStrategy,
    PlacedRect, RoundingPolicy,
};
pub use tree::element::{Element, ElementSet};
