//! Grid authoring helpers for gridpath: random obstacles and terrain
//! costs, and grids described as plain text.

pub mod layout;
pub mod obstacles;

pub use layout::{Layout, LayoutError};
pub use obstacles::ObstacleGen;
