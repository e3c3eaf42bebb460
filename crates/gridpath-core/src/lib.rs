//! **gridpath-core**: the grid model shared by the gridpath algorithms.
//!
//! This crate provides the lattice geometry, the weighted [`Cell`], the
//! single authoritative [`Grid`] with its coordinate transforms and
//! neighbour enumeration, and the [`NavConfig`] movement rules.

pub mod cell;
pub mod config;
pub mod error;
pub mod geom;
pub mod grid;

pub use cell::{Cell, IMPASSABLE_COST, UNREACHABLE};
pub use config::{DEFAULT_DIAGONAL_COST, DIAGONAL_COST_RANGE, GridConfig, NavConfig};
pub use error::GridError;
pub use geom::{CARDINALS, DIAGONALS, Point, Range, Vec3};
pub use grid::Grid;
