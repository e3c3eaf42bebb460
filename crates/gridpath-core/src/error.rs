use std::fmt;

/// Errors raised while constructing a [`Grid`](crate::Grid).
///
/// Only configuration problems are errors. Queries against a valid grid
/// report failure through empty results instead.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Width or height is not strictly positive.
    InvalidDimensions { width: i32, height: i32 },
    /// Cell size is not a strictly positive, finite number.
    InvalidCellSize(f32),
    /// A cell buffer does not hold exactly `width * height` cells.
    CellCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "grid: invalid dimensions {width}x{height}")
            }
            Self::InvalidCellSize(size) => write!(f, "grid: invalid cell size {size}"),
            Self::CellCountMismatch { expected, actual } => {
                write!(f, "grid: expected {expected} cells, found {actual}")
            }
        }
    }
}

impl std::error::Error for GridError {}
