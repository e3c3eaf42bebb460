use gridpath_core::{Grid, Point};

use crate::los::bresenham;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Octile distance: straight moves cost 1, diagonal moves `diagonal_cost`.
///
/// This is the search heuristic, and also the length of a straight
/// segment between any two cells. For neighbouring cells it reduces to 1
/// for an orthogonal step and `diagonal_cost` for a diagonal one.
#[inline]
pub fn octile(a: Point, b: Point, diagonal_cost: f32) -> f32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let diag = dx.min(dy);
    (dx.max(dy) - diag) as f32 + diagonal_cost * diag as f32
}

/// Cost of walking the straight segment `from`–`to` cell by cell.
///
/// Each step of the Bresenham line costs 1 or `diagonal_cost`, times the
/// terrain cost of the cell it enters. Between neighbouring cells this is
/// exactly the grid edge cost.
pub fn segment_cost(grid: &Grid, diagonal_cost: f32, from: Point, to: Point) -> f32 {
    let mut cost = 0.0;
    let mut prev = from;
    for p in bresenham(from, to).skip(1) {
        cost += octile(prev, p, diagonal_cost) * grid.terrain_cost(p);
        prev = p;
    }
    cost
}

/// Cost of a cell path, the sum of [`segment_cost`] over consecutive
/// points.
///
/// Works for grid-step paths and for any-angle paths alike. Paths with
/// fewer than two cells cost 0.
pub fn path_cost(grid: &Grid, diagonal_cost: f32, path: &[Point]) -> f32 {
    path.windows(2)
        .map(|w| segment_cost(grid, diagonal_cost, w[0], w[1]))
        .sum()
}
