//! Lazy Theta*: any-angle paths over the grid.
//!
//! The search is the A* loop with one change in edge relaxation: a
//! neighbour may be attached directly to the expanded node's parent when
//! the two can see each other and the straight segment, charged for every
//! cell it crosses, costs no more than the grid step. This straightens the
//! path while it is being built and never makes it dearer than A*. The result is a short list of waypoints rather than a
//! step-by-step cell sequence; consecutive waypoints always have line of
//! sight.

use gridpath_core::{Grid, NavConfig, Point};

use crate::astar::{Relaxation, best_first};
use crate::node::SearchStats;

/// Compute an any-angle path from `start` to `goal`.
///
/// Returns the waypoints from start to goal, both included, or an empty
/// vector when either endpoint is outside the grid or blocked, or when no
/// path exists.
pub fn theta_star_path(grid: &Grid, cfg: &NavConfig, start: Point, goal: Point) -> Vec<Point> {
    theta_star_search(grid, cfg, start, goal).0
}

/// Like [`theta_star_path`], also reporting [`SearchStats`].
pub fn theta_star_search(
    grid: &Grid,
    cfg: &NavConfig,
    start: Point,
    goal: Point,
) -> (Vec<Point>, SearchStats) {
    best_first(grid, cfg, start, goal, Relaxation::AnyAngle)
}
