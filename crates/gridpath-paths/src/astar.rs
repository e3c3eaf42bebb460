use gridpath_core::{Grid, NavConfig, Point};

use crate::distance::{octile, segment_cost};
use crate::heap::IndexedHeap;
use crate::los::line_of_sight;
use crate::node::{NO_PARENT, SearchNode, SearchNodes, SearchStats};

/// Edge relaxation rule of the best-first loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relaxation {
    /// Classic A*: a neighbour is always reached from the expanded node.
    Grid,
    /// Lazy Theta*: a neighbour may be reached straight from the expanded
    /// node's parent when that parent can see it and the segment is no
    /// dearer than the grid edge.
    AnyAngle,
}

impl Relaxation {
    fn name(self) -> &'static str {
        match self {
            Self::Grid => "A*",
            Self::AnyAngle => "Theta*",
        }
    }
}

/// Compute the cheapest grid path from `start` to `goal` using A*.
///
/// Returns the start→goal cells, including both endpoints, or an empty
/// vector when either endpoint is outside the grid or blocked, or when no
/// path exists.
pub fn astar_path(grid: &Grid, cfg: &NavConfig, start: Point, goal: Point) -> Vec<Point> {
    astar_search(grid, cfg, start, goal).0
}

/// Like [`astar_path`], also reporting [`SearchStats`].
pub fn astar_search(
    grid: &Grid,
    cfg: &NavConfig,
    start: Point,
    goal: Point,
) -> (Vec<Point>, SearchStats) {
    best_first(grid, cfg, start, goal, Relaxation::Grid)
}

/// The open/closed loop shared by A* and Lazy Theta*.
pub(crate) fn best_first(
    grid: &Grid,
    cfg: &NavConfig,
    start: Point,
    goal: Point,
    relax: Relaxation,
) -> (Vec<Point>, SearchStats) {
    let mut stats = SearchStats::default();
    let cfg = cfg.clamped();

    let (Some(start_idx), Some(goal_idx)) = (grid.index_of(start), grid.index_of(goal)) else {
        log::debug!("{}: {start} -> {goal} outside the grid", relax.name());
        return (Vec::new(), stats);
    };
    if !grid.is_walkable_index(start_idx) || !grid.is_walkable_index(goal_idx) {
        log::debug!("{}: {start} -> {goal} starts or ends on a blocked cell", relax.name());
        return (Vec::new(), stats);
    }
    if start_idx == goal_idx {
        stats.path_len = 1;
        return (vec![start], stats);
    }

    let mut nodes = SearchNodes::new(grid.len());
    let mut open = IndexedHeap::new(grid.len());
    let h0 = octile(start, goal, cfg.diagonal_cost);
    nodes.improve(start_idx, NO_PARENT, 0.0, h0);
    open.push(start_idx, h0);

    let mut nbuf = Vec::with_capacity(8);

    let found = 'search: loop {
        let Some(ci) = open.pop_min() else {
            break 'search false;
        };
        if ci == goal_idx {
            break 'search true;
        }

        nodes[ci].closed = true;
        stats.expanded += 1;
        let Some(cp) = grid.coords_of(ci) else {
            continue;
        };

        grid.neighbors(cp, &cfg, &mut nbuf);
        for &np in &nbuf {
            let Some(ni) = grid.index_of(np) else {
                continue;
            };
            if nodes[ni].closed {
                continue;
            }
            let terrain = grid.terrain_cost_index(ni);
            let (parent, tentative_g) = match relax {
                Relaxation::Grid => {
                    (ci, nodes[ci].g + octile(cp, np, cfg.diagonal_cost) * terrain)
                }
                Relaxation::AnyAngle => any_angle_edge(grid, &nodes, &cfg, ci, cp, np, terrain),
            };
            if tentative_g < nodes[ni].g {
                let h = octile(np, goal, cfg.diagonal_cost);
                nodes.improve(ni, parent, tentative_g, h);
                open.push_or_decrease(ni, nodes[ni].f);
            }
        }
    };

    if !found {
        log::debug!(
            "{}: no path {start} -> {goal} ({} nodes expanded)",
            relax.name(),
            stats.expanded
        );
        return (Vec::new(), stats);
    }

    let path = nodes.reconstruct(grid, goal_idx);
    stats.path_len = path.len();
    log::debug!(
        "{}: {start} -> {goal} in {} cells, cost {:.3} ({} nodes expanded)",
        relax.name(),
        path.len(),
        nodes[goal_idx].g,
        stats.expanded
    );
    (path, stats)
}

/// Shortcuts within this much of the grid edge still win, so collinear
/// steps collapse into one segment despite rounding.
const SHORTCUT_SLACK: f32 = 1e-4;

/// Parent and tentative cost of `np` when relaxed from the expanded node
/// `ci` under Lazy Theta*.
///
/// When `ci` has a parent that can see `np`, the straight segment from
/// that parent competes with the ordinary grid edge and the cheaper one
/// wins. A segment is charged cell by cell along its line, so it never
/// undercuts the terrain it crosses.
fn any_angle_edge(
    grid: &Grid,
    nodes: &SearchNodes,
    cfg: &NavConfig,
    ci: usize,
    cp: Point,
    np: Point,
    terrain: f32,
) -> (usize, f32) {
    let current: SearchNode = nodes[ci];
    let step = current.g + octile(cp, np, cfg.diagonal_cost) * terrain;
    if current.parent != NO_PARENT {
        if let Some(pp) = grid.coords_of(current.parent) {
            if line_of_sight(grid, pp, np) {
                let g = nodes[current.parent].g + segment_cost(grid, cfg.diagonal_cost, pp, np);
                if g <= step + SHORTCUT_SLACK {
                    return (current.parent, g);
                }
            }
        }
    }
    (ci, step)
}
