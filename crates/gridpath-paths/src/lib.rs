//! Pathfinding over a [`gridpath_core::Grid`].
//!
//! Three independent consumers of one cost grid:
//!
//! - **A\*** shortest grid paths ([`astar_path`])
//! - **Lazy Theta\*** any-angle paths that shortcut through line of sight
//!   ([`theta_star_path`])
//! - **Flow fields**: integration costs and steering directions toward a
//!   single target, stored in the grid cells ([`compute_flow_field`])
//!
//! The two searches allocate their node array and open set per call and
//! only borrow the grid. The flow field writes into the grid in place.
//! [`Pathfinder`] bundles a grid with its [`NavConfig`](gridpath_core::NavConfig)
//! and exposes all three in world space.
//!
//! Every query reports failure through its result: an empty path, or an
//! unreachable integration value. Nothing in this crate panics on bad
//! input.

mod astar;
mod distance;
mod flowfield;
mod heap;
mod los;
mod node;
mod pathfinder;
mod theta;

pub use astar::{astar_path, astar_search};
pub use distance::{chebyshev, manhattan, octile, path_cost, segment_cost};
pub use flowfield::{angle_penalty_for, compute_flow_field};
pub use heap::IndexedHeap;
pub use los::{Bresenham, bresenham, line_of_sight};
pub use node::SearchStats;
pub use pathfinder::Pathfinder;
pub use theta::{theta_star_path, theta_star_search};

#[cfg(test)]
pub(crate) mod testutil {
    use gridpath_core::{Grid, NavConfig, Point, Vec3};
    use rand::Rng;

    use crate::distance::octile;

    pub(crate) fn open_grid(w: i32, h: i32) -> Grid {
        Grid::new(w, h, 1.0, Vec3::ZERO).unwrap()
    }

    /// Random obstacles with probability `chance`, and random costs in
    /// 1..=9 on the remaining cells when `weighted` is set.
    pub(crate) fn random_grid(w: i32, h: i32, chance: f64, weighted: bool) -> Grid {
        let mut rng = rand::rng();
        let mut g = open_grid(w, h);
        for p in g.bounds() {
            if rng.random_bool(chance) {
                g.set_blocked(p, true);
            } else if weighted {
                g.set_cell_cost(p, rng.random_range(1..=9));
            }
        }
        g
    }

    /// Single-source cheapest costs by exhaustive relaxation.
    pub(crate) fn reference_costs(grid: &Grid, cfg: &NavConfig, start: Point) -> Vec<f32> {
        let cfg = cfg.clamped();
        let mut dist = vec![f32::INFINITY; grid.len()];
        let Some(si) = grid.index_of(start) else {
            return dist;
        };
        dist[si] = 0.0;
        let mut nbuf = Vec::new();
        let mut changed = true;
        while changed {
            changed = false;
            for u in grid.bounds() {
                let du = dist[grid.index_of(u).unwrap()];
                if du.is_infinite() {
                    continue;
                }
                grid.neighbors(u, &cfg, &mut nbuf);
                for &v in &nbuf {
                    let vi = grid.index_of(v).unwrap();
                    let nd = du + octile(u, v, cfg.diagonal_cost) * grid.terrain_cost(v);
                    if nd < dist[vi] - 1e-6 {
                        dist[vi] = nd;
                        changed = true;
                    }
                }
            }
        }
        dist
    }
}
