//! Target-centred flow fields.
//!
//! [`compute_flow_field`] fills every cell of a [`Grid`] with the cheapest
//! cost to one target (the integration value) and a unit vector pointing
//! at the neighbour that continues the cheapest route. Many agents can then
//! steer toward the same target by reading one cell each, with no per-agent
//! search.

use std::collections::VecDeque;

use gridpath_core::{Grid, NavConfig, Point, UNREACHABLE, Vec3};

use crate::distance::octile;

/// Bearings within this many degrees of a multiple of 45° are not
/// penalised.
const ANGLE_TOLERANCE_DEG: f32 = 15.0;

/// Extra cost of entering `from` when its bearing to `target` deviates
/// more than 15° from the nearest cardinal or diagonal axis.
///
/// Returns 0 when `penalty` is not positive or `from == target`.
pub fn angle_penalty_for(from: Point, target: Point, penalty: f32) -> f32 {
    if penalty <= 0.0 || from == target {
        return 0.0;
    }
    let dx = (target.x - from.x) as f32;
    let dy = (target.y - from.y) as f32;
    let bearing = dy.atan2(dx).to_degrees().rem_euclid(45.0);
    let deviation = bearing.min(45.0 - bearing);
    if deviation > ANGLE_TOLERANCE_DEG { penalty } else { 0.0 }
}

/// Cost of the edge `from -> to` while integrating toward `target`.
#[inline]
fn edge_cost(grid: &Grid, cfg: &NavConfig, from: Point, to: Point, target: Point) -> f32 {
    octile(from, to, cfg.diagonal_cost) * grid.terrain_cost(to)
        + angle_penalty_for(to, target, cfg.angle_penalty)
}

/// Recompute the integration values and flow directions of `grid` for
/// `target`, overwriting the previous field.
///
/// Returns the number of cells that can reach the target, the target
/// included. A target outside the grid or on a blocked cell leaves every
/// cell unreachable with zero flow and returns 0.
pub fn compute_flow_field(grid: &mut Grid, cfg: &NavConfig, target: Point) -> usize {
    let cfg = cfg.clamped();
    grid.reset_flow_field();

    let Some(ti) = grid.index_of(target) else {
        log::warn!("flow field target {target} is outside the grid");
        return 0;
    };
    if !grid.is_walkable_index(ti) {
        log::warn!("flow field target {target} is blocked");
        return 0;
    }

    let relaxations = integrate(grid, &cfg, ti, target);
    let reached = assign_directions(grid, &cfg);
    log::debug!(
        "flow field to {target}: {reached}/{} cells reached, {relaxations} relaxations",
        grid.len()
    );
    reached
}

/// Label-correcting relaxation from the target. Cells re-enter the queue
/// whenever their integration value drops.
fn integrate(grid: &mut Grid, cfg: &NavConfig, ti: usize, target: Point) -> usize {
    let mut queued = vec![false; grid.len()];
    let mut queue = VecDeque::new();
    let mut nbuf = Vec::with_capacity(8);
    let mut relaxations = 0;

    grid.set_integration(ti, 0.0);
    queue.push_back(ti);
    queued[ti] = true;

    while let Some(ci) = queue.pop_front() {
        queued[ci] = false;
        let Some(cp) = grid.coords_of(ci) else {
            continue;
        };
        let current = grid.integration_index(ci);

        grid.neighbors(cp, cfg, &mut nbuf);
        for &np in &nbuf {
            let Some(ni) = grid.index_of(np) else {
                continue;
            };
            let candidate = current + edge_cost(grid, cfg, cp, np, target);
            if candidate < grid.integration_index(ni) {
                grid.set_integration(ni, candidate);
                relaxations += 1;
                if !queued[ni] {
                    queued[ni] = true;
                    queue.push_back(ni);
                }
            }
        }
    }
    relaxations
}

/// Point every reached cell at its lowest strictly-better neighbour.
/// Returns the number of reached cells.
fn assign_directions(grid: &mut Grid, cfg: &NavConfig) -> usize {
    let mut nbuf = Vec::with_capacity(8);
    let mut reached = 0;

    for ci in 0..grid.len() {
        let own = grid.integration_index(ci);
        if own == UNREACHABLE {
            continue;
        }
        reached += 1;
        let Some(cp) = grid.coords_of(ci) else {
            continue;
        };

        grid.neighbors(cp, cfg, &mut nbuf);
        let mut best: Option<(Point, f32)> = None;
        for &np in &nbuf {
            let value = grid.integration_at(np);
            let lowest = best.map_or(own, |(_, v)| v);
            if value < lowest {
                best = Some((np, value));
            }
        }

        let flow = match best {
            Some((np, _)) => (grid.cell_to_world(np) - grid.cell_to_world(cp)).normalize_or_zero(),
            None => Vec3::ZERO,
        };
        grid.set_flow(ci, flow);
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::astar_path;
    use crate::testutil::{open_grid, random_grid};

    const SQRT2: f32 = std::f32::consts::SQRT_2;

    #[test]
    fn three_by_three_toward_corner() {
        let mut g = open_grid(3, 3);
        let cfg = NavConfig::default();
        let reached = compute_flow_field(&mut g, &cfg, Point::new(0, 0));
        assert_eq!(reached, 9);
        assert_eq!(g.integration_at(Point::new(0, 0)), 0.0);
        assert!((g.integration_at(Point::new(2, 2)) - 2.0 * SQRT2).abs() < 1e-4);
        assert!((g.integration_at(Point::new(2, 0)) - 2.0).abs() < 1e-6);

        let flow = g.flow_at(Point::new(2, 2));
        let expected = (g.cell_to_world(Point::new(1, 1)) - g.cell_to_world(Point::new(2, 2)))
            .normalize_or_zero();
        assert!((flow - expected).length() < 1e-5);
        assert!((flow.length() - 1.0).abs() < 1e-5);
        assert!(g.flow_at(Point::new(0, 0)).is_zero());
    }

    #[test]
    fn cardinal_flow_points_along_axis() {
        let mut g = open_grid(4, 1);
        compute_flow_field(&mut g, &NavConfig::default(), Point::new(0, 0));
        for x in 1..4 {
            let f = g.flow_at(Point::new(x, 0));
            assert!((f.x + 1.0).abs() < 1e-6 && f.y.abs() < 1e-6, "{f}");
        }
        assert_eq!(g.integration_at(Point::new(3, 0)), 3.0);
    }

    #[test]
    fn disconnected_region_is_unreachable() {
        let mut g = open_grid(5, 5);
        for y in 0..5 {
            g.set_blocked(Point::new(2, y), true);
        }
        let reached = compute_flow_field(&mut g, &NavConfig::default(), Point::new(0, 0));
        assert_eq!(reached, 10);
        for y in 0..5 {
            for x in 2..5 {
                let p = Point::new(x, y);
                assert_eq!(g.integration_at(p), UNREACHABLE);
                assert!(g.flow_at(p).is_zero());
            }
        }
    }

    #[test]
    fn blocked_or_outside_target_clears_field() {
        let mut g = open_grid(3, 3);
        let cfg = NavConfig::default();
        compute_flow_field(&mut g, &cfg, Point::new(0, 0));
        g.set_blocked(Point::new(1, 1), true);
        assert_eq!(compute_flow_field(&mut g, &cfg, Point::new(1, 1)), 0);
        assert!(g.cells().iter().all(|c| c.integration() == UNREACHABLE && c.flow().is_zero()));
        assert_eq!(compute_flow_field(&mut g, &cfg, Point::new(3, 0)), 0);
        assert!(g.cells().iter().all(|c| !c.is_reached()));
    }

    #[test]
    fn recompute_overwrites_previous_target() {
        let mut g = open_grid(5, 1);
        let cfg = NavConfig::default();
        compute_flow_field(&mut g, &cfg, Point::new(0, 0));
        compute_flow_field(&mut g, &cfg, Point::new(4, 0));
        assert_eq!(g.integration_at(Point::new(0, 0)), 4.0);
        assert!(g.flow_at(Point::new(0, 0)).x > 0.0);
        assert!(g.flow_at(Point::new(4, 0)).is_zero());
    }

    #[test]
    fn terrain_cost_weights_entered_cell() {
        let mut g = open_grid(3, 1);
        g.set_cell_cost(Point::new(1, 0), 4);
        compute_flow_field(&mut g, &NavConfig::default(), Point::new(0, 0));
        assert_eq!(g.integration_at(Point::new(1, 0)), 4.0);
        assert_eq!(g.integration_at(Point::new(2, 0)), 5.0);
    }

    #[test]
    fn angle_penalty_bearings() {
        let t = Point::new(0, 0);
        assert_eq!(angle_penalty_for(Point::new(4, 0), t, 3.0), 0.0);
        assert_eq!(angle_penalty_for(Point::new(0, 4), t, 3.0), 0.0);
        assert_eq!(angle_penalty_for(Point::new(3, 3), t, 3.0), 0.0);
        assert_eq!(angle_penalty_for(Point::new(-3, 3), t, 3.0), 0.0);
        // atan(1/2) is about 26.6°, 18.4° away from the diagonal.
        assert_eq!(angle_penalty_for(Point::new(2, 1), t, 3.0), 3.0);
        // atan(1/5) is about 11.3°, inside the tolerance.
        assert_eq!(angle_penalty_for(Point::new(5, 1), t, 3.0), 0.0);
        assert_eq!(angle_penalty_for(t, t, 3.0), 0.0);
        assert_eq!(angle_penalty_for(Point::new(2, 1), t, 0.0), 0.0);
    }

    #[test]
    fn angle_penalty_raises_off_axis_cells_only() {
        let cfg = NavConfig::default();
        let mut plain = open_grid(5, 5);
        compute_flow_field(&mut plain, &cfg, Point::new(0, 0));
        let mut penalised = open_grid(5, 5);
        compute_flow_field(&mut penalised, &cfg.with_angle_penalty(10.0), Point::new(0, 0));

        assert_eq!(penalised.integration_at(Point::new(4, 0)), 4.0);
        assert!(
            (penalised.integration_at(Point::new(4, 4)) - plain.integration_at(Point::new(4, 4)))
                .abs()
                < 1e-4
        );
        assert!(
            penalised.integration_at(Point::new(2, 1)) > plain.integration_at(Point::new(2, 1))
        );
        for (p, cell) in penalised.iter() {
            assert!(cell.integration() >= plain.integration_at(p) - 1e-4);
        }
    }

    #[test]
    fn converged_field_admits_no_improving_edge() {
        let configs = [
            NavConfig::default(),
            NavConfig::default().with_corner_cutting_prevented(false),
            NavConfig::default().with_diagonal(false),
            NavConfig::default().with_angle_penalty(0.5),
        ];
        let mut nbuf = Vec::new();
        for round in 0..24 {
            let mut g = random_grid(10, 8, 0.3, true);
            let cfg = configs[round % configs.len()];
            let target = Point::new(5, 4);
            g.set_blocked(target, false);
            let reached = compute_flow_field(&mut g, &cfg, target);
            assert_eq!(reached, g.cells().iter().filter(|c| c.is_reached()).count());

            for (u, cell) in g.iter() {
                if !cell.is_reached() {
                    assert!(cell.flow().is_zero());
                    continue;
                }
                g.neighbors(u, &cfg, &mut nbuf);
                for &v in &nbuf {
                    let bound = cell.integration() + edge_cost(&g, &cfg, u, v, target);
                    assert!(g.integration_at(v) <= bound + 1e-3);
                }
                if u != target {
                    assert!((cell.flow().length() - 1.0).abs() < 1e-4);
                }
            }
        }
    }

    #[test]
    fn reachability_agrees_with_astar() {
        let cfg = NavConfig::default();
        for _ in 0..10 {
            let mut g = random_grid(9, 9, 0.35, false);
            let target = Point::new(4, 4);
            g.set_blocked(target, false);
            compute_flow_field(&mut g, &cfg, target);
            for p in g.bounds() {
                let has_path = !astar_path(&g, &cfg, p, target).is_empty();
                assert_eq!(has_path, g.integration_at(p) != UNREACHABLE, "at {p}");
            }
        }
    }

    #[test]
    fn following_flow_reaches_target() {
        let cfg = NavConfig::default();
        let mut g = random_grid(12, 12, 0.2, true);
        let target = Point::new(6, 6);
        g.set_blocked(target, false);
        compute_flow_field(&mut g, &cfg, target);
        let mut nbuf = Vec::new();
        for start in g.bounds() {
            if g.integration_at(start) == UNREACHABLE {
                continue;
            }
            let mut p = start;
            for _ in 0..g.len() {
                if p == target {
                    break;
                }
                g.neighbors(p, &cfg, &mut nbuf);
                let next = nbuf
                    .iter()
                    .copied()
                    .min_by(|a, b| g.integration_at(*a).total_cmp(&g.integration_at(*b)))
                    .unwrap();
                assert!(g.integration_at(next) < g.integration_at(p));
                p = next;
            }
            assert_eq!(p, target);
        }
    }
}
