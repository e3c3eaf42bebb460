use gridpath_core::{Grid, NavConfig, Point, UNREACHABLE, Vec3};

use crate::astar::astar_search;
use crate::flowfield::compute_flow_field;
use crate::node::SearchStats;
use crate::theta::theta_star_search;

/// World-space front end over one [`Grid`].
///
/// `Pathfinder` owns the grid and the active [`NavConfig`]. Path queries
/// take world positions, snap them to cells and return the centres of the
/// path cells; the flow field is recomputed for a world-space target and
/// then sampled at any world position.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    grid: Grid,
    config: NavConfig,
    target: Option<Point>,
    last_stats: SearchStats,
}

impl Pathfinder {
    /// Wrap `grid`, using `config` (clamped) for every query.
    pub fn new(grid: Grid, config: NavConfig) -> Self {
        Self {
            grid,
            config: config.clamped(),
            target: None,
            last_stats: SearchStats::default(),
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the grid, for collaborators that edit costs.
    ///
    /// Edits are not reflected in the flow field until the next
    /// [`recompute_flow_field`](Self::recompute_flow_field).
    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Give the grid back, dropping the pathfinder.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: NavConfig) {
        self.config = config.clamped();
    }

    /// Counters of the most recent path query.
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Cell of the current flow-field target, if a field was computed.
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    /// A* path between two world positions, as cell centres.
    ///
    /// Empty when either position falls outside the grid or on a blocked
    /// cell, has a NaN or infinite coordinate, or when no path exists.
    pub fn find_path_astar(&mut self, start: Vec3, goal: Vec3) -> Vec<Vec3> {
        let (Some(s), Some(g)) = self.endpoints(start, goal) else {
            return Vec::new();
        };
        let cells = self.astar_cells(s, g);
        self.to_world(&cells)
    }

    /// Lazy Theta* path between two world positions, as waypoint cell
    /// centres. Same failure cases as [`find_path_astar`](Self::find_path_astar).
    pub fn find_path_theta_star(&mut self, start: Vec3, goal: Vec3) -> Vec<Vec3> {
        let (Some(s), Some(g)) = self.endpoints(start, goal) else {
            return Vec::new();
        };
        let cells = self.theta_star_cells(s, g);
        self.to_world(&cells)
    }

    /// A* path between two cells.
    pub fn astar_cells(&mut self, start: Point, goal: Point) -> Vec<Point> {
        let (path, stats) = astar_search(&self.grid, &self.config, start, goal);
        self.last_stats = stats;
        path
    }

    /// Lazy Theta* path between two cells.
    pub fn theta_star_cells(&mut self, start: Point, goal: Point) -> Vec<Point> {
        let (path, stats) = theta_star_search(&self.grid, &self.config, start, goal);
        self.last_stats = stats;
        path
    }

    /// Recompute the flow field toward the cell containing `target`.
    ///
    /// Returns the number of cells that can reach it. A target outside the
    /// grid clears the field and returns 0.
    pub fn recompute_flow_field(&mut self, target: Vec3) -> usize {
        match self.grid.world_to_cell(target) {
            Some(t) => self.recompute_flow_field_cell(t),
            None => {
                log::warn!("flow field target {target} is outside the grid");
                self.grid.reset_flow_field();
                self.target = None;
                0
            }
        }
    }

    /// Recompute the flow field toward cell `target`.
    pub fn recompute_flow_field_cell(&mut self, target: Point) -> usize {
        let reached = compute_flow_field(&mut self.grid, &self.config, target);
        self.target = if reached > 0 { Some(target) } else { None };
        reached
    }

    /// Steering direction at `pos`: a unit vector, or zero outside the
    /// grid, at the target and in regions that cannot reach it.
    pub fn flow_direction(&self, pos: Vec3) -> Vec3 {
        self.grid
            .world_to_cell(pos)
            .map_or(Vec3::ZERO, |p| self.grid.flow_at(p))
    }

    /// Integration value at `pos`, or [`UNREACHABLE`] outside the grid.
    pub fn integration_at_world(&self, pos: Vec3) -> f32 {
        self.grid
            .world_to_cell(pos)
            .map_or(UNREACHABLE, |p| self.grid.integration_at(p))
    }

    fn endpoints(&self, start: Vec3, goal: Vec3) -> (Option<Point>, Option<Point>) {
        let s = self.grid.world_to_cell(start);
        let g = self.grid.world_to_cell(goal);
        if s.is_none() || g.is_none() {
            log::debug!("path query {start} -> {goal} leaves the grid");
        }
        (s, g)
    }

    fn to_world(&self, cells: &[Point]) -> Vec<Vec3> {
        cells.iter().map(|&p| self.grid.cell_to_world(p)).collect()
    }
}
