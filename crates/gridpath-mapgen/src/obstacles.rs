//! Random obstacle and terrain generation.

use gridpath_core::{Grid, IMPASSABLE_COST, Point};
use rand::Rng;

/// Random generator operating on a [`Grid`].
pub struct ObstacleGen<R: Rng> {
    pub rng: R,
    pub grid: Grid,
}

impl<R: Rng> ObstacleGen<R> {
    /// Create a generator that edits `grid`.
    pub fn with_grid(grid: Grid, rng: R) -> Self {
        Self { rng, grid }
    }

    /// Give the edited grid back.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Block each cell with probability `chance` (0.0–1.0); every other
    /// cell is reset to a walkable cost of 1.
    ///
    /// Returns the number of blocked cells.
    pub fn scatter_obstacles(&mut self, chance: f64) -> usize {
        let chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
        let mut blocked = 0;
        for p in self.grid.bounds() {
            if self.rng.random_bool(chance) {
                self.grid.set_cell_cost(p, -1);
                blocked += 1;
            } else {
                self.grid.set_cell_cost(p, 1);
            }
        }
        log::debug!(
            "scattered {blocked} obstacles over {} cells (chance {chance})",
            self.grid.len()
        );
        blocked
    }

    /// Give every walkable cell a uniformly random cost in `min..=max`.
    ///
    /// The bounds are swapped if reversed and kept inside the walkable
    /// range `1..IMPASSABLE_COST`. Returns the number of cells changed.
    pub fn randomize_costs(&mut self, min: i32, max: i32) -> usize {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let lo = lo.clamp(1, IMPASSABLE_COST - 1);
        let hi = hi.clamp(1, IMPASSABLE_COST - 1);
        let mut changed = 0;
        for p in self.grid.bounds() {
            if !self.grid.is_walkable(p) {
                continue;
            }
            let cost = self.rng.random_range(lo..=hi);
            self.grid.set_cell_cost(p, cost);
            changed += 1;
        }
        changed
    }

    /// Unblock `points`, e.g. the start and goal of a query, leaving cost
    /// 1 on cells that were blocked. Points outside the grid are skipped.
    ///
    /// Returns the number of cells that were blocked before.
    pub fn keep_clear(&mut self, points: &[Point]) -> usize {
        let mut cleared = 0;
        for &p in points {
            if self.grid.cell(p).is_some_and(|c| !c.is_walkable()) {
                self.grid.set_blocked(p, false);
                cleared += 1;
            }
        }
        cleared
    }
}
