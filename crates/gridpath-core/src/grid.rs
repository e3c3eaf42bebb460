//! The cost grid shared by every search.
//!
//! A [`Grid`] owns a row-major array of exactly `width * height` [`Cell`]s,
//! centred on a world-space origin. All algorithms borrow the same grid;
//! only external collaborators change costs, and only the flow field writes
//! the per-cell integration and direction data.

use crate::cell::{Cell, UNREACHABLE};
use crate::config::{GridConfig, NavConfig};
use crate::error::GridError;
use crate::geom::{CARDINALS, DIAGONALS, Point, Range, Vec3};

/// A rectangular lattice of weighted cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: f32,
    origin: Vec3,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of walkable cost-1 cells.
    ///
    /// Fails when either dimension is not positive or `cell_size` is not a
    /// positive finite number.
    pub fn new(width: i32, height: i32, cell_size: f32, origin: Vec3) -> Result<Self, GridError> {
        if let Err(err) = validate(width, height, cell_size) {
            log::warn!("rejecting grid configuration: {err}");
            return Err(err);
        }
        let bounds = Range::new(0, 0, width, height);
        let mut grid = Self {
            width,
            height,
            cell_size,
            origin,
            cells: Vec::with_capacity(bounds.len()),
        };
        for p in bounds {
            let world = grid.cell_to_world(p);
            grid.cells.push(Cell::new(p, world));
        }
        log::debug!("created {width}x{height} grid, cell size {cell_size}, origin {origin}");
        Ok(grid)
    }

    /// Create a grid from a [`GridConfig`].
    pub fn from_config(cfg: &GridConfig) -> Result<Self, GridError> {
        Self::new(cfg.width, cfg.height, cfg.cell_size, cfg.origin)
    }

    /// Create a grid and load a row-major cost array into it.
    ///
    /// `costs` must hold exactly `width * height` values. Each value goes
    /// is stored as by [`set_cell_cost`](Self::set_cell_cost), so legacy
    /// blocked encodings are accepted.
    pub fn from_costs(
        width: i32,
        height: i32,
        cell_size: f32,
        origin: Vec3,
        costs: &[i32],
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(width, height, cell_size, origin)?;
        if costs.len() != grid.len() {
            let err = GridError::CellCountMismatch {
                expected: grid.len(),
                actual: costs.len(),
            };
            log::warn!("rejecting grid costs: {err}");
            return Err(err);
        }
        for (cell, &cost) in grid.cells.iter_mut().zip(costs) {
            cell.set_cost(cost);
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Number of cells, always `width * height`.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: construction rejects empty grids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The lattice rectangle `[0, width) x [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    // -----------------------------------------------------------------------
    // Index helpers
    // -----------------------------------------------------------------------

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Flat index of `p`, or `None` outside the grid.
    #[inline]
    pub fn index_of(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    /// Coordinates of a flat index, or `None` when it is out of range.
    #[inline]
    pub fn coords_of(&self, idx: usize) -> Option<Point> {
        if idx >= self.cells.len() {
            return None;
        }
        let w = self.width as usize;
        Some(Point::new((idx % w) as i32, (idx / w) as i32))
    }

    #[inline]
    pub fn cell(&self, p: Point) -> Option<&Cell> {
        self.index_of(p).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn cell_at(&self, idx: usize) -> Option<&Cell> {
        self.cells.get(idx)
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over `(Point, &Cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Cell)> + '_ {
        self.cells.iter().map(|c| (c.pos, c))
    }

    // -----------------------------------------------------------------------
    // Costs
    // -----------------------------------------------------------------------

    /// Whether `p` is inside the grid and not blocked.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.cell(p).is_some_and(Cell::is_walkable)
    }

    /// Whether `idx` is a valid index of a cell that is not blocked.
    #[inline]
    pub fn is_walkable_index(&self, idx: usize) -> bool {
        self.cells.get(idx).is_some_and(Cell::is_walkable)
    }

    /// Terrain multiplier of the cell at `idx`, at least 1.
    ///
    /// Out-of-range indices report the nominal cost of 1.
    #[inline]
    pub fn terrain_cost_index(&self, idx: usize) -> f32 {
        self.cells.get(idx).map_or(1.0, Cell::traversal_cost)
    }

    /// Terrain multiplier of the cell at `p`, at least 1.
    #[inline]
    pub fn terrain_cost(&self, p: Point) -> f32 {
        self.cell(p).map_or(1.0, Cell::traversal_cost)
    }

    /// Store a cost for `p`. Negative costs or costs at or above
    /// [`IMPASSABLE_COST`](crate::IMPASSABLE_COST) block the cell.
    ///
    /// Returns `false` when `p` is outside the grid.
    pub fn set_cell_cost(&mut self, p: Point, cost: i32) -> bool {
        match self.index_of(p) {
            Some(i) => {
                self.cells[i].set_cost(cost);
                true
            }
            None => false,
        }
    }

    /// Block or unblock `p`. Returns `false` when `p` is outside the grid.
    pub fn set_blocked(&mut self, p: Point, blocked: bool) -> bool {
        match self.index_of(p) {
            Some(i) => {
                self.cells[i].set_blocked(blocked);
                true
            }
            None => false,
        }
    }

    /// Make every cell walkable with cost 1.
    pub fn reset_costs(&mut self) {
        for cell in &mut self.cells {
            cell.set_cost(1);
        }
    }

    /// Number of blocked cells.
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.blocked).count()
    }

    // -----------------------------------------------------------------------
    // Coordinate conversion
    // -----------------------------------------------------------------------

    /// Offset that centres the lattice on `origin`.
    #[inline]
    fn centering_offset(&self) -> (f32, f32) {
        let half = self.cell_size * 0.5;
        (
            self.width as f32 * self.cell_size * 0.5 - half,
            self.height as f32 * self.cell_size * 0.5 - half,
        )
    }

    /// Lattice coordinates nearest to `world`, without bounds checking.
    ///
    /// `None` when the planar coordinates are not finite. Huge finite
    /// values saturate to the `i32` range.
    fn world_to_lattice(&self, world: Vec3) -> Option<Point> {
        if !(world.x.is_finite() && world.y.is_finite()) {
            return None;
        }
        let local = world - self.origin;
        let (ox, oy) = self.centering_offset();
        Some(Point::new(
            ((local.x + ox) / self.cell_size + 0.5).floor() as i32,
            ((local.y + oy) / self.cell_size + 0.5).floor() as i32,
        ))
    }

    /// The cell whose centre is nearest to `world`, or `None` when that
    /// cell lies outside the grid or `world` has a NaN or infinite x or y.
    pub fn world_to_cell(&self, world: Vec3) -> Option<Point> {
        self.world_to_lattice(world).filter(|&p| self.contains(p))
    }

    /// Like [`world_to_cell`](Self::world_to_cell) but snaps finite
    /// positions outside the grid onto the nearest border cell.
    ///
    /// Still `None` for a NaN or infinite x or y.
    pub fn world_to_cell_clamped(&self, world: Vec3) -> Option<Point> {
        self.world_to_lattice(world).map(|p| self.bounds().clamp(p))
    }

    /// World-space centre of `p`. Defined for any lattice coordinate,
    /// including ones outside the grid.
    pub fn cell_to_world(&self, p: Point) -> Vec3 {
        let (ox, oy) = self.centering_offset();
        self.origin
            + Vec3::new(
                p.x as f32 * self.cell_size - ox,
                p.y as f32 * self.cell_size - oy,
                0.0,
            )
    }

    // -----------------------------------------------------------------------
    // Neighbours
    // -----------------------------------------------------------------------

    /// Fill `buf` with the walkable neighbours of `p` under `cfg`.
    ///
    /// `buf` is cleared first. Cardinals come first (N, E, S, W), then the
    /// diagonals (NE, SE, SW, NW) when `cfg.allow_diagonal` is set. With
    /// `cfg.prevent_diagonal_cutting`, a diagonal neighbour is kept only
    /// if both cells sharing an edge with `p` and the neighbour are
    /// walkable.
    pub fn neighbors(&self, p: Point, cfg: &NavConfig, buf: &mut Vec<Point>) {
        buf.clear();
        for d in CARDINALS {
            let n = p + d;
            if self.is_walkable(n) {
                buf.push(n);
            }
        }
        if !cfg.allow_diagonal {
            return;
        }
        for d in DIAGONALS {
            let n = p + d;
            if !self.is_walkable(n) {
                continue;
            }
            if cfg.prevent_diagonal_cutting
                && !(self.is_walkable(p.shift(d.x, 0)) && self.is_walkable(p.shift(0, d.y)))
            {
                continue;
            }
            buf.push(n);
        }
    }

    // -----------------------------------------------------------------------
    // Flow-field data
    // -----------------------------------------------------------------------

    /// Reset every integration value to [`UNREACHABLE`] and every flow
    /// direction to zero.
    pub fn reset_flow_field(&mut self) {
        for cell in &mut self.cells {
            cell.integration = UNREACHABLE;
            cell.flow = Vec3::ZERO;
        }
    }

    /// Store the integration value of the cell at `idx`.
    ///
    /// Returns `false` when `idx` is out of range.
    pub fn set_integration(&mut self, idx: usize, value: f32) -> bool {
        match self.cells.get_mut(idx) {
            Some(cell) => {
                cell.integration = value;
                true
            }
            None => false,
        }
    }

    /// Store the steering direction of the cell at `idx`.
    ///
    /// Returns `false` when `idx` is out of range.
    pub fn set_flow(&mut self, idx: usize, flow: Vec3) -> bool {
        match self.cells.get_mut(idx) {
            Some(cell) => {
                cell.flow = flow;
                true
            }
            None => false,
        }
    }

    /// Integration value of the cell at `idx`, or [`UNREACHABLE`] when
    /// `idx` is out of range.
    #[inline]
    pub fn integration_index(&self, idx: usize) -> f32 {
        self.cells.get(idx).map_or(UNREACHABLE, |c| c.integration)
    }

    /// Integration value at `p`, or [`UNREACHABLE`] outside the grid.
    pub fn integration_at(&self, p: Point) -> f32 {
        self.cell(p).map_or(UNREACHABLE, |c| c.integration)
    }

    /// Flow direction at `p`, or zero outside the grid.
    pub fn flow_at(&self, p: Point) -> Vec3 {
        self.cell(p).map_or(Vec3::ZERO, |c| c.flow)
    }
}

fn validate(width: i32, height: i32, cell_size: f32) -> Result<(), GridError> {
    if width <= 0 || height <= 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(GridError::InvalidCellSize(cell_size));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// serde
// ---------------------------------------------------------------------------

/// Serialized form: dimensions plus the cost array. Flow-field data and
/// world positions are derived, so they are not stored.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GridRepr {
    width: i32,
    height: i32,
    cell_size: f32,
    origin: Vec3,
    costs: Vec<i32>,
    blocked: Vec<bool>,
}

#[cfg(feature = "serde")]
impl serde::Serialize for Grid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GridRepr {
            width: self.width,
            height: self.height,
            cell_size: self.cell_size,
            origin: self.origin,
            costs: self.cells.iter().map(|c| c.cost).collect(),
            blocked: self.cells.iter().map(|c| c.blocked).collect(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Grid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let repr = GridRepr::deserialize(deserializer)?;
        let mut grid = Grid::from_costs(repr.width, repr.height, repr.cell_size, repr.origin, &repr.costs)
            .map_err(D::Error::custom)?;
        if repr.blocked.len() != grid.len() {
            return Err(D::Error::custom(GridError::CellCountMismatch {
                expected: grid.len(),
                actual: repr.blocked.len(),
            }));
        }
        for (cell, blocked) in grid.cells.iter_mut().zip(repr.blocked) {
            if blocked {
                cell.blocked = true;
            }
        }
        Ok(grid)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_round_trip() {
        let mut g = Grid::new(3, 2, 50.0, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        g.set_cell_cost(Point::new(1, 0), 4);
        g.set_blocked(Point::new(2, 1), true);
        let json = serde_json::to_string(&g).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn grid_rejects_wrong_cell_count() {
        let json = r#"{"width":2,"height":2,"cell_size":1.0,
            "origin":{"x":0.0,"y":0.0,"z":0.0},
            "costs":[1,1,1],"blocked":[false,false,false,false]}"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());
    }
}
