//! The [`Cell`] type: one lattice unit of a [`Grid`](crate::Grid).

use crate::geom::{Point, Vec3};

/// Stored costs at or above this value mark a cell impassable.
pub const IMPASSABLE_COST: i32 = 500;

/// Integration value of a cell no flow field has reached.
pub const UNREACHABLE: f32 = f32::INFINITY;

/// A single grid cell.
///
/// The blocked flag is the one authoritative impassability marker.
/// Negative costs and costs at or above [`IMPASSABLE_COST`] are accepted
/// as input and folded into it when stored. Cells are read-only outside
/// this crate; every edit goes through [`Grid`](crate::Grid).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cell {
    pub(crate) pos: Point,
    pub(crate) world: Vec3,
    pub(crate) cost: i32,
    pub(crate) blocked: bool,
    pub(crate) integration: f32,
    pub(crate) flow: Vec3,
}

impl Cell {
    /// A walkable cell of cost 1 with no flow-field data.
    pub(crate) fn new(pos: Point, world: Vec3) -> Self {
        Self {
            pos,
            world,
            cost: 1,
            blocked: false,
            integration: UNREACHABLE,
            flow: Vec3::ZERO,
        }
    }

    /// Whether a stored cost value means "not traversable".
    #[inline]
    pub fn is_blocking_cost(cost: i32) -> bool {
        cost < 0 || cost >= IMPASSABLE_COST
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// World-space centre of the cell.
    #[inline]
    pub fn world(&self) -> Vec3 {
        self.world
    }

    /// Stored cost, as last written. Blocked cells may hold any value.
    #[inline]
    pub fn cost(&self) -> i32 {
        self.cost
    }

    #[inline]
    pub fn is_walkable(&self) -> bool {
        !self.blocked
    }

    /// Accumulated cost to the active flow-field target.
    #[inline]
    pub fn integration(&self) -> f32 {
        self.integration
    }

    /// Unit steering vector towards the best neighbour, or zero.
    #[inline]
    pub fn flow(&self) -> Vec3 {
        self.flow
    }

    /// Store `cost` and derive the blocked flag from it.
    pub(crate) fn set_cost(&mut self, cost: i32) {
        self.cost = cost;
        self.blocked = Self::is_blocking_cost(cost);
    }

    /// Set or clear the blocked flag.
    ///
    /// Unblocking a cell whose stored cost is itself a blocking value
    /// resets the cost to 1.
    pub(crate) fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
        if !blocked && Self::is_blocking_cost(self.cost) {
            self.cost = 1;
        }
    }

    /// Terrain multiplier used by the searches, never below 1.
    #[inline]
    pub fn traversal_cost(&self) -> f32 {
        self.cost.max(1) as f32
    }

    /// Whether the last flow-field computation reached this cell.
    #[inline]
    pub fn is_reached(&self) -> bool {
        self.integration.is_finite()
    }
}
