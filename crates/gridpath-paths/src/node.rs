use gridpath_core::{Grid, Point};

/// Parent value of a node without predecessor.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Per-node bookkeeping of one best-first search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchNode {
    /// Best known cost from the start.
    pub(crate) g: f32,
    /// Heuristic estimate to the goal.
    pub(crate) h: f32,
    pub(crate) f: f32,
    pub(crate) parent: usize,
    pub(crate) closed: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g: f32::INFINITY,
            h: 0.0,
            f: f32::INFINITY,
            parent: NO_PARENT,
            closed: false,
        }
    }
}

/// Node array sized to the grid, allocated fresh for every query.
pub(crate) struct SearchNodes {
    nodes: Vec<SearchNode>,
}

impl SearchNodes {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            nodes: vec![SearchNode::default(); len],
        }
    }

    /// Record a better route to `idx` through `parent`.
    #[inline]
    pub(crate) fn improve(&mut self, idx: usize, parent: usize, g: f32, h: f32) {
        let n = &mut self.nodes[idx];
        n.g = g;
        n.h = h;
        n.f = n.g + n.h;
        n.parent = parent;
    }

    /// Walk parent links back from `goal` and return the start→goal cells.
    pub(crate) fn reconstruct(&self, grid: &Grid, goal: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut ci = goal;
        while ci != NO_PARENT {
            let Some(p) = grid.coords_of(ci) else {
                break;
            };
            path.push(p);
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        path
    }
}

impl std::ops::Index<usize> for SearchNodes {
    type Output = SearchNode;

    #[inline]
    fn index(&self, idx: usize) -> &SearchNode {
        &self.nodes[idx]
    }
}

impl std::ops::IndexMut<usize> for SearchNodes {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut SearchNode {
        &mut self.nodes[idx]
    }
}

/// Outcome counters of one search, reported alongside the path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes popped from the open set and expanded.
    pub expanded: usize,
    /// Cells in the returned path (0 when no path was found).
    pub path_len: usize,
}
