//! Grids described as text.
//!
//! A [`Layout`] is an ASCII map, one character per cell and one line per
//! row:
//!
//! | char | cell |
//! |---|---|
//! | `#` | blocked |
//! | `.` | walkable, cost 1 |
//! | `1`–`9` | walkable, that cost |
//!
//! All lines must have the same width. Whitespace around the whole text is
//! ignored, so layouts can be written as indented string literals.

use std::fmt;
use std::str::FromStr;

use gridpath_core::{Grid, GridError, Point, Vec3};

const BLOCKED: char = '#';
const OPEN: char = '.';

/// Stored cost of a `#` cell.
const BLOCKED_COST: i32 = -1;

/// A parsed text map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Layout {
    costs: Vec<i32>,
    size: Point,
}

impl Layout {
    /// Parse a layout. See the [module docs](self) for the format.
    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LayoutError::Empty);
        }
        let mut costs = Vec::with_capacity(s.len());
        let mut width: Option<i32> = None;
        let mut height = 0;

        for (y, line) in s.lines().enumerate() {
            let line = line.trim_end_matches('\r').trim();
            let y = y as i32;
            let mut x = 0;
            for ch in line.chars() {
                let cost = match ch {
                    BLOCKED => BLOCKED_COST,
                    OPEN => 1,
                    '1'..='9' => ch as i32 - '0' as i32,
                    _ => {
                        return Err(LayoutError::InvalidChar {
                            ch,
                            pos: Point::new(x, y),
                        });
                    }
                };
                costs.push(cost);
                x += 1;
            }
            match width {
                None => width = Some(x),
                Some(w) if w != x => {
                    return Err(LayoutError::InconsistentWidth {
                        line: y,
                        expected: w,
                        found: x,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }

        Ok(Self {
            costs,
            size: Point::new(width.unwrap_or(0), height),
        })
    }

    /// Width and height in cells.
    pub fn size(&self) -> Point {
        self.size
    }

    /// Row-major stored costs, `-1` for blocked cells.
    pub fn costs(&self) -> &[i32] {
        &self.costs
    }

    /// Stored cost at `p`, or `None` outside the layout.
    pub fn cost_at(&self, p: Point) -> Option<i32> {
        if p.x < 0 || p.y < 0 || p.x >= self.size.x || p.y >= self.size.y {
            return None;
        }
        self.costs.get((p.y * self.size.x + p.x) as usize).copied()
    }

    /// Write the layout into `grid`, anchored at cell (0, 0).
    ///
    /// Cells outside the overlap of the two are left alone. Returns the
    /// number of grid cells written.
    pub fn apply(&self, grid: &mut Grid) -> usize {
        let mut written = 0;
        for y in 0..self.size.y {
            for x in 0..self.size.x {
                let p = Point::new(x, y);
                let Some(cost) = self.cost_at(p) else {
                    continue;
                };
                if grid.set_cell_cost(p, cost) {
                    written += 1;
                }
            }
        }
        if written < self.costs.len() {
            log::debug!(
                "layout {}x{} clipped to {}x{} grid",
                self.size.x,
                self.size.y,
                grid.width(),
                grid.height()
            );
        }
        written
    }

    /// Build a grid of exactly the layout's size.
    pub fn to_grid(&self, cell_size: f32, origin: Vec3) -> Result<Grid, LayoutError> {
        let grid = Grid::from_costs(self.size.x, self.size.y, cell_size, origin, &self.costs)?;
        Ok(grid)
    }

    /// Render `grid` in layout format, letting `overlay` replace the
    /// character of any cell (for paths, targets and the like).
    ///
    /// Costs above 9 are shown as `9`.
    pub fn render(grid: &Grid, overlay: impl Fn(Point) -> Option<char>) -> String {
        let mut out = String::with_capacity(grid.len() + grid.height() as usize);
        for y in 0..grid.height() {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..grid.width() {
                let p = Point::new(x, y);
                let ch = overlay(p).unwrap_or_else(|| match grid.cell(p) {
                    Some(c) if !c.is_walkable() => BLOCKED,
                    Some(c) if c.cost() > 1 => cost_char(c.cost()),
                    _ => OPEN,
                });
                out.push(ch);
            }
        }
        out
    }
}

fn cost_char(cost: i32) -> char {
    char::from_digit(cost.clamp(1, 9) as u32, 10).unwrap_or(OPEN)
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, LayoutError> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Layout {
    type Error = LayoutError;

    fn try_from(s: String) -> Result<Self, LayoutError> {
        Self::parse(&s)
    }
}

impl From<Layout> for String {
    fn from(layout: Layout) -> String {
        layout.to_string()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.costs.chunks(self.size.x.max(1) as usize).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &cost in row {
                let ch = if cost == BLOCKED_COST {
                    BLOCKED
                } else if cost == 1 {
                    OPEN
                } else {
                    cost_char(cost)
                };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Errors that can occur when parsing or instantiating a layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The text holds no cells.
    Empty,
    /// A line's width differs from the first line's.
    InconsistentWidth { line: i32, expected: i32, found: i32 },
    /// A character outside `#`, `.` and `1`–`9`.
    InvalidChar { ch: char, pos: Point },
    /// The layout does not describe a valid grid.
    Grid(GridError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "layout: empty"),
            Self::InconsistentWidth {
                line,
                expected,
                found,
            } => write!(
                f,
                "layout: line {line} has width {found}, expected {expected}"
            ),
            Self::InvalidChar { ch, pos } => {
                write!(f, "layout contains invalid character \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::Grid(err) => write!(f, "layout: {err}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GridError> for LayoutError {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}
