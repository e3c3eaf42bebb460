//! Grid line rasterisation and line-of-sight queries.

use gridpath_core::{Grid, Point};

/// Iterator over the cells of the Bresenham line from `from` to `to`,
/// both endpoints included.
#[derive(Debug, Clone)]
pub struct Bresenham {
    cur: Point,
    end: Point,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

/// Rasterise the segment `from`–`to`.
pub fn bresenham(from: Point, to: Point) -> Bresenham {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    Bresenham {
        cur: from,
        end: to,
        dx,
        dy,
        sx: if from.x < to.x { 1 } else { -1 },
        sy: if from.y < to.y { 1 } else { -1 },
        err: dx - dy,
        done: false,
    }
}

impl Iterator for Bresenham {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let p = self.cur;
        if p == self.end {
            self.done = true;
            return Some(p);
        }
        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.cur.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.cur.y += self.sy;
        }
        Some(p)
    }
}

/// Whether every cell on the Bresenham line between `from` and `to` is
/// inside the grid and walkable.
pub fn line_of_sight(grid: &Grid, from: Point, to: Point) -> bool {
    bresenham(from, to).all(|p| grid.is_walkable(p))
}
