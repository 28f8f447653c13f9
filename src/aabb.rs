use core::fmt::Debug;

use crate::point::Point;
use crate::Coord;

/// Axis-aligned bounding box of the board. Both axes are half-open, so a cell `p` is inside iff
/// `min.x <= p.x < max.x` and `min.y <= p.y < max.y`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Aabb {
    min: Point,
    max: Point,
}

impl Aabb {
    /// Create a box from its inclusive `min` and exclusive `max` corners. An inverted box is
    /// empty.
    pub fn new(min: Point, max: Point) -> Self {
        Aabb { min, max }
    }

    /// Create a `width` by `height` box around `center`.
    ///
    /// `min = center - size / 2` and `max = min + size`, so an odd size puts the extra column
    /// (or row) on the positive side of the center.
    ///
    /// Returns `None` if the box does not fit in `Coord`.
    pub fn centered(width: u32, height: u32, center: Point) -> Option<Self> {
        let w = Coord::try_from(width).ok()?;
        let h = Coord::try_from(height).ok()?;

        let min = Point {
            x: center.x.checked_sub(w / 2)?,
            y: center.y.checked_sub(h / 2)?,
        };

        let max = Point {
            x: min.x.checked_add(w)?,
            y: min.y.checked_add(h)?,
        };

        Some(Aabb { min, max })
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn width(&self) -> u32 {
        if self.max.x > self.min.x {
            self.max.x.abs_diff(self.min.x)
        } else {
            0
        }
    }

    pub fn height(&self) -> u32 {
        if self.max.y > self.min.y {
            self.max.y.abs_diff(self.min.y)
        } else {
            0
        }
    }

    /// Number of cells in the box.
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn contains(&self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Every cell inside the box, row by row starting at `min.y`.
    pub fn cells(&self) -> impl Iterator<Item = Point> + use<> {
        let (xs, ys) = (self.min.x..self.max.x, self.min.y..self.max.y);

        ys.flat_map(move |y| xs.clone().map(move |x| Point { x, y }))
    }
}

impl Debug for Aabb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}) x [{}, {})",
            self.min.x, self.max.x, self.min.y, self.max.y
        )
    }
}
