use core::fmt::Debug;

use crate::Coord;

/// Offsets of the Moore neighborhood, i.e. every `(dx, dy)` with `dx, dy ∈ {-1, 0, 1}` except
/// `(0, 0)`.
pub const NEIGHBORHOOD: [(Coord, Coord); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A cell coordinate on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Shift the point by `(dx, dy)`. Returns `None` if either coordinate would overflow.
    pub fn offset(&self, dx: Coord, dy: Coord) -> Option<Self> {
        Some(Point {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// The 8 cells surrounding this one. Bounds are not checked here, only integer overflow.
    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        NEIGHBORHOOD
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(Coord, Coord)> for Point {
    fn from((x, y): (Coord, Coord)) -> Self {
        Point { x, y }
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
