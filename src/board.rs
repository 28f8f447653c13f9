use std::fmt;

use rand::Rng;
use tracing::trace;

use crate::aabb::Aabb;
use crate::events::Generation;
use crate::point::Point;
use crate::rule_set::RuleSet;
use crate::step;
use crate::LiveSet;

/// A bounded board and the cells alive on it.
///
/// Dead cells are not stored. Every cell in the live set is inside `bounds`, which is checked on
/// every write.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    bounds: Aabb,

    live: LiveSet,

    rule_set: RuleSet,

    /// Generations advanced since the last [`Board::clear`]
    generation: u64,
}

impl Board {
    /// Create an empty board
    pub fn new(bounds: Aabb, rule_set: RuleSet) -> Self {
        Self {
            bounds,
            live: LiveSet::new(),
            rule_set,
            generation: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn rule_set(&self) -> RuleSet {
        self.rule_set
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn live(&self) -> &LiveSet {
        &self.live
    }

    /// Cells outside the bounds are always dead.
    pub fn is_alive(&self, cell: Point) -> bool {
        self.bounds.contains(cell) && self.live.contains(&cell)
    }

    /// Bring `cell` to life. Returns whether anything changed.
    ///
    /// Writes outside the bounds are ignored.
    pub fn set_alive(&mut self, cell: Point) -> bool {
        if !self.bounds.contains(cell) {
            trace!(?cell, bounds = ?self.bounds, "ignoring out of bounds write");
            return false;
        }

        self.live.insert(cell)
    }

    /// Kill `cell`. Returns whether anything changed.
    ///
    /// Writes outside the bounds are ignored.
    pub fn set_dead(&mut self, cell: Point) -> bool {
        if !self.bounds.contains(cell) {
            trace!(?cell, bounds = ?self.bounds, "ignoring out of bounds write");
            return false;
        }

        self.live.remove(&cell)
    }

    /// Set `cell` to `alive`. Returns whether anything changed.
    pub fn set(&mut self, cell: Point, alive: bool) -> bool {
        if alive {
            self.set_alive(cell)
        } else {
            self.set_dead(cell)
        }
    }

    /// Kill every cell and reset the generation counter.
    pub fn clear(&mut self) {
        self.live.clear();
        self.generation = 0;
    }

    /// Clear the board, then bring each cell to life independently with probability `p`.
    ///
    /// `p` is clamped to `[0, 1]`, and NaN is treated as `0`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, p: f64, rng: &mut R) {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };

        self.clear();

        if p == 0.0 {
            return;
        }

        let live = self.bounds.cells().filter(|_| rng.gen_bool(p));
        self.live.extend(live);
    }

    /// Advance one generation. The new live set replaces the old one wholesale.
    pub fn advance(&mut self) -> Generation {
        let next = step::next_generation(&self.bounds, &self.live, &self.rule_set);
        let (born, died) = step::diff(&self.live, &next);

        self.live = next;
        self.generation += 1;

        Generation {
            index: self.generation,
            born,
            died,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("bounds", &self.bounds)
            .field("rule_set", &self.rule_set)
            .field("generation", &self.generation)
            .field("population", &self.live.len())
            .finish()
    }
}

/// Draws the board one row per line, `o` for live and `.` for dead. The top line is the row at
/// `max.y - 1`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = (self.bounds.min(), self.bounds.max());

        for y in (min.y..max.y).rev() {
            if y != max.y - 1 {
                writeln!(f)?;
            }

            for x in min.x..max.x {
                let c = if self.live.contains(&Point { x, y }) {
                    'o'
                } else {
                    '.'
                };

                write!(f, "{c}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use insta::assert_snapshot;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::Board;
    use crate::aabb::Aabb;
    use crate::point::Point;
    use crate::rule_set::B3S23;

    fn board(width: u32, height: u32) -> Board {
        let bounds = Aabb::centered(width, height, Point::new(0, 0)).unwrap();
        Board::new(bounds, B3S23)
    }

    fn place(board: &mut Board, cells: &[(i32, i32)]) {
        for &c in cells {
            assert!(board.set_alive(c.into()));
        }
    }

    #[test]
    fn set_and_query() {
        let mut b = board(4, 4);

        assert!(!b.is_alive(Point::new(0, 0)));
        assert!(b.set_alive(Point::new(0, 0)));
        assert!(!b.set_alive(Point::new(0, 0)));
        assert!(b.is_alive(Point::new(0, 0)));
        assert_eq!(b.population(), 1);

        assert!(b.set_dead(Point::new(0, 0)));
        assert!(!b.set_dead(Point::new(0, 0)));
        assert!(b.is_empty());
    }

    #[test]
    fn out_of_bounds_writes_ignored() {
        // [-2, 2) x [-2, 2)
        let mut b = board(4, 4);

        assert!(!b.set_alive(Point::new(2, 0)));
        assert!(!b.set(Point::new(0, -3), true));
        assert!(!b.set_dead(Point::new(100, 100)));

        assert!(b.is_empty());
        assert!(!b.is_alive(Point::new(2, 0)));
    }

    #[test]
    fn randomize_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut b = board(9, 7);

        b.randomize(0.0, &mut rng);
        assert!(b.is_empty());

        b.randomize(1.0, &mut rng);
        assert_eq!(b.population(), 63);
        assert!(b.bounds().cells().all(|p| b.is_alive(p)));

        // clamped
        b.randomize(-3.0, &mut rng);
        assert!(b.is_empty());

        b.randomize(42.0, &mut rng);
        assert_eq!(b.population(), 63);

        b.randomize(f64::NAN, &mut rng);
        assert!(b.is_empty());
    }

    #[test]
    fn randomize_density() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut b = board(100, 100);

        b.randomize(0.15, &mut rng);

        // 1500 expected, the standard deviation is about 36
        let pop = b.population();
        assert!((1200..1800).contains(&pop), "population was {pop}");
    }

    #[test]
    fn randomize_resets_generation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut b = board(8, 8);

        b.advance();
        b.advance();
        assert_eq!(b.generation(), 2);

        b.randomize(0.5, &mut rng);
        assert_eq!(b.generation(), 0);
    }

    #[test]
    fn advance_reports_changes() {
        let mut b = board(6, 6);
        place(&mut b, &[(-1, 0), (0, 0), (1, 0)]);

        let g = b.advance();

        assert_eq!(g.index, 1);
        assert_eq!(g.born, vec![Point::new(0, -1), Point::new(0, 1)]);
        assert_eq!(g.died, vec![Point::new(-1, 0), Point::new(1, 0)]);
        assert_eq!(b.population(), 3);
    }

    #[test]
    fn blinker_snapshot() {
        let mut b = board(5, 5);
        place(&mut b, &[(-1, 0), (0, 0), (1, 0)]);

        assert_snapshot!(b.to_string(), @r"
        .....
        .....
        .ooo.
        .....
        .....
        ");

        b.advance();

        assert_snapshot!(b.to_string(), @r"
        .....
        ..o..
        ..o..
        ..o..
        .....
        ");
    }

    #[test]
    fn block_snapshot() {
        let mut b = board(4, 4);
        place(&mut b, &[(-1, -1), (0, -1), (-1, 0), (0, 0)]);

        let before = b.to_string();
        let g = b.advance();

        assert!(g.is_still());
        assert_eq!(b.to_string(), before);
        assert_snapshot!(b.to_string(), @r"
        ....
        .oo.
        .oo.
        ....
        ");
    }

    #[test]
    fn corner_snapshot() {
        // [0, 3) x [0, 3) with an L in the bottom left corner
        let mut b = Board::new(Aabb::new(Point::new(0, 0), Point::new(3, 3)), B3S23);
        place(&mut b, &[(0, 0), (1, 0), (0, 1)]);

        b.advance();

        assert_snapshot!(b.to_string(), @r"
        ...
        oo.
        oo.
        ");
    }

    proptest! {
        #[test]
        fn outside_is_dead(x in any::<i32>(), y in any::<i32>(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut b = board(10, 10);
            b.randomize(0.5, &mut rng);

            let p = Point::new(x, y);
            b.set_alive(p);

            if !b.bounds().contains(p) {
                prop_assert!(!b.is_alive(p));
            }
            prop_assert!(b.live().iter().all(|&c| b.bounds().contains(c)));
        }
    }
}
