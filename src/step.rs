//! The step engine. Every function here is a pure function of the current generation.
//!
//! Only cells on the frontier (live cells and their Moore neighbors) can change state between
//! two generations, so those are the only cells ever looked at. An empty board costs nothing to
//! step, no matter how large its bounds are.

use std::collections::HashSet;

use crate::aabb::Aabb;
use crate::point::Point;
use crate::rule_set::RuleSet;
use crate::LiveSet;

/// Every in-bounds cell that could change state next generation: each live cell together with
/// its 8 neighbors.
pub fn frontier(bounds: &Aabb, live: &LiveSet) -> HashSet<Point> {
    let mut frontier = HashSet::with_capacity(live.len() * 9);

    for &cell in live {
        if bounds.contains(cell) {
            frontier.insert(cell);
        }

        frontier.extend(cell.neighbors().filter(|&n| bounds.contains(n)));
    }

    frontier
}

/// Count the live neighbors of `cell`. Neighbors outside `bounds` are dead, the board does not
/// wrap around.
pub fn count_neighbors(bounds: &Aabb, live: &LiveSet, cell: Point) -> u8 {
    cell.neighbors()
        .filter(|&n| bounds.contains(n) && live.contains(&n))
        .count() as u8
}

/// Compute generation `n + 1` from generation `n`.
///
/// The result is built into a fresh set, so no cell ever sees a partially updated board.
pub fn next_generation(bounds: &Aabb, live: &LiveSet, rules: &RuleSet) -> LiveSet {
    frontier(bounds, live)
        .into_iter()
        .filter(|&cell| {
            let alive = live.contains(&cell);
            let neighbors = count_neighbors(bounds, live, cell);

            rules.apply(alive, neighbors)
        })
        .collect()
}

/// Cells that came alive and cells that died going from `prev` to `next`, each sorted.
pub fn diff(prev: &LiveSet, next: &LiveSet) -> (Vec<Point>, Vec<Point>) {
    let mut born: Vec<Point> = next.difference(prev).copied().collect();
    let mut died: Vec<Point> = prev.difference(next).copied().collect();

    born.sort_unstable();
    died.sort_unstable();

    (born, died)
}
