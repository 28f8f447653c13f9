use crate::point::Point;

/// Emitted every time the board advances one generation.
///
/// Only cells that changed state are listed, so a presentation layer can redraw just those.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Generation {
    /// Generations advanced since the board was last cleared, including this one.
    pub index: u64,

    /// Cells that came alive, sorted.
    pub born: Vec<Point>,

    /// Cells that died, sorted.
    pub died: Vec<Point>,
}

impl Generation {
    /// Nothing changed, the board reached a fixed point.
    pub fn is_still(&self) -> bool {
        self.born.is_empty() && self.died.is_empty()
    }
}
