pub mod aabb;
pub mod board;
pub mod config;
pub mod events;
pub mod point;
pub mod rule_set;
pub mod simulation;
pub mod step;

pub type Coord = i32;

/// Every live cell of a board. Dead cells are not stored.
pub type LiveSet = std::collections::HashSet<point::Point>;
