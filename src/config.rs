use std::time::Duration;

use thiserror::Error;

use crate::aabb::Aabb;
use crate::point::Point;
use crate::rule_set::RuleSet;

/// Fastest allowed update interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Slowest allowed update interval.
pub const MAX_INTERVAL: Duration = Duration::from_secs(1);

/// Chance for a cell to start alive when randomizing, unless told otherwise.
pub const DEFAULT_DENSITY: f64 = 0.15;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board dimensions must be positive, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },

    #[error("A {width}x{height} board centered on {center:?} does not fit in 32 bit coordinates")]
    BoundsOverflow {
        width: u32,
        height: u32,
        center: Point,
    },
}

/// Construction time settings. The board's size and center can't change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub center: Point,

    /// Time between two generations while running. Clamped to `[MIN_INTERVAL, MAX_INTERVAL]`
    /// when the simulation is built.
    pub update_interval: Duration,

    pub rule_set: RuleSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            center: Point::new(0, 0),
            update_interval: Duration::from_millis(50),
            rule_set: RuleSet::default(),
        }
    }
}

impl Config {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn with_rule_set(mut self, rule_set: RuleSet) -> Self {
        self.rule_set = rule_set;
        self
    }

    /// The board's bounds, or why this configuration can't have any.
    pub fn bounds(&self) -> Result<Aabb, ConfigError> {
        let (width, height) = (self.width, self.height);

        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroSize { width, height });
        }

        Aabb::centered(width, height, self.center).ok_or(ConfigError::BoundsOverflow {
            width,
            height,
            center: self.center,
        })
    }
}

/// Convert a rate in steps per second into the time between two steps, clamped to
/// `[MIN_INTERVAL, MAX_INTERVAL]`.
///
/// Rates that are NaN, zero or negative get the slowest interval.
pub fn interval_from_rate(steps_per_second: f64) -> Duration {
    if steps_per_second.is_nan() || steps_per_second <= 0.0 {
        return MAX_INTERVAL;
    }

    Duration::try_from_secs_f64(1.0 / steps_per_second)
        .unwrap_or(MAX_INTERVAL)
        .clamp(MIN_INTERVAL, MAX_INTERVAL)
}
