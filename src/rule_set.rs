use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Conway's Game of Life: born with 3 neighbors, survives with 2 or 3.
pub const B3S23: RuleSet = RuleSet::new(1 << 3, 1 << 2 | 1 << 3);

/// Which neighbor counts give birth to a dead cell, and which keep a live one alive.
///
/// Both sets are 9 bit masks over the counts `0..=8`: bit `i` set means a count of `i`
/// qualifies. So `b36/s23` has births `0b100_1000` and survivals `0b1100`.
///
/// See: https://conwaylife.com/wiki/Rulestring
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    births: u16,
    survivals: u16,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    const COUNTS: u16 = 0x1FF;

    /// Build a rule from birth and survival masks. Bits above count 8 are dropped.
    pub const fn new(births: u16, survivals: u16) -> Self {
        Self {
            births: births & Self::COUNTS,
            survivals: survivals & Self::COUNTS,
        }
    }

    pub fn births(&self) -> u16 {
        self.births
    }

    pub fn survivals(&self) -> u16 {
        self.survivals
    }

    /// Whether a cell is alive next generation, given whether it is `alive` now and how many of
    /// its 8 neighbors are.
    pub fn apply(&self, alive: bool, neighbors: u8) -> bool {
        if neighbors > 8 {
            return false;
        }

        let counts = if alive { self.survivals } else { self.births };

        counts & (1 << neighbors) != 0
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("Neighbor count '{0}' is out of range, expected 0-8")]
    InvalidDigit(char),

    #[error("Unexpected character '{0}' in rulestring")]
    InvalidChar(char),

    #[error("Rulestring must start with 'b' or 'B'")]
    MissingBirth,
}

/// Parses rules that look like `b3s23`, `B3/S23` or `b36/s23`.
impl FromStr for RuleSet {
    type Err = RuleSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[derive(Clone, Copy)]
        enum State {
            Start,
            Birth,
            Survival,
        }

        let mut state = State::Start;
        let (mut births, mut survivals) = (0u16, 0u16);

        for c in s.trim().chars() {
            match (c, state) {
                ('b' | 'B', State::Start) => state = State::Birth,
                ('s' | 'S', State::Birth) => state = State::Survival,
                ('/', State::Birth) => {}
                (_, State::Start) => return Err(RuleSetError::MissingBirth),
                (n, State::Birth | State::Survival) if n.is_ascii_digit() => {
                    let n = n.to_digit(10).unwrap_or(9);

                    if n > 8 {
                        return Err(RuleSetError::InvalidDigit(c));
                    }

                    match state {
                        State::Birth => births |= 1 << n,
                        _ => survivals |= 1 << n,
                    }
                }
                (c, _) => return Err(RuleSetError::InvalidChar(c)),
            }
        }

        if let State::Start = state {
            return Err(RuleSetError::MissingBirth);
        }

        Ok(RuleSet::new(births, survivals))
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |mask: u16| -> String {
            (0..=8u8)
                .filter(|&i| mask & (1 << i) != 0)
                .map(|i| char::from(b'0' + i))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

#[cfg(test)]
mod test {
    use super::RuleSet;
    use super::RuleSetError;
    use super::B3S23;

    #[test]
    fn conway_rules() {
        // survival
        assert!(!B3S23.apply(true, 1));
        assert!(B3S23.apply(true, 2));
        assert!(B3S23.apply(true, 3));
        assert!(!B3S23.apply(true, 4));

        // birth
        assert!(!B3S23.apply(false, 2));
        assert!(B3S23.apply(false, 3));
        assert!(!B3S23.apply(false, 4));

        // nonsense counts never live
        assert!(!B3S23.apply(true, 9));
    }

    #[test]
    fn parse_rulestrings() {
        assert_eq!("b3s23".parse::<RuleSet>(), Ok(B3S23));
        assert_eq!("B3/S23".parse::<RuleSet>(), Ok(B3S23));

        let highlife: RuleSet = "B36/S23".parse().unwrap();
        assert_eq!(highlife.births(), 0b100_1000);
        assert_eq!(highlife.survivals(), 0b1100);

        let empty: RuleSet = "b".parse().unwrap();
        assert_eq!(empty, RuleSet::new(0, 0));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("b9s23".parse::<RuleSet>(), Err(RuleSetError::InvalidDigit('9')));
        assert_eq!("b3x23".parse::<RuleSet>(), Err(RuleSetError::InvalidChar('x')));
        assert_eq!("s23".parse::<RuleSet>(), Err(RuleSetError::MissingBirth));
        assert_eq!("".parse::<RuleSet>(), Err(RuleSetError::MissingBirth));
    }

    #[test]
    fn masks_drop_counts_past_eight() {
        let r = RuleSet::new(0xFFFF, 1 << 9 | 1 << 2);

        assert_eq!(r.births(), 0x1FF);
        assert_eq!(r.survivals(), 1 << 2);
        assert!(r.apply(false, 8));
        assert!(!r.apply(true, 3));
    }

    #[test]
    fn display() {
        assert_eq!(B3S23.to_string(), "B3/S23");
        assert_eq!(RuleSet::new(0b1_1111_1111, 0).to_string(), "B012345678/S");
    }
}
