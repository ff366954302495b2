//! Cups - Amount of water in a single drink

use serde::{Deserialize, Serialize};

/// A positive number of cups
///
/// Anything that is not a positive integer normalizes to a single cup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Cups(i32);

impl Cups {
    pub const ONE: Cups = Cups(1);

    pub fn new(amount: i64) -> Self {
        if amount < 1 {
            return Self::ONE;
        }
        Self(i32::try_from(amount).unwrap_or(i32::MAX))
    }

    /// Parse free-form user input, falling back to one cup
    pub fn parse(input: &str) -> Self {
        input
            .trim()
            .parse::<i64>()
            .map(Self::new)
            .unwrap_or(Self::ONE)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl Default for Cups {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<i64> for Cups {
    fn from(amount: i64) -> Self {
        Self::new(amount)
    }
}

impl From<Cups> for i64 {
    fn from(cups: Cups) -> Self {
        cups.0 as i64
    }
}

impl std::fmt::Display for Cups {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 1 {
            write!(f, "1 cup")
        } else {
            write!(f, "{} cups", self.0)
        }
    }
}
