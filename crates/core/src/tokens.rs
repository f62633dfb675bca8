//! Order token numbers.

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Human facing order identifier assigned by the backend from a database
/// sequence. Unique and monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenNumber(u64);

impl TokenNumber {
    /// Wrap a raw sequence value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw sequence value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Last three digits, zero padded. Handy for calling out orders at a
    /// counter; not unique.
    pub fn short_code(self) -> String {
        format!("{:03}", self.0 % 1_000)
    }
}

impl fmt::Display for TokenNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TokenNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for TokenNumber {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
