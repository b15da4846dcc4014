//! Extended natural numbers: `ℕ ∪ {∞}`.
//!
//! Used as repetition bounds of a [`Brick`][crate::brick::Brick]. The order
//! is the derived one: every finite index is below [`ExtendedIndex::Infinite`],
//! and `∞ ≤ ∞` holds while `∞ < ∞` does not.

use std::fmt;
use std::ops::Add;

use crate::error::IndexError;

/// Repetition bound: a finite count or `∞`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtendedIndex {
    Finite(usize),
    Infinite,
}

impl ExtendedIndex {
    pub const ZERO: ExtendedIndex = ExtendedIndex::Finite(0);
    pub const ONE: ExtendedIndex = ExtendedIndex::Finite(1);

    pub fn is_infinite(&self) -> bool {
        matches!(self, ExtendedIndex::Infinite)
    }

    pub fn as_finite(&self) -> Option<usize> {
        match self {
            ExtendedIndex::Finite(n) => Some(*n),
            ExtendedIndex::Infinite => None,
        }
    }

    /// Sum of two indices. `∞` absorbs.
    pub fn plus(self, other: ExtendedIndex) -> ExtendedIndex {
        match (self, other) {
            (ExtendedIndex::Finite(a), ExtendedIndex::Finite(b)) => ExtendedIndex::Finite(a.saturating_add(b)),
            _ => ExtendedIndex::Infinite,
        }
    }

    /// Difference of two indices.
    ///
    /// `∞ - n = ∞`. Fails if the result would be negative or if `other` is `∞`.
    pub fn minus(self, other: ExtendedIndex) -> Result<ExtendedIndex, IndexError> {
        match (self, other) {
            (_, ExtendedIndex::Infinite) => Err(IndexError::InfiniteSubtrahend),
            (ExtendedIndex::Infinite, ExtendedIndex::Finite(_)) => Ok(ExtendedIndex::Infinite),
            (ExtendedIndex::Finite(a), ExtendedIndex::Finite(b)) => match a.checked_sub(b) {
                Some(d) => Ok(ExtendedIndex::Finite(d)),
                None => Err(IndexError::Negative {
                    minuend: a,
                    subtrahend: b,
                }),
            },
        }
    }
}

impl From<usize> for ExtendedIndex {
    fn from(n: usize) -> Self {
        ExtendedIndex::Finite(n)
    }
}

impl Add for ExtendedIndex {
    type Output = ExtendedIndex;

    fn add(self, rhs: ExtendedIndex) -> ExtendedIndex {
        self.plus(rhs)
    }
}

impl PartialEq<usize> for ExtendedIndex {
    fn eq(&self, other: &usize) -> bool {
        self.as_finite() == Some(*other)
    }
}

impl fmt::Display for ExtendedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtendedIndex::Finite(n) => write!(f, "{}", n),
            ExtendedIndex::Infinite => write!(f, "∞"),
        }
    }
}
