//! Single-brick abstract domain.
//!
//! A brick `[S](min, max)` denotes every concatenation of between `min` and
//! `max` strings drawn from the set `S`:
//!
//! ```text
//! γ([S](m, M)) = { s₁·s₂·…·sₖ | m ≤ k ≤ M, sᵢ ∈ S }
//! ```
//!
//! An unknown string set (`K`) stands for the whole alphabet.
//!
//! # Distinguished bricks
//!
//! - `⊤ = K(0, ∞)`: any string.
//! - `⊥`: an empty range (`max < min`), an empty set with a non-zero range,
//!   or a non-empty set with the range `(0, 0)`.
//! - `ε = [](0, 0)`: exactly the empty string. Used as a filler when two
//!   brick sequences are aligned; normalization removes it.

use std::collections::BTreeSet;
use std::fmt;

use log::debug;

use crate::config::Thresholds;
use crate::domain::AbstractDomain;
use crate::error::{DomainError, Result};
use crate::index::ExtendedIndex;

/// A set of strings repeated a bounded number of times.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Brick {
    strings: Option<BTreeSet<String>>,
    min: usize,
    max: ExtendedIndex,
}

impl Brick {
    /// Create a brick. Fails if `min` is infinite.
    pub fn new(strings: Option<BTreeSet<String>>, min: ExtendedIndex, max: ExtendedIndex) -> Result<Self> {
        match min {
            ExtendedIndex::Finite(min) => Ok(Self { strings, min, max }),
            ExtendedIndex::Infinite => Err(DomainError::InfiniteMinimum),
        }
    }

    /// Create a brick with a finite minimum.
    pub fn bounded(strings: Option<BTreeSet<String>>, min: usize, max: impl Into<ExtendedIndex>) -> Self {
        Self {
            strings,
            min,
            max: max.into(),
        }
    }

    /// Create a brick over a known string set.
    pub fn of<I, S>(strings: I, min: usize, max: impl Into<ExtendedIndex>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::bounded(Some(strings.into_iter().map(Into::into).collect()), min, max)
    }

    /// Create a brick with unknown content (`K`).
    pub fn any(min: usize, max: impl Into<ExtendedIndex>) -> Self {
        Self::bounded(None, min, max)
    }

    /// The brick `[s](1, 1)` denoting exactly `s`.
    pub fn literal(s: impl Into<String>) -> Self {
        Self::of([s.into()], 1, 1)
    }

    /// The ε-neutral brick `[](0, 0)`.
    pub fn empty() -> Self {
        Self::bounded(Some(BTreeSet::new()), 0, 0)
    }

    pub fn top() -> Self {
        Self::any(0, ExtendedIndex::Infinite)
    }

    pub fn bottom() -> Self {
        Self::bounded(Some(BTreeSet::new()), 1, 0)
    }

    /// The string set, or `None` if the content is unknown.
    pub fn strings(&self) -> Option<&BTreeSet<String>> {
        self.strings.as_ref()
    }

    pub fn min(&self) -> ExtendedIndex {
        ExtendedIndex::Finite(self.min)
    }

    pub fn max(&self) -> ExtendedIndex {
        self.max
    }

    /// The repetition lower bound as a plain count.
    pub fn min_count(&self) -> usize {
        self.min
    }

    pub fn is_top(&self) -> bool {
        self.strings.is_none() && self.min == 0 && self.max.is_infinite()
    }

    pub fn is_bottom(&self) -> bool {
        if self.has_empty_range() {
            return true;
        }
        match &self.strings {
            Some(set) if set.is_empty() => !self.is_zero_range(),
            Some(_) => self.is_zero_range(),
            None => false,
        }
    }

    /// Whether this is the ε-neutral filler.
    pub fn is_empty(&self) -> bool {
        matches!(&self.strings, Some(set) if set.is_empty()) && self.is_zero_range()
    }

    /// `Some(k)` if `min = max = k`.
    pub fn exact_count(&self) -> Option<usize> {
        self.max.as_finite().filter(|&max| max == self.min)
    }

    /// Whether the brick occurs exactly once (`min = max = 1`).
    pub fn is_single(&self) -> bool {
        self.exact_count() == Some(1)
    }

    /// Whether the brick contributes at least one string to every concatenation.
    pub fn is_guaranteed(&self) -> bool {
        self.min >= 1
    }

    pub(crate) fn has_empty_range(&self) -> bool {
        self.max < self.min()
    }

    fn is_zero_range(&self) -> bool {
        self.min == 0 && self.max == 0
    }

    /// Least upper bound: union of the sets, hull of the ranges.
    pub fn lub(&self, other: &Brick) -> Brick {
        if self.is_bottom() {
            return other.clone();
        }
        if other.is_bottom() {
            return self.clone();
        }
        Brick {
            strings: union(&self.strings, &other.strings),
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Approximate greatest lower bound.
    ///
    /// The ranges are intersected, but known string sets are joined, not
    /// intersected. An unknown set yields the other operand's set.
    pub fn glb(&self, other: &Brick) -> Brick {
        if self.is_bottom() || other.is_bottom() {
            return Brick::bottom();
        }
        let strings = match (&self.strings, &other.strings) {
            (None, s) | (s, None) => s.clone(),
            (Some(a), Some(b)) => Some(a.union(b).cloned().collect()),
        };
        Brick {
            strings,
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Partial order: smaller sets and tighter ranges are lower.
    pub fn less_or_equal(&self, other: &Brick) -> bool {
        if self.is_bottom() || other.is_top() {
            return true;
        }
        if other.is_bottom() {
            return false;
        }
        let strings_le = match (&self.strings, &other.strings) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => a.is_subset(b),
        };
        strings_le && self.min >= other.min && self.max <= other.max
    }

    /// Widening with the string-count (kS) and range-width (kI) thresholds.
    ///
    /// Gives `⊤` when the joined set is unknown or larger than kS. A range
    /// wider than kI (or unbounded) jumps to `[0, ∞]`.
    pub fn widening(&self, other: &Brick, thresholds: &Thresholds) -> Result<Brick> {
        if self.has_empty_range() {
            return Ok(other.clone());
        }
        if other.has_empty_range() {
            return Ok(self.clone());
        }

        let strings = match union(&self.strings, &other.strings) {
            Some(set) if set.len() <= thresholds.max_strings && !self.is_top() && !other.is_top() => set,
            _ => {
                debug!("Brick widening of {} and {} gives up with ⊤", self, other);
                return Ok(Brick::top());
            }
        };

        let min = self.min.min(other.min);
        let max = self.max.max(other.max);
        let width = max.minus(ExtendedIndex::Finite(min))?;

        if max.is_infinite() || width > ExtendedIndex::Finite(thresholds.max_range_width) {
            debug!("Brick range ({},{}) widened to (0,∞)", min, max);
            Ok(Brick::bounded(Some(strings), 0, ExtendedIndex::Infinite))
        } else {
            Ok(Brick::bounded(Some(strings), min, max))
        }
    }

    pub fn representation(&self) -> String {
        self.to_string()
    }
}

/// Union of two optional string sets; an unknown set absorbs.
fn union(a: &Option<BTreeSet<String>>, b: &Option<BTreeSet<String>>) -> Option<BTreeSet<String>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b).cloned().collect()),
        _ => None,
    }
}

impl fmt::Display for Brick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top() {
            return write!(f, "⊤");
        }
        if self.is_bottom() {
            return write!(f, "⊥");
        }
        match &self.strings {
            None => write!(f, "K")?,
            Some(set) => {
                write!(f, "[")?;
                for (i, s) in set.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", s)?;
                }
                write!(f, "]")?;
            }
        }
        write!(f, "({},{})", self.min, self.max)
    }
}

/// Lattice of single bricks, parameterised by the widening thresholds.
#[derive(Debug, Clone, Default)]
pub struct BrickDomain {
    pub thresholds: Thresholds,
}

impl BrickDomain {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }
}

impl AbstractDomain for BrickDomain {
    type Element = Brick;

    fn bottom(&self) -> Self::Element {
        Brick::bottom()
    }

    fn top(&self) -> Self::Element {
        Brick::top()
    }

    fn is_bottom(&self, elem: &Self::Element) -> bool {
        elem.is_bottom()
    }

    fn is_top(&self, elem: &Self::Element) -> bool {
        elem.is_top()
    }

    fn le(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool {
        elem1.less_or_equal(elem2)
    }

    fn join(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element {
        elem1.lub(elem2)
    }

    fn meet(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element {
        elem1.glb(elem2)
    }

    fn widen(&self, elem1: &Self::Element, elem2: &Self::Element) -> Result<Self::Element> {
        elem1.widening(elem2, &self.thresholds)
    }
}
