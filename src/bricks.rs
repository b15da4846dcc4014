//! Bricks: strings abstracted as sequences of bricks.
//!
//! A [`Bricks`] value `[b₁, b₂, …, bₙ]` denotes the concatenation
//! `γ(b₁)·γ(b₂)·…·γ(bₙ)`. The order of the bricks matters.
//!
//! - `⊤ = [K(0,∞)]`: any string.
//! - `⊥ = []`: no string. By convention the empty sequence is the
//!   unsatisfiable value, not the empty concatenation. A sequence holding a
//!   bottom brick is bottom as well.
//!
//! Binary lattice operations first align both sequences to the same length
//! (see [`Bricks::pad`]) and then work brick by brick. A join or widening
//! whose normal form no longer covers both operands falls back to `⊤`.
//! The order searches every alignment instead of the greedy one.
//!
//! # Example
//!
//! ```rust
//! use bricks_rs::bricks::Bricks;
//! use bricks_rs::domain::Satisfiability;
//!
//! let greeting = Bricks::literal("hello").concat(&Bricks::literal(" world"));
//! assert_eq!(greeting, Bricks::literal("hello world"));
//!
//! let either = Bricks::literal("cat").lub(&Bricks::literal("cow"));
//! assert_eq!(either.contains(&Bricks::literal("c")), Satisfiability::Satisfied);
//! ```

use std::fmt;

use log::debug;

use crate::brick::Brick;
use crate::config::Thresholds;
use crate::domain::{AbstractDomain, Satisfiability};
use crate::error::Result;
use crate::index::ExtendedIndex;
use crate::normalize::normalize;

/// A string abstracted as a concatenation of bricks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bricks {
    bricks: Vec<Brick>,
}

impl Bricks {
    /// Wrap a brick list as given, without normalizing it.
    pub fn new(bricks: Vec<Brick>) -> Self {
        Self { bricks }
    }

    /// Wrap the normal form of a brick list.
    ///
    /// A non-empty list made only of ε fillers denotes the empty string, so it
    /// becomes `[[""](1,1)]` rather than the bottom sentinel.
    pub fn normalized(bricks: Vec<Brick>) -> Self {
        if bricks.iter().any(Brick::is_bottom) {
            return Self::bottom();
        }
        let was_empty = bricks.is_empty();
        let bricks = normalize(bricks);
        if bricks.is_empty() && !was_empty {
            return Self::literal("");
        }
        Self { bricks }
    }

    /// The exact abstraction of a string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::new(vec![Brick::literal(value)])
    }

    pub fn top() -> Self {
        Self::new(vec![Brick::top()])
    }

    pub fn bottom() -> Self {
        Self::new(Vec::new())
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn is_top(&self) -> bool {
        matches!(self.bricks.as_slice(), [brick] if brick.is_top())
    }

    pub fn is_bottom(&self) -> bool {
        self.bricks.is_empty() || self.bricks.iter().any(Brick::is_bottom)
    }

    /// The literal this value denotes exactly, if it is a single `[s](1,1)`.
    pub fn as_literal(&self) -> Option<&str> {
        match self.bricks.as_slice() {
            [brick] if brick.is_single() => match brick.strings() {
                Some(set) if set.len() == 1 => set.iter().next().map(String::as_str),
                _ => None,
            },
            _ => None,
        }
    }

    /// The character this value denotes exactly, if it is a one-character literal.
    pub fn as_char(&self) -> Option<char> {
        let literal = self.as_literal()?;
        let mut chars = literal.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// Align `self` to the length of `other` by inserting ε fillers.
    ///
    /// Single greedy pass over `other`: a brick of `self` is kept at a
    /// position when it equals `other`'s brick there (or once enough
    /// fillers were inserted); otherwise a filler goes in. Returns the
    /// bricks of `self` unchanged if `other` is not longer.
    pub fn pad(&self, other: &Bricks) -> Vec<Brick> {
        if other.len() <= self.len() {
            return self.bricks.clone();
        }

        let needed = other.len() - self.len();
        let mut added = 0;
        let mut mine = self.bricks.iter().peekable();
        let mut result = Vec::with_capacity(other.len());

        for theirs in &other.bricks {
            let keep = match mine.peek() {
                Some(&next) => added >= needed || next == theirs,
                None => false,
            };
            if keep {
                result.extend(mine.next().cloned());
            } else {
                result.push(Brick::empty());
                added += 1;
            }
        }

        result
    }

    fn aligned(&self, other: &Bricks) -> (Vec<Brick>, Vec<Brick>) {
        (self.pad(other), other.pad(self))
    }

    /// Least upper bound: align, join brick by brick, normalize.
    pub fn lub(&self, other: &Bricks) -> Bricks {
        if self.is_bottom() {
            return other.clone();
        }
        if other.is_bottom() {
            return self.clone();
        }
        if self.is_top() || other.is_top() {
            return Bricks::top();
        }
        let (left, right) = self.aligned(other);
        let joined = Bricks::normalized(left.iter().zip(&right).map(|(a, b)| a.lub(b)).collect());
        self.covered_by(other, joined)
    }

    /// `candidate` if it is above both operands, `⊤` otherwise.
    fn covered_by(&self, other: &Bricks, candidate: Bricks) -> Bricks {
        if self.less_or_equal(&candidate) && other.less_or_equal(&candidate) {
            candidate
        } else {
            debug!("{} does not cover {} and {}, using ⊤", candidate, self, other);
            Bricks::top()
        }
    }

    /// Approximate greatest lower bound: align and meet brick by brick.
    pub fn glb(&self, other: &Bricks) -> Bricks {
        if self.is_bottom() || other.is_bottom() {
            return Bricks::bottom();
        }
        if self.is_top() {
            return other.clone();
        }
        if other.is_top() {
            return self.clone();
        }
        let (left, right) = self.aligned(other);
        Bricks::new(left.iter().zip(&right).map(|(a, b)| a.glb(b)).collect())
    }

    /// Partial order: some alignment puts every brick below its counterpart.
    ///
    /// ε fillers may go on either side, as long as the brick facing one
    /// admits (or is at most) the empty string. A `⊤` brick of `other` may
    /// also face a whole run of bricks of `self`.
    pub fn less_or_equal(&self, other: &Bricks) -> bool {
        if self.is_bottom() || other.is_top() {
            return true;
        }
        if other.is_bottom() {
            return false;
        }
        aligns_below(&self.bricks, &other.bricks)
    }

    /// Widening.
    ///
    /// Gives `⊤` when the operands are incomparable or when either is longer
    /// than kL bricks. Otherwise widens brick by brick and normalizes.
    pub fn widening(&self, other: &Bricks, thresholds: &Thresholds) -> Result<Bricks> {
        if self.is_bottom() {
            return Ok(other.clone());
        }
        if other.is_bottom() || self.is_top() {
            return Ok(self.clone());
        }
        if other.is_top() {
            return Ok(other.clone());
        }

        if !self.less_or_equal(other) && !other.less_or_equal(self) {
            debug!("Widening incomparable {} and {} to ⊤", self, other);
            return Ok(Bricks::top());
        }
        if self.len() > thresholds.max_bricks || other.len() > thresholds.max_bricks {
            debug!(
                "Widening to ⊤: {} or {} bricks exceed the limit of {}",
                self.len(),
                other.len(),
                thresholds.max_bricks
            );
            return Ok(Bricks::top());
        }

        let (left, right) = self.aligned(other);
        let widened = left
            .iter()
            .zip(&right)
            .map(|(a, b)| a.widening(b, thresholds))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.covered_by(other, Bricks::normalized(widened)))
    }

    /// Concatenation: append the brick lists and normalize.
    pub fn concat(&self, other: &Bricks) -> Bricks {
        if self.is_bottom() || other.is_bottom() {
            return Bricks::bottom();
        }
        let mut bricks = self.bricks.clone();
        bricks.extend(other.bricks.iter().cloned());
        Bricks::normalized(bricks)
    }

    /// Substring over character positions `[begin, end)`.
    ///
    /// Precise only when the first brick of the normal form occurs exactly
    /// once, has a known set, and every member is at least `end` characters
    /// long. The members are then cut to `[begin, end)` and the remaining
    /// bricks are kept. Anything else gives `⊤`.
    pub fn substring(&self, begin: usize, end: usize) -> Bricks {
        if self.is_bottom() {
            return Bricks::bottom();
        }

        let bricks = normalize(self.bricks.clone());
        let Some((first, rest)) = bricks.split_first() else {
            return Bricks::top();
        };

        let strings = match first.strings() {
            Some(set) if begin <= end && first.is_single() => set,
            _ => {
                debug!("Substring [{}, {}) of {} is not precise", begin, end, self);
                return Bricks::top();
            }
        };
        if strings.iter().any(|s| s.chars().count() < end) {
            debug!("Substring [{}, {}) of {}: some member is too short", begin, end, self);
            return Bricks::top();
        }

        let cut = strings
            .iter()
            .map(|s| s.chars().skip(begin).take(end - begin).collect::<String>())
            .collect();

        let mut result = vec![Brick::bounded(Some(cut), 1, 1)];
        result.extend(rest.iter().cloned());
        Bricks::new(result)
    }

    /// Whether every string of `self` contains `needle`.
    ///
    /// Decided only for one-character needles. A brick that always occurs
    /// and whose members all contain the character proves the condition;
    /// a character that appears nowhere refutes it.
    pub fn contains(&self, needle: &Bricks) -> Satisfiability {
        if self.is_bottom() {
            return Satisfiability::Satisfied;
        }
        let Some(c) = needle.as_char() else {
            return Satisfiability::Unknown;
        };

        let mut may_contain = false;
        for brick in normalize(self.bricks.clone()) {
            match brick.strings() {
                None => may_contain |= brick.max() > ExtendedIndex::ZERO,
                Some(set) => {
                    if brick.is_guaranteed() && set.iter().all(|s| s.contains(c)) {
                        return Satisfiability::Satisfied;
                    }
                    may_contain |= set.iter().any(|s| s.contains(c));
                }
            }
        }

        if may_contain {
            Satisfiability::Unknown
        } else {
            Satisfiability::NotSatisfied
        }
    }

    pub fn representation(&self) -> String {
        self.to_string()
    }
}

/// Whether `left` aligns below `right` (see [`Bricks::less_or_equal`]).
fn aligns_below(left: &[Brick], right: &[Brick]) -> bool {
    let empty = Brick::empty();
    let width = right.len() + 1;

    // reach[i * width + j]: left[..i] aligns below right[..j]
    let mut reach = vec![false; (left.len() + 1) * width];
    reach[0] = true;

    for i in 0..=left.len() {
        for j in 0..=right.len() {
            if i == 0 && j == 0 {
                continue;
            }
            let mut ok = false;
            if i > 0 && j > 0 && reach[(i - 1) * width + j - 1] {
                ok |= left[i - 1].less_or_equal(&right[j - 1]);
            }
            if i > 0 && reach[(i - 1) * width + j] {
                ok |= left[i - 1].less_or_equal(&empty);
                ok |= j > 0 && right[j - 1].is_top();
            }
            if j > 0 && reach[i * width + j - 1] {
                ok |= empty.less_or_equal(&right[j - 1]);
            }
            reach[i * width + j] = ok;
        }
    }

    reach[left.len() * width + right.len()]
}

impl From<Brick> for Bricks {
    fn from(brick: Brick) -> Self {
        Self::new(vec![brick])
    }
}

impl fmt::Display for Bricks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top() {
            return write!(f, "⊤");
        }
        if self.is_bottom() {
            return write!(f, "⊥");
        }
        write!(f, "{{")?;
        for (i, brick) in self.bricks.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", brick)?;
        }
        write!(f, "}}")
    }
}

/// Lattice of brick sequences, parameterised by the widening thresholds.
#[derive(Debug, Clone, Default)]
pub struct BricksDomain {
    pub thresholds: Thresholds,
}

impl BricksDomain {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Abstract value of a string constant.
    pub fn eval_literal(&self, value: &str) -> Bricks {
        Bricks::literal(value)
    }

    /// Abstract value of the null constant: any string.
    pub fn eval_null(&self) -> Bricks {
        Bricks::top()
    }

    pub fn eval_concat(&self, left: &Bricks, right: &Bricks) -> Bricks {
        left.concat(right)
    }

    pub fn eval_substring(&self, value: &Bricks, begin: usize, end: usize) -> Bricks {
        value.substring(begin, end)
    }

    pub fn satisfies_contains(&self, haystack: &Bricks, needle: &Bricks) -> Satisfiability {
        haystack.contains(needle)
    }
}

impl AbstractDomain for BricksDomain {
    type Element = Bricks;

    fn bottom(&self) -> Self::Element {
        Bricks::bottom()
    }

    fn top(&self) -> Self::Element {
        Bricks::top()
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
