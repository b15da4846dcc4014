//! Widening thresholds.

/// Tuning knobs that bound ascending chains in the string domain.
///
/// - `max_range_width` (kI): widest `[min, max]` range a brick may keep
///   before widening jumps it to `[0, ∞]`.
/// - `max_strings` (kS): largest string set a brick may hold before
///   widening gives up with `⊤`.
/// - `max_bricks` (kL): longest brick sequence widening accepts before
///   returning `⊤`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Thresholds {
    pub max_range_width: usize,
    pub max_strings: usize,
    pub max_bricks: usize,
}

impl Thresholds {
    pub fn new(max_range_width: usize, max_strings: usize, max_bricks: usize) -> Self {
        Self {
            max_range_width,
            max_strings,
            max_bricks,
        }
    }

    pub fn with_max_range_width(mut self, value: usize) -> Self {
        self.max_range_width = value;
        self
    }

    pub fn with_max_strings(mut self, value: usize) -> Self {
        self.max_strings = value;
        self
    }

    pub fn with_max_bricks(mut self, value: usize) -> Self {
        self.max_bricks = value;
        self
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(10, 20, 10)
    }
}
