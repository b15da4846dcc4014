//! Normal form of brick sequences.
//!
//! A list of bricks denotes the concatenation of their languages. Five
//! rewrite rules bring it to a canonical, shorter form:
//!
//! 1. drop ε-neutral bricks;
//! 2. merge adjacent `[S](1,1)·[T](1,1)` into `[S·T](1,1)`;
//! 3. collapse `[S](k,k)` into `[Sᵏ](1,1)`;
//! 4. merge adjacent bricks over the same set by adding their ranges;
//! 5. split `[S](m,M)` with `1 ≤ m < M` into `[Sᵐ](1,1)·[S](0,M-m)`.
//!
//! Rule 1 runs once. Then rules 3, 5, 4 and 2 run in that order until a
//! full cycle leaves the list unchanged. A list holding a bottom brick is
//! not rewritten; it normalizes to `[⊥]`.

use std::collections::BTreeSet;

use log::{trace, warn};

use crate::brick::Brick;

/// Safety cap on rewrite cycles.
const MAX_CYCLES: usize = 1000;

/// Normalize a brick sequence.
pub fn normalize(bricks: Vec<Brick>) -> Vec<Brick> {
    if bricks.iter().any(Brick::is_bottom) {
        return vec![Brick::bottom()];
    }
    let mut current = remove_empty(bricks);

    for cycle in 0..MAX_CYCLES {
        let next = current.iter().map(collapse_exact).collect();
        let next = split_ranges(next);
        let next = merge_same_strings(next);
        let next = merge_singletons(next);

        if next == current {
            trace!("Normalization stable after {} cycles ({} bricks)", cycle, current.len());
            return current;
        }
        current = next;
    }

    warn!("Normalization did not stabilize after {} cycles", MAX_CYCLES);
    current
}

/// Rule 1: drop ε-neutral bricks.
pub fn remove_empty(bricks: Vec<Brick>) -> Vec<Brick> {
    bricks.into_iter().filter(|b| !b.is_empty()).collect()
}

/// Rule 2: merge adjacent single-occurrence bricks with known content.
pub fn merge_singletons(bricks: Vec<Brick>) -> Vec<Brick> {
    let mut result: Vec<Brick> = Vec::with_capacity(bricks.len());
    for brick in bricks {
        if let Some(last) = result.last_mut() {
            if last.is_single() && brick.is_single() {
                if let (Some(left), Some(right)) = (last.strings(), brick.strings()) {
                    *last = Brick::bounded(Some(cross(left, right)), 1, 1);
                    continue;
                }
            }
        }
        result.push(brick);
    }
    result
}

/// Rule 3: a brick repeated exactly `k ≥ 1` times becomes a single occurrence
/// of the `k`-fold concatenation of its set.
pub fn collapse_exact(brick: &Brick) -> Brick {
    match brick.exact_count() {
        Some(1) | Some(0) | None => brick.clone(),
        Some(k) => Brick::bounded(brick.strings().map(|set| power(set, k)), 1, 1),
    }
}

/// Rule 4: merge adjacent bricks over the same set (or both unknown).
pub fn merge_same_strings(bricks: Vec<Brick>) -> Vec<Brick> {
    let mut result: Vec<Brick> = Vec::with_capacity(bricks.len());
    for brick in bricks {
        if let Some(last) = result.last_mut() {
            if last.strings() == brick.strings() {
                *last = Brick::bounded(
                    last.strings().cloned(),
                    last.min_count().saturating_add(brick.min_count()),
                    last.max().plus(brick.max()),
                );
                continue;
            }
        }
        result.push(brick);
    }
    result
}

/// Rule 5: split off the mandatory part of a brick with a proper range.
pub fn split_ranges(bricks: Vec<Brick>) -> Vec<Brick> {
    let mut result = Vec::with_capacity(bricks.len());
    for brick in bricks {
        match split(&brick) {
            Some((head, tail)) => {
                result.push(head);
                result.push(tail);
            }
            None => result.push(brick),
        }
    }
    result
}

fn split(brick: &Brick) -> Option<(Brick, Brick)> {
    let min = brick.min_count();
    if brick.is_top() || brick.is_bottom() || min < 1 || brick.max() <= brick.min() {
        return None;
    }
    let rest = brick.max().minus(brick.min()).ok()?;
    let head = collapse_exact(&Brick::bounded(brick.strings().cloned(), min, min));
    let tail = Brick::bounded(brick.strings().cloned(), 0, rest);
    Some((head, tail))
}

/// Pairwise concatenation `{ a·b | a ∈ left, b ∈ right }`.
pub fn cross(left: &BTreeSet<String>, right: &BTreeSet<String>) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    for a in left {
        for b in right {
            result.insert(format!("{}{}", a, b));
        }
    }
    result
}

/// Every concatenation of exactly `k` members of `set`, with repetition.
pub fn power(set: &BTreeSet<String>, k: usize) -> BTreeSet<String> {
    let mut result = set.clone();
    for _ in 1..k {
        result = cross(&result, set);
    }
    result
}

/// Whether some adjacent pair could still be merged by rule 2 or rule 4.
pub fn has_mergeable_neighbors(bricks: &[Brick]) -> bool {
    bricks.windows(2).any(|pair| {
        let (a, b) = (&pair[0], &pair[1]);
        let same_strings = a.strings() == b.strings();
        let singletons = a.is_single() && b.is_single() && a.strings().is_some() && b.strings().is_some();
        same_strings || singletons
    })
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::index::ExtendedIndex::Infinite;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rule1_drops_empty() {
        let list = vec![Brick::empty(), Brick::literal("a"), Brick::empty()];
        assert_eq!(remove_empty(list), vec![Brick::literal("a")]);
    }

    #[test]
    fn test_rule2_cross_product() {
        let list = vec![Brick::of(["a", "b"], 1, 1), Brick::of(["c", "d"], 1, 1)];
        assert_eq!(merge_singletons(list), vec![Brick::of(["ac", "ad", "bc", "bd"], 1, 1)]);
    }

    #[test]
    fn test_rule2_chains_and_skips_unknown() {
        let list = vec![
            Brick::literal("a"),
            Brick::literal("b"),
            Brick::literal("c"),
            Brick::any(1, 1),
            Brick::literal("d"),
        ];
        assert_eq!(
            merge_singletons(list),
            vec![Brick::literal("abc"), Brick::any(1, 1), Brick::literal("d")]
        );
    }

    #[test]
    fn test_rule3_power() {
        let b = Brick::of(["a", "b"], 2, 2);
        assert_eq!(collapse_exact(&b), Brick::of(["aa", "ab", "ba", "bb"], 1, 1));
        assert_eq!(collapse_exact(&Brick::any(3, 3)), Brick::any(1, 1));
        assert_eq!(collapse_exact(&Brick::of(["a"], 1, 3)), Brick::of(["a"], 1, 3));
        assert_eq!(power(&set(&["x"]), 3), set(&["xxx"]));
    }

    #[test]
    fn test_rule4_adds_ranges() {
        let list = vec![
            Brick::of(["a"], 0, 1),
            Brick::of(["a"], 2, 3),
            Brick::of(["a"], 1, Infinite),
            Brick::literal("b"),
        ];
        assert_eq!(
            merge_same_strings(list),
            vec![Brick::of(["a"], 3, Infinite), Brick::literal("b")]
        );

        let unknown = vec![Brick::any(0, 2), Brick::any(1, 1)];
        assert_eq!(merge_same_strings(unknown), vec![Brick::any(1, 3)]);
    }

    #[test]
    fn test_rule5_split() {
        let list = vec![Brick::of(["ab"], 2, 5)];
        assert_eq!(
            split_ranges(list),
            vec![Brick::of(["abab"], 1, 1), Brick::of(["ab"], 0, 3)]
        );

        let unbounded = vec![Brick::of(["x"], 1, Infinite)];
        assert_eq!(
            split_ranges(unbounded),
            vec![Brick::of(["x"], 1, 1), Brick::of(["x"], 0, Infinite)]
        );

        // Exact and optional bricks are left alone
        let untouched = vec![Brick::literal("a"), Brick::of(["a"], 0, 4)];
        assert_eq!(split_ranges(untouched.clone()), untouched);
    }

    #[test]
    fn test_normalize_concatenated_literals() {
        let list = vec![Brick::literal("a"), Brick::literal("b")];
        assert_eq!(normalize(list), vec![Brick::literal("ab")]);
    }

    #[test]
    fn test_normalize_repeated_literal() {
        let list = vec![Brick::literal("a"), Brick::literal("a"), Brick::literal("a")];
        assert_eq!(normalize(list), vec![Brick::literal("aaa")]);
    }

    #[test]
    fn test_normalize_range_split() {
        let list = vec![Brick::literal("x"), Brick::of(["y"], 2, 3)];
        assert_eq!(
            normalize(list),
            vec![Brick::literal("xyy"), Brick::of(["y"], 0, 1)]
        );
    }

    #[test]
    fn test_normalize_keeps_unit_minimum_ranges() {
        let list = vec![Brick::of(["a"], 1, 3)];
        assert_eq!(normalize(list.clone()), list);
    }

    #[test]
    fn test_normalize_regroups_after_merge() {
        // Rule 4 produces (a,2,2) late in a cycle; the next cycle collapses it.
        let list = vec![Brick::literal("a"), Brick::literal("a"), Brick::of(["b"], 2, 3)];
        let normalized = normalize(list);
        assert_eq!(normalized, vec![Brick::literal("aabb"), Brick::of(["b"], 0, 1)]);
        assert_eq!(normalize(normalized.clone()), normalized);
        assert!(!has_mergeable_neighbors(&normalized));
    }

    #[test]
    fn test_normalize_only_fillers() {
        assert_eq!(normalize(vec![Brick::empty(), Brick::empty()]), vec![]);
    }

    #[test]
    fn test_normalize_keeps_bottom() {
        let list = vec![Brick::of(["a"], 3, 2), Brick::of(["a"], 0, 1)];
        let normalized = normalize(list);
        assert_eq!(normalized, vec![Brick::bottom()]);
        assert_eq!(normalize(normalized.clone()), normalized);
    }

    #[test]
    fn test_normalize_top_is_stable() {
        assert_eq!(normalize(vec![Brick::top()]), vec![Brick::top()]);
        assert_eq!(
            normalize(vec![Brick::top(), Brick::top()]),
            vec![Brick::top()]
        );
    }
}
