//! Core abstract domain trait and three-valued satisfiability.

use std::fmt;
use std::fmt::Debug;

use crate::error::Result;

/// Abstract domain interface.
///
/// An abstract domain represents a lattice structure used for
/// approximating the values a program variable may take.
///
/// # Lattice Properties
///
/// An abstract domain must satisfy:
/// - Reflexivity: `∀a. a ⊑ a`
/// - Transitivity: `∀a,b,c. a ⊑ b ∧ b ⊑ c ⇒ a ⊑ c`
/// - Extrema: `∀a. ⊥ ⊑ a ⊑ ⊤`
/// - Join is an upper bound: `a ⊑ a ⊔ b`
///
/// Meet is only required to be *an* approximation of the infimum. The
/// string domains compute it over string sets by union.
pub trait AbstractDomain: Clone + Debug {
    /// The type representing abstract elements.
    type Element: Clone + Debug + PartialEq;

    /// Create the bottom element (⊥): represents the empty set.
    fn bottom(&self) -> Self::Element;

    /// Create the top element (⊤): represents all possible values.
    fn top(&self) -> Self::Element;

    /// Check if an element is bottom.
    fn is_bottom(&self, elem: &Self::Element) -> bool;

    /// Check if an element is top.
    fn is_top(&self, elem: &Self::Element) -> bool;

    /// Partial order: `elem1 ⊑ elem2` (elem1 is more precise than elem2).
    fn le(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool;

    /// Join (`⊔`): over-approximates the union of both elements.
    fn join(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element;

    /// Meet (`⊓`): approximates the intersection of both elements.
    fn meet(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element;

    /// Widening (`∇`): accelerates convergence in fixpoint computation.
    ///
    /// Must satisfy `elem1 ⊑ elem1 ∇ elem2`. Fails only when asked to
    /// combine ill-formed operands; such errors must reach the caller.
    fn widen(&self, elem1: &Self::Element, elem2: &Self::Element) -> Result<Self::Element>;

    /// Narrowing (`∆`): refines an over-approximation after widening.
    fn narrow(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element {
        self.meet(elem1, elem2)
    }

    /// Check equality of abstract elements.
    fn eq(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool {
        self.le(elem1, elem2) && self.le(elem2, elem1)
    }
}

/// Answer to "does this condition hold for every concrete value?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Satisfiability {
    /// Holds for every concrete value.
    Satisfied,
    /// Holds for no concrete value.
    NotSatisfied,
    /// May or may not hold.
    Unknown,
}

impl Satisfiability {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Satisfiability::Satisfied
        } else {
            Satisfiability::NotSatisfied
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Satisfiability::Satisfied => Satisfiability::NotSatisfied,
            Satisfiability::NotSatisfied => Satisfiability::Satisfied,
            Satisfiability::Unknown => Satisfiability::Unknown,
        }
    }

    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Satisfiability::NotSatisfied, _) | (_, Satisfiability::NotSatisfied) => Satisfiability::NotSatisfied,
            (Satisfiability::Satisfied, Satisfiability::Satisfied) => Satisfiability::Satisfied,
            _ => Satisfiability::Unknown,
        }
    }

    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Satisfiability::Satisfied, _) | (_, Satisfiability::Satisfied) => Satisfiability::Satisfied,
            (Satisfiability::NotSatisfied, Satisfiability::NotSatisfied) => Satisfiability::NotSatisfied,
            _ => Satisfiability::Unknown,
        }
    }

    /// Merge answers from two control-flow paths.
    pub fn lub(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            Satisfiability::Unknown
        }
    }

    pub fn may_hold(self) -> bool {
        self != Satisfiability::NotSatisfied
    }

    pub fn may_fail(self) -> bool {
        self != Satisfiability::Satisfied
    }
}

impl fmt::Display for Satisfiability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Satisfiability::Satisfied => write!(f, "satisfied"),
            Satisfiability::NotSatisfied => write!(f, "not satisfied"),
            Satisfiability::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use test_log::test;

    use super::*;

    /// Test helper: validate basic lattice axioms
    pub fn test_lattice_axioms<D: AbstractDomain>(domain: &D, samples: &[D::Element]) {
        assert!(domain.is_bottom(&domain.bottom()), "Bottom is not bottom");
        assert!(domain.is_top(&domain.top()), "Top is not top");

        for a in samples {
            // Reflexivity: a ⊑ a
            assert!(domain.le(a, a), "Reflexivity failed for {:?}", a);

            // Extrema: ⊥ ⊑ a ⊑ ⊤
            assert!(domain.le(&domain.bottom(), a), "Bottom is not below {:?}", a);
            assert!(domain.le(a, &domain.top()), "Top is not above {:?}", a);

            // Identity: a ⊔ ⊥ = a
            let joined = domain.join(a, &domain.bottom());
            assert!(domain.eq(a, &joined), "Join with bottom failed for {:?}", a);

            // Identity: a ⊓ ⊤ = a
            let met = domain.meet(a, &domain.top());
            assert!(domain.eq(a, &met), "Meet with top failed for {:?}", a);

            // Widening is extensive: a ⊑ (a ∇ b)
            for b in samples {
                let widened = domain.widen(a, b).expect("widening of well-formed samples");
                assert!(domain.le(a, &widened), "Widening of {:?} with {:?} lost {:?}", a, b, a);
            }
        }

        for a in samples {
            for b in samples {
                // Commutativity: a ⊔ b = b ⊔ a
                let ab = domain.join(a, b);
                let ba = domain.join(b, a);
                assert!(domain.eq(&ab, &ba), "Join commutativity failed for {:?}, {:?}", a, b);

                // Commutativity: a ⊓ b = b ⊓ a
                let ab = domain.meet(a, b);
                let ba = domain.meet(b, a);
                assert!(domain.eq(&ab, &ba), "Meet commutativity failed for {:?}, {:?}", a, b);

                // Join upper bound: a ⊑ (a ⊔ b)
                let joined = domain.join(a, b);
                assert!(domain.le(a, &joined), "Join is not upper bound for {:?}", a);
                assert!(domain.le(b, &joined), "Join is not upper bound for {:?}", b);
            }
        }
    }

    #[test]
    fn test_satisfiability_algebra() {
        use Satisfiability::*;

        assert_eq!(Satisfied.negate(), NotSatisfied);
        assert_eq!(Unknown.negate(), Unknown);

        assert_eq!(Satisfied.and(Unknown), Unknown);
        assert_eq!(NotSatisfied.and(Unknown), NotSatisfied);
        assert_eq!(Satisfied.and(Satisfied), Satisfied);

        assert_eq!(Satisfied.or(Unknown), Satisfied);
        assert_eq!(NotSatisfied.or(NotSatisfied), NotSatisfied);
        assert_eq!(NotSatisfied.or(Unknown), Unknown);

        assert_eq!(Satisfied.lub(NotSatisfied), Unknown);
        assert_eq!(Satisfied.lub(Satisfied), Satisfied);

        assert!(Unknown.may_hold() && Unknown.may_fail());
        assert!(!NotSatisfied.may_hold());
        assert!(!Satisfied.may_fail());
        assert_eq!(Satisfiability::from_bool(false), NotSatisfied);
    }
}
