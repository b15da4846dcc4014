//! Fixpoint computation engine with widening and narrowing.

use log::{debug, warn};

use crate::domain::AbstractDomain;
use crate::error::Result;

/// Fixpoint computation engine.
///
/// Computes least fixpoints of monotone functions over abstract domains,
/// using widening to ensure termination.
#[derive(Debug, Clone)]
pub struct FixpointEngine<D: AbstractDomain> {
    pub domain: D,
    pub widening_threshold: usize,
    pub narrowing_iterations: usize,
    pub max_iterations: usize,
}

impl<D: AbstractDomain> FixpointEngine<D> {
    pub fn new(domain: D) -> Self {
        Self {
            domain,
            widening_threshold: 3,
            narrowing_iterations: 2,
            max_iterations: 1000,
        }
    }

    /// Compute least fixpoint: µX. F(X) ⊔ init
    ///
    /// Plain joins for the first `widening_threshold` iterations, widening
    /// afterwards. Errors from `f` or from widening are returned as is.
    pub fn lfp<F>(&self, init: D::Element, f: F) -> Result<D::Element>
    where
        F: Fn(&D::Element) -> Result<D::Element>,
    {
        let mut x = init.clone();
        let mut iterations = 0;

        loop {
            let fx = f(&x)?;
            let next = self.domain.join(&init, &fx);

            if self.domain.le(&next, &x) {
                break;
            }

            iterations += 1;

            if iterations >= self.widening_threshold {
                x = self.domain.widen(&x, &next)?;
            } else {
                x = next;
            }

            if iterations > self.max_iterations {
                warn!(
                    "Fixpoint computation did not converge after {} iterations",
                    self.max_iterations
                );
                break;
            }
        }

        debug!("Fixpoint converged after {} iterations", iterations);

        if self.narrowing_iterations > 0 {
            self.narrow(&init, x, f)
        } else {
            Ok(x)
        }
    }

    /// Narrowing phase to refine the post-fixpoint.
    fn narrow<F>(&self, init: &D::Element, mut x: D::Element, f: F) -> Result<D::Element>
    where
        F: Fn(&D::Element) -> Result<D::Element>,
    {
        let step = |x: &D::Element| -> Result<D::Element> { Ok(self.domain.join(init, &f(x)?)) };

        for i in 0..self.narrowing_iterations {
            let fx = step(&x)?;
            let next = self.domain.narrow(&x, &fx);

            // Only post-fixpoints are kept
            if self.domain.le(&x, &next) || !self.domain.le(&step(&next)?, &next) {
                debug!("Narrowing stopped after {} iterations", i + 1);
                break;
            }

            x = next;
        }

        Ok(x)
    }
}
