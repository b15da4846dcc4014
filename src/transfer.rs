//! Abstract transfer functions for string programs.
//!
//! [`StringEnvDomain`] lifts [`BricksDomain`] point-wise to environments
//! mapping variable names to [`Bricks`], and evaluates expressions and
//! predicates in such an environment. [`StringTransfer`] interprets
//! statements on top of it.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use log::debug;

use crate::bricks::{Bricks, BricksDomain};
use crate::config::Thresholds;
use crate::domain::{AbstractDomain, Satisfiability};
use crate::error::Result;
use crate::expr::{StrExpr, StrPred, Stmt};
use crate::fixpoint::FixpointEngine;

/// Abstract state: a [`Bricks`] value per string variable.
///
/// Variables without an entry are unconstrained (`⊤`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEnv {
    values: BTreeMap<String, Bricks>,
    is_bottom: bool,
}

impl StringEnv {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            is_bottom: false,
        }
    }

    pub fn bottom() -> Self {
        Self {
            values: BTreeMap::new(),
            is_bottom: true,
        }
    }

    pub fn top() -> Self {
        Self::new()
    }

    pub fn is_bottom(&self) -> bool {
        self.is_bottom
    }

    pub fn get(&self, var: &str) -> Bricks {
        if self.is_bottom {
            return Bricks::bottom();
        }
        self.values.get(var).cloned().unwrap_or_else(Bricks::top)
    }

    /// Bind `var`. A bottom value makes the whole state unreachable.
    pub fn set(&mut self, var: impl Into<String>, value: Bricks) {
        if self.is_bottom {
            return;
        }
        let var: String = var.into();
        if value.is_bottom() {
            self.values.clear();
            self.is_bottom = true;
        } else if value.is_top() {
            self.values.remove(&var);
        } else {
            self.values.insert(var, value);
        }
    }

    /// Variables with a non-`⊤` value.
    pub fn vars(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn all_vars<'a>(&'a self, other: &'a StringEnv) -> BTreeSet<&'a str> {
        self.vars().chain(other.vars()).collect()
    }
}

impl Default for StringEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StringEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bottom {
            return write!(f, "⊥");
        }
        write!(f, "{{")?;
        for (i, (var, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} ↦ {}", var, value)?;
        }
        write!(f, "}}")
    }
}

/// Point-wise lifting of [`BricksDomain`] to environments.
#[derive(Debug, Clone, Default)]
pub struct StringEnvDomain {
    pub bricks: BricksDomain,
}

impl StringEnvDomain {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            bricks: BricksDomain::new(thresholds),
        }
    }

    /// Abstract value of an expression.
    pub fn eval(&self, env: &StringEnv, expr: &StrExpr<String>) -> Bricks {
        if env.is_bottom() {
            return Bricks::bottom();
        }

        match expr {
            StrExpr::Var(var) => env.get(var),
            StrExpr::Literal(value) => self.bricks.eval_literal(value),
            StrExpr::Null => self.bricks.eval_null(),
            StrExpr::Concat(left, right) => {
                let left = self.eval(env, left);
                let right = self.eval(env, right);
                self.bricks.eval_concat(&left, &right)
            }
            StrExpr::Substring(inner, begin, end) => {
                let inner = self.eval(env, inner);
                self.bricks.eval_substring(&inner, *begin, *end)
            }
            StrExpr::Replace(..) | StrExpr::Input => {
                debug!("No precise abstraction for {:?}, using ⊤", expr);
                Bricks::top()
            }
        }
    }

    /// Whether `pred` holds in every concrete state described by `env`.
    pub fn satisfies(&self, env: &StringEnv, pred: &StrPred<String>) -> Satisfiability {
        if env.is_bottom() {
            return Satisfiability::Satisfied;
        }

        match pred {
            StrPred::True => Satisfiability::Satisfied,
            StrPred::False => Satisfiability::NotSatisfied,
            StrPred::Contains(haystack, needle) => {
                let haystack = self.eval(env, haystack);
                let needle = self.eval(env, needle);
                self.bricks.satisfies_contains(&haystack, &needle)
            }
            StrPred::Eq(left, right) => {
                let left = self.eval(env, left);
                let right = self.eval(env, right);
                match (left.as_literal(), right.as_literal()) {
                    (Some(a), Some(b)) => Satisfiability::from_bool(a == b),
                    _ => Satisfiability::Unknown,
                }
            }
            StrPred::Not(inner) => self.satisfies(env, inner).negate(),
            StrPred::And(p1, p2) => self.satisfies(env, p1).and(self.satisfies(env, p2)),
            StrPred::Or(p1, p2) => self.satisfies(env, p1).or(self.satisfies(env, p2)),
        }
    }

    /// Refine `env` with the knowledge that `pred` holds.
    ///
    /// An unsatisfiable predicate gives `⊥`. An equality with a variable on
    /// one side binds that variable to the value of the other side.
    pub fn assume(&self, env: &StringEnv, pred: &StrPred<String>) -> StringEnv {
        if env.is_bottom() {
            return env.clone();
        }
        if self.satisfies(env, pred) == Satisfiability::NotSatisfied {
            return StringEnv::bottom();
        }

        match pred {
            StrPred::Eq(StrExpr::Var(var), other) | StrPred::Eq(other, StrExpr::Var(var)) => {
                self.assign(env, var, other)
            }
            StrPred::And(p1, p2) => {
                let refined = self.assume(env, p1);
                self.assume(&refined, p2)
            }
            _ => env.clone(),
        }
    }

    /// `var := expr`
    pub fn assign(&self, env: &StringEnv, var: &str, expr: &StrExpr<String>) -> StringEnv {
        let value = self.eval(env, expr);
        let mut result = env.clone();
        result.set(var, value);
        result
    }

    /// `var := *`
    pub fn havoc(&self, env: &StringEnv, var: &str) -> StringEnv {
        let mut result = env.clone();
        result.set(var, Bricks::top());
        result
    }
}

impl AbstractDomain for StringEnvDomain {
    type Element = StringEnv;

    fn bottom(&self) -> Self::Element {
        StringEnv::bottom()
    }

    fn top(&self) -> Self::Element {
        StringEnv::top()
    }

    fn is_bottom(&self, elem: &Self::Element) -> bool {
        elem.is_bottom()
    }

    fn is_top(&self, elem: &Self::Element) -> bool {
        !elem.is_bottom() && elem.values.is_empty()
    }

    fn le(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool {
        if elem1.is_bottom() {
            return true;
        }
        if elem2.is_bottom() {
            return false;
        }
        elem1
            .all_vars(elem2)
            .into_iter()
            .all(|var| self.bricks.le(&elem1.get(var), &elem2.get(var)))
    }

    fn join(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element {
        if elem1.is_bottom() {
            return elem2.clone();
        }
        if elem2.is_bottom() {
            return elem1.clone();
        }

        let mut result = StringEnv::new();
        for var in elem1.all_vars(elem2) {
            result.set(var, self.bricks.join(&elem1.get(var), &elem2.get(var)));
        }
        result
    }

    fn meet(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element {
        if elem1.is_bottom() || elem2.is_bottom() {
            return StringEnv::bottom();
        }

        let mut result = StringEnv::new();
        for var in elem1.all_vars(elem2) {
            result.set(var, self.bricks.meet(&elem1.get(var), &elem2.get(var)));
        }
        result
    }

    fn widen(&self, elem1: &Self::Element, elem2: &Self::Element) -> Result<Self::Element> {
        if elem1.is_bottom() {
            return Ok(elem2.clone());
        }
        if elem2.is_bottom() {
            return Ok(elem1.clone());
        }

        let mut result = StringEnv::new();
        for var in elem1.all_vars(elem2) {
            result.set(var, self.bricks.widen(&elem1.get(var), &elem2.get(var))?);
        }
        Ok(result)
    }
}

/// Abstract transfer function for statements.
///
/// Implements abstract semantics: ⟦stmt⟧♯: Element → Element
pub trait TransferFunction<D: AbstractDomain> {
    /// Type of program variables
    type Var: Clone;

    /// Apply transfer function: ⟦stmt⟧♯(elem)
    fn apply(&self, domain: &D, elem: &D::Element, stmt: &Stmt<Self::Var>) -> Result<D::Element>;
}

/// Transfer function for string programs.
///
/// Loops are solved with a [`FixpointEngine`] configured by the public
/// fields.
#[derive(Debug, Clone)]
pub struct StringTransfer {
    pub widening_threshold: usize,
    pub narrowing_iterations: usize,
    pub max_iterations: usize,
}

impl StringTransfer {
    pub fn new() -> Self {
        Self {
            widening_threshold: 3,
            narrowing_iterations: 2,
            max_iterations: 1000,
        }
    }

    fn engine(&self, domain: &StringEnvDomain) -> FixpointEngine<StringEnvDomain> {
        FixpointEngine {
            domain: domain.clone(),
            widening_threshold: self.widening_threshold,
            narrowing_iterations: self.narrowing_iterations,
            max_iterations: self.max_iterations,
        }
    }
}

impl Default for StringTransfer {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferFunction<StringEnvDomain> for StringTransfer {
    type Var = String;

    fn apply(&self, domain: &StringEnvDomain, elem: &StringEnv, stmt: &Stmt<String>) -> Result<StringEnv> {
        if elem.is_bottom() {
            return Ok(elem.clone());
        }

        match stmt {
            Stmt::Skip => Ok(elem.clone()),

            Stmt::Assign(var, expr) => Ok(domain.assign(elem, var, expr)),

            Stmt::Seq(s1, s2) => {
                let e1 = self.apply(domain, elem, s1)?;
                self.apply(domain, &e1, s2)
            }

            Stmt::If(pred, then_stmt, else_stmt) => {
                let then_elem = domain.assume(elem, pred);
                let then_result = self.apply(domain, &then_elem, then_stmt)?;

                let else_pred = StrPred::Not(Box::new(pred.clone()));
                let else_elem = domain.assume(elem, &else_pred);
                let else_result = self.apply(domain, &else_elem, else_stmt)?;

                Ok(domain.join(&then_result, &else_result))
            }

            Stmt::While(pred, body) => {
                let head = self
                    .engine(domain)
                    .lfp(elem.clone(), |x| self.apply(domain, &domain.assume(x, pred), body))?;
                debug!("Loop invariant: {}", head);

                let exit_pred = StrPred::Not(Box::new(pred.clone()));
                Ok(domain.assume(&head, &exit_pred))
            }

            Stmt::Assume(pred) => Ok(domain.assume(elem, pred)),

            Stmt::Havoc(var) => Ok(domain.havoc(elem, var)),
        }
    }
}
