//! String expressions, predicates and statements.

/// String expression (right-hand side of assignments).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StrExpr<V> {
    /// Variable reference
    Var(V),
    /// String constant
    Literal(String),
    /// The null constant
    Null,
    /// Concatenation: e1 + e2
    Concat(Box<StrExpr<V>>, Box<StrExpr<V>>),
    /// Substring over character positions: e[begin..end]
    Substring(Box<StrExpr<V>>, usize, usize),
    /// Replacement: e.replace(pattern, with)
    Replace(Box<StrExpr<V>>, Box<StrExpr<V>>, Box<StrExpr<V>>),
    /// Value read from outside the program
    Input,
}

impl<V> StrExpr<V> {
    /// Variable reference
    pub fn var(var: impl Into<V>) -> Self {
        StrExpr::Var(var.into())
    }

    /// String constant
    pub fn literal(value: impl Into<String>) -> Self {
        StrExpr::Literal(value.into())
    }

    /// Concatenation: self + other
    pub fn concat(self, other: Self) -> Self {
        StrExpr::Concat(Box::new(self), Box::new(other))
    }

    /// Substring: self[begin..end]
    pub fn substring(self, begin: usize, end: usize) -> Self {
        StrExpr::Substring(Box::new(self), begin, end)
    }

    /// Replacement: self.replace(pattern, with)
    pub fn replace(self, pattern: Self, with: Self) -> Self {
        StrExpr::Replace(Box::new(self), Box::new(pattern), Box::new(with))
    }

    /// Containment: self.contains(needle)
    pub fn contains(self, needle: Self) -> StrPred<V> {
        StrPred::Contains(self, needle)
    }

    /// Equality: self == other
    pub fn eq(self, other: Self) -> StrPred<V> {
        StrPred::Eq(self, other)
    }
}

/// String predicate (boolean condition).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StrPred<V> {
    /// Always true
    True,
    /// Always false
    False,
    /// Containment: e1.contains(e2)
    Contains(StrExpr<V>, StrExpr<V>),
    /// Equality: e1 == e2
    Eq(StrExpr<V>, StrExpr<V>),
    /// Negation: !p
    Not(Box<StrPred<V>>),
    /// Conjunction: p1 && p2
    And(Box<StrPred<V>>, Box<StrPred<V>>),
    /// Disjunction: p1 || p2
    Or(Box<StrPred<V>>, Box<StrPred<V>>),
}

impl<V> StrPred<V> {
    /// Negation: !p
    pub fn not(self) -> Self {
        StrPred::Not(Box::new(self))
    }

    /// Conjunction: p1 && p2
    pub fn and(self, other: Self) -> Self {
        StrPred::And(Box::new(self), Box::new(other))
    }

    /// Disjunction: p1 || p2
    pub fn or(self, other: Self) -> Self {
        StrPred::Or(Box::new(self), Box::new(other))
    }
}

/// Program statements over string variables.
#[derive(Debug, Clone)]
pub enum Stmt<V> {
    /// Skip (no-op)
    Skip,
    /// Assignment: var := expr
    Assign(V, StrExpr<V>),
    /// Sequence: s1; s2
    Seq(Box<Stmt<V>>, Box<Stmt<V>>),
    /// Conditional: if (pred) then s1 else s2
    If(StrPred<V>, Box<Stmt<V>>, Box<Stmt<V>>),
    /// While loop: while (pred) do s
    While(StrPred<V>, Box<Stmt<V>>),
    /// Assumption: assume(pred)
    Assume(StrPred<V>),
    /// Havoc: var := * (non-deterministic)
    Havoc(V),
}

impl<V> Stmt<V> {
    /// Assignment: var := expr
    pub fn assign(var: impl Into<V>, expr: StrExpr<V>) -> Self {
        Stmt::Assign(var.into(), expr)
    }

    /// Sequence of statements, left to right. Empty gives `Skip`.
    pub fn seq(stmts: impl IntoIterator<Item = Stmt<V>>) -> Self {
        let mut stmts: Vec<_> = stmts.into_iter().collect();
        let Some(mut result) = stmts.pop() else {
            return Stmt::Skip;
        };
        while let Some(stmt) = stmts.pop() {
            result = Stmt::Seq(Box::new(stmt), Box::new(result));
        }
        result
    }

    /// Conditional: if (pred) then s1 else s2
    pub fn if_then_else(pred: StrPred<V>, then_stmt: Stmt<V>, else_stmt: Stmt<V>) -> Self {
        Stmt::If(pred, Box::new(then_stmt), Box::new(else_stmt))
    }

    /// While loop: while (pred) do body
    pub fn while_loop(pred: StrPred<V>, body: Stmt<V>) -> Self {
        Stmt::While(pred, Box::new(body))
    }
}
