use std::fmt;

use crate::expr::Expr;

/// Symbolic equality `lhs = rhs`, kept unsolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Equation {
    /// Left-hand side.
    pub lhs: Expr,
    /// Right-hand side.
    pub rhs: Expr,
}

impl Equation {
    /// Creates the equation `lhs = rhs`.
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
