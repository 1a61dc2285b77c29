#![deny(missing_docs)]
#![doc = "Symbolic scalar engine used by the diffgeom tensor crates: canonical rational functions over symbols and elementary functions, exact differentiation, substitution and dense matrix inversion."]

mod atom;
mod equation;
mod expr;
mod integer;
mod matrix;
mod poly;
mod rational;

pub use atom::{symbols, Atom, FuncKind, Symbol};
pub use equation::Equation;
pub use expr::Expr;
pub use matrix::Matrix;
pub use rational::Rational;
