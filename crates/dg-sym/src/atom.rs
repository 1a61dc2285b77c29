//! Indivisible factors of a polynomial term: symbols and function applications.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::Expr;

/// Named symbolic variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of the symbol.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The symbol as an expression.
    pub fn expr(&self) -> Expr {
        Expr::symbol(self)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

/// Splits a comma or whitespace separated list into symbols, e.g. `symbols("t, r, theta")`.
pub fn symbols(names: &str) -> Vec<Symbol> {
    names
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(Symbol::new)
        .collect()
}

/// Function head of a function atom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FuncKind {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Ln,
    /// Unknown function of its arguments, e.g. a scale factor `R(t)`.
    Named(String),
}

impl FuncKind {
    fn label(&self) -> &str {
        match self {
            FuncKind::Sin => "sin",
            FuncKind::Cos => "cos",
            FuncKind::Exp => "exp",
            FuncKind::Ln => "ln",
            FuncKind::Named(name) => name,
        }
    }
}

/// A single polynomial variable.
///
/// `orders` holds the partial derivative order per argument and is only non-empty for
/// [`FuncKind::Named`] heads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    /// Plain symbol.
    Symbol(Symbol),
    /// Function application.
    Func {
        /// Function head.
        kind: FuncKind,
        /// Canonical arguments.
        args: Vec<Expr>,
        /// Derivative order with respect to each argument.
        orders: Vec<u32>,
    },
}

impl Atom {
    pub(crate) fn builtin(kind: FuncKind, arg: Expr) -> Atom {
        Atom::Func {
            kind,
            args: vec![arg],
            orders: Vec::new(),
        }
    }

    /// True if the atom mentions `var` anywhere.
    pub fn depends_on(&self, var: &Symbol) -> bool {
        match self {
            Atom::Symbol(sym) => sym == var,
            Atom::Func { args, .. } => args.iter().any(|arg| arg.depends_on(var)),
        }
    }

    pub(crate) fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Atom::Symbol(sym) => {
                out.insert(sym.clone());
            }
            Atom::Func { args, .. } => {
                for arg in args {
                    out.extend(arg.free_symbols());
                }
            }
        }
    }

    /// Returns the matching `sin` atom when this atom is `cos(a)`.
    pub(crate) fn cos_partner(&self) -> Option<Atom> {
        match self {
            Atom::Func {
                kind: FuncKind::Cos,
                args,
                ..
            } => Some(Atom::Func {
                kind: FuncKind::Sin,
                args: args.clone(),
                orders: Vec::new(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(sym) => write!(f, "{sym}"),
            Atom::Func { kind, args, orders } => {
                let differentiated = orders.iter().any(|order| *order > 0);
                if differentiated {
                    write!(f, "Derivative(")?;
                }
                write!(f, "{}(", kind.label())?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")?;
                if differentiated {
                    for (arg, order) in args.iter().zip(orders) {
                        for _ in 0..*order {
                            write!(f, ", {arg}")?;
                        }
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}
