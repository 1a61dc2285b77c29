//! Canonical symbolic scalars.
//!
//! An [`Expr`] is a rational function: a numerator polynomial over [`Atom`]s divided by a
//! product of monic denominator factors. Every constructor and operator returns the
//! normalized form, so two expressions compare equal only if they are provably equal, and
//! [`Expr::is_zero`] is exact for rational functions of symbols, `sin`/`cos` (modulo the
//! Pythagorean identity), `exp`, `ln` and named functions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};

use dg_core::{DgError, ErrorInfo};

use crate::atom::{Atom, FuncKind, Symbol};
use crate::poly::Poly;
use crate::rational::Rational;

/// Canonical symbolic scalar expression.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expr {
    num: Poly,
    den: BTreeMap<Poly, u32>,
}

impl Default for Expr {
    fn default() -> Self {
        Expr::zero()
    }
}

fn division_by_zero() -> DgError {
    DgError::Symbolic(ErrorInfo::new(
        "division-by-zero",
        "attempted to divide by an expression that is identically zero",
    ))
}

/// Cancels every denominator factor that divides the numerator exactly.
fn normalized(num: Poly, den: BTreeMap<Poly, u32>) -> Expr {
    let mut num = num.reduce_trig();
    if num.is_zero() {
        return Expr::zero();
    }
    let mut kept = BTreeMap::new();
    for (factor, mut exp) in den {
        while exp > 0 {
            match num.div_exact(&factor) {
                Some(quotient) => {
                    num = quotient.reduce_trig();
                    exp -= 1;
                }
                None => break,
            }
        }
        if exp > 0 {
            *kept.entry(factor).or_insert(0) += exp;
        }
    }
    Expr { num, den: kept }
}

/// Product of `factor^exp` over the given factor map.
fn expand_factors<'a>(factors: impl Iterator<Item = (&'a Poly, u32)>) -> Poly {
    factors.fold(Poly::one(), |acc, (factor, exp)| acc.mul(&factor.pow(exp)))
}

impl Expr {
    /// The additive identity.
    pub fn zero() -> Self {
        Expr {
            num: Poly::zero(),
            den: BTreeMap::new(),
        }
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Expr::from(1)
    }

    /// Exact rational constant `num / den`; fails when `den` is zero.
    pub fn ratio(num: i64, den: i64) -> Result<Self, DgError> {
        let value =
            Rational::new(i128::from(num), i128::from(den)).ok_or_else(division_by_zero)?;
        Ok(Expr::from(value))
    }

    /// A symbol as an expression.
    pub fn symbol(sym: &Symbol) -> Self {
        Expr::from_atom(Atom::Symbol(sym.clone()))
    }

    fn from_atom(atom: Atom) -> Self {
        Expr {
            num: Poly::atom(atom),
            den: BTreeMap::new(),
        }
    }

    fn from_poly(num: Poly) -> Self {
        normalized(num, BTreeMap::new())
    }

    /// True if the expression is identically zero.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// True if the expression is the constant one.
    pub fn is_one(&self) -> bool {
        self.den.is_empty() && self.num.is_one()
    }

    /// The rational value of a constant expression.
    pub fn as_rational(&self) -> Option<Rational> {
        if self.den.is_empty() {
            self.num.as_constant()
        } else {
            None
        }
    }

    /// The plain symbol this expression consists of, if any.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        if !self.den.is_empty() {
            return None;
        }
        let mono = self.num.as_monomial()?;
        let mut powers = mono.powers();
        match (powers.next(), powers.next()) {
            (Some((Atom::Symbol(sym), 1)), None) => Some(sym),
            _ => None,
        }
    }

    /// True if `var` appears anywhere in the expression.
    pub fn depends_on(&self, var: &Symbol) -> bool {
        let poly_mentions = |poly: &Poly| {
            poly.terms()
                .any(|(mono, _)| mono.powers().any(|(atom, _)| atom.depends_on(var)))
        };
        poly_mentions(&self.num) || self.den.keys().any(poly_mentions)
    }

    /// Every symbol appearing in the expression, including inside function arguments.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        let polys = std::iter::once(&self.num).chain(self.den.keys());
        for poly in polys {
            for (mono, _) in poly.terms() {
                for (atom, _) in mono.powers() {
                    atom.collect_symbols(&mut out);
                }
            }
        }
        out
    }

    /// Multiplies by a rational constant.
    pub fn scale(&self, factor: Rational) -> Expr {
        let den = if factor.is_zero() {
            BTreeMap::new()
        } else {
            self.den.clone()
        };
        Expr {
            num: self.num.scale(factor),
            den,
        }
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn recip(&self) -> Option<Expr> {
        if self.is_zero() {
            return None;
        }
        let num = expand_factors(self.den.iter().map(|(f, e)| (f, *e)));

        // Split the old numerator into constant * monomial content * monic remainder.
        let content = self.num.monomial_content();
        let rest = self.num.div_monomial(&content)?;
        let (_, lead) = rest.leading()?;
        let monic = rest.scale(lead.recip()?);

        let mut den = BTreeMap::new();
        for (atom, exp) in content.powers() {
            den.insert(Poly::atom(atom.clone()), exp);
        }
        if !monic.is_one() {
            *den.entry(monic).or_insert(0) += 1;
        }
        Some(normalized(num.scale(lead.recip()?), den))
    }

    /// Division that reports a zero divisor instead of panicking.
    pub fn checked_div(&self, divisor: &Expr) -> Result<Expr, DgError> {
        let inv = divisor.recip().ok_or_else(division_by_zero)?;
        Ok(self * &inv)
    }

    /// Non-negative integer power.
    pub fn pow(&self, exp: u32) -> Expr {
        let mut out = Expr::one();
        for _ in 0..exp {
            out = &out * self;
        }
        out
    }

    /// Integer power; negative powers of zero fail.
    pub fn powi(&self, exp: i32) -> Result<Expr, DgError> {
        if exp >= 0 {
            return Ok(self.pow(exp.unsigned_abs()));
        }
        let inv = self.recip().ok_or_else(division_by_zero)?;
        Ok(inv.pow(exp.unsigned_abs()))
    }

    /// Sine.
    pub fn sin(&self) -> Expr {
        if self.is_zero() {
            return Expr::zero();
        }
        Expr::from_atom(Atom::builtin(FuncKind::Sin, self.clone()))
    }

    /// Cosine.
    pub fn cos(&self) -> Expr {
        if self.is_zero() {
            return Expr::one();
        }
        Expr::from_atom(Atom::builtin(FuncKind::Cos, self.clone()))
    }

    /// Natural exponential.
    pub fn exp(&self) -> Expr {
        if self.is_zero() {
            return Expr::one();
        }
        Expr::from_atom(Atom::builtin(FuncKind::Exp, self.clone()))
    }

    /// Natural logarithm; undefined at zero.
    pub fn ln(&self) -> Result<Expr, DgError> {
        if self.is_zero() {
            return Err(DgError::Symbolic(ErrorInfo::new(
                "log-of-zero",
                "logarithm of an expression that is identically zero",
            )));
        }
        if self.is_one() {
            return Ok(Expr::zero());
        }
        Ok(Expr::from_atom(Atom::builtin(FuncKind::Ln, self.clone())))
    }

    /// Unknown function `name(args...)`, e.g. a scale factor `R(t)`.
    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Expr {
        let orders = vec![0; args.len()];
        Expr::from_atom(Atom::Func {
            kind: FuncKind::Named(name.into()),
            args,
            orders,
        })
    }

    /// Unevaluated derivative `d^order x / d parameter^order` of a coordinate treated as a
    /// function of a curve parameter.
    pub fn derivative(coordinate: &Symbol, parameter: &Symbol, order: u32) -> Expr {
        if order == 0 {
            return Expr::function(coordinate.name(), vec![parameter.expr()]);
        }
        Expr::from_atom(Atom::Func {
            kind: FuncKind::Named(coordinate.name().to_string()),
            args: vec![parameter.expr()],
            orders: vec![order],
        })
    }

    /// Partial derivative with respect to `var`.
    pub fn diff(&self, var: &Symbol) -> Expr {
        if !self.depends_on(var) {
            return Expr::zero();
        }
        // d(N / D) = N' / D - (N / D) * sum_f e_f f' / f
        let inv_den = Expr {
            num: Poly::one(),
            den: self.den.clone(),
        };
        let mut out = &diff_poly(&self.num, var) * &inv_den;
        let mut log_derivative = Expr::zero();
        for (factor, exp) in &self.den {
            let d_factor = diff_poly(factor, var);
            if d_factor.is_zero() {
                continue;
            }
            let inv_factor = Expr {
                num: Poly::one(),
                den: BTreeMap::from([(factor.clone(), 1)]),
            };
            let term = (&d_factor * &inv_factor).scale(Rational::integer(i128::from(*exp)));
            log_derivative = &log_derivative + &term;
        }
        if !log_derivative.is_zero() {
            out = &out - &(self * &log_derivative);
        }
        out
    }

    /// Repeated partial derivative.
    pub fn diff_n(&self, var: &Symbol, order: u32) -> Expr {
        (0..order).fold(self.clone(), |acc, _| acc.diff(var))
    }

    /// Substitutes symbols simultaneously; fails if a denominator becomes zero.
    pub fn subs(&self, map: &BTreeMap<Symbol, Expr>) -> Result<Expr, DgError> {
        let num = subs_poly(&self.num, map)?;
        let mut out = num;
        for (factor, exp) in &self.den {
            let replaced = subs_poly(factor, map)?;
            let inv = replaced.recip().ok_or_else(|| {
                DgError::Symbolic(
                    ErrorInfo::new(
                        "division-by-zero",
                        "substitution turns a denominator into zero",
                    )
                    .with_context("factor", factor),
                )
            })?;
            out = &out * &inv.pow(*exp);
        }
        Ok(out)
    }

    /// Re-normalizes the expression. Idempotent; every operator already returns the
    /// canonical form, so this only matters for values assembled piecewise.
    pub fn simplify(&self) -> Expr {
        let mut out = Expr::from_poly(self.num.clone());
        for (factor, exp) in &self.den {
            let partial = Expr {
                num: Poly::one(),
                den: BTreeMap::from([(factor.clone(), *exp)]),
            };
            out = &out * &partial;
        }
        out
    }
}

fn diff_atom(atom: &Atom, var: &Symbol) -> Expr {
    match atom {
        Atom::Symbol(sym) => {
            if sym == var {
                Expr::one()
            } else {
                Expr::zero()
            }
        }
        Atom::Func { kind, args, orders } => match kind {
            FuncKind::Sin => &args[0].cos() * &args[0].diff(var),
            FuncKind::Cos => -(&args[0].sin() * &args[0].diff(var)),
            FuncKind::Exp => &args[0].exp() * &args[0].diff(var),
            FuncKind::Ln => match args[0].recip() {
                Some(inv) => &args[0].diff(var) * &inv,
                None => Expr::zero(),
            },
            FuncKind::Named(_) => {
                let mut out = Expr::zero();
                for (slot, arg) in args.iter().enumerate() {
                    let inner = arg.diff(var);
                    if inner.is_zero() {
                        continue;
                    }
                    let mut raised = orders.clone();
                    raised[slot] += 1;
                    let outer = Expr::from_atom(Atom::Func {
                        kind: kind.clone(),
                        args: args.clone(),
                        orders: raised,
                    });
                    out = &out + &(&outer * &inner);
                }
                out
            }
        },
    }
}

fn diff_poly(poly: &Poly, var: &Symbol) -> Expr {
    let mut out = Expr::zero();
    for (mono, coeff) in poly.terms() {
        for (atom, exp) in mono.powers() {
            if !atom.depends_on(var) {
                continue;
            }
            let rest = Expr::from_poly(Poly::term(
                mono.without_one(atom),
                coeff * Rational::integer(i128::from(exp)),
            ));
            out = &out + &(&rest * &diff_atom(atom, var));
        }
    }
    out
}

fn subs_atom(atom: &Atom, map: &BTreeMap<Symbol, Expr>) -> Result<Expr, DgError> {
    match atom {
        Atom::Symbol(sym) => Ok(map.get(sym).cloned().unwrap_or_else(|| sym.expr())),
        Atom::Func { kind, args, orders } => {
            let args = args
                .iter()
                .map(|arg| arg.subs(map))
                .collect::<Result<Vec<_>, _>>()?;
            match kind {
                FuncKind::Sin => Ok(args[0].sin()),
                FuncKind::Cos => Ok(args[0].cos()),
                FuncKind::Exp => Ok(args[0].exp()),
                FuncKind::Ln => args[0].ln(),
                FuncKind::Named(_) => Ok(Expr::from_atom(Atom::Func {
                    kind: kind.clone(),
                    args,
                    orders: orders.clone(),
                })),
            }
        }
    }
}

fn subs_poly(poly: &Poly, map: &BTreeMap<Symbol, Expr>) -> Result<Expr, DgError> {
    let mut out = Expr::zero();
    for (mono, coeff) in poly.terms() {
        let mut term = Expr::from(coeff.clone());
        for (atom, exp) in mono.powers() {
            term = &term * &subs_atom(atom, map)?.pow(exp);
        }
        out = &out + &term;
    }
    Ok(out)
}

impl From<Rational> for Expr {
    fn from(value: Rational) -> Self {
        Expr {
            num: Poly::constant(value),
            den: BTreeMap::new(),
        }
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::from(Rational::from(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::from(value as i64)
    }
}

impl From<&Symbol> for Expr {
    fn from(value: &Symbol) -> Self {
        Expr::symbol(value)
    }
}

impl From<Symbol> for Expr {
    fn from(value: Symbol) -> Self {
        Expr::symbol(&value)
    }
}

impl<'a, 'b> Add<&'b Expr> for &'a Expr {
    type Output = Expr;

    fn add(self, rhs: &'b Expr) -> Expr {
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }
        let mut common = self.den.clone();
        for (factor, exp) in &rhs.den {
            let entry = common.entry(factor.clone()).or_insert(0);
            *entry = (*entry).max(*exp);
        }
        let cofactor = |own: &BTreeMap<Poly, u32>| {
            expand_factors(
                common
                    .iter()
                    .map(|(f, e)| (f, e - own.get(f).copied().unwrap_or(0))),
            )
        };
        let lhs = self.num.mul(&cofactor(&self.den));
        let rhs_num = rhs.num.mul(&cofactor(&rhs.den));
        normalized(lhs.add(&rhs_num), common)
    }
}

impl<'a, 'b> Sub<&'b Expr> for &'a Expr {
    type Output = Expr;

    fn sub(self, rhs: &'b Expr) -> Expr {
        self + &(-rhs)
    }
}

impl<'a, 'b> Mul<&'b Expr> for &'a Expr {
    type Output = Expr;

    fn mul(self, rhs: &'b Expr) -> Expr {
        if self.is_zero() || rhs.is_zero() {
            return Expr::zero();
        }
        let mut den = self.den.clone();
        for (factor, exp) in &rhs.den {
            *den.entry(factor.clone()).or_insert(0) += exp;
        }
        normalized(self.num.mul(&rhs.num), den)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -&self
    }
}

macro_rules! owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $trait<&'a Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &'a Expr) -> Expr {
                (&self).$method(rhs)
            }
        }

        impl<'a> $trait<Expr> for &'a Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                self.$method(&rhs)
            }
        }

        scalar_binop!($trait, $method, i64);
        scalar_binop!($trait, $method, i32);
    };
}

macro_rules! scalar_binop {
    ($trait:ident, $method:ident, $int:ty) => {
        impl $trait<$int> for Expr {
            type Output = Expr;

            fn $method(self, rhs: $int) -> Expr {
                (&self).$method(&Expr::from(rhs))
            }
        }

        impl $trait<Expr> for $int {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                (&Expr::from(self)).$method(&rhs)
            }
        }
    };
}

owned_binop!(Add, add);
owned_binop!(Sub, sub);
owned_binop!(Mul, mul);

impl Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        iter.fold(Expr::zero(), |acc, item| &acc + &item)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_empty() {
            return write!(f, "{}", self.num);
        }
        if self.num.len() > 1 {
            write!(f, "({})", self.num)?;
        } else {
            write!(f, "{}", self.num)?;
        }
        write!(f, "/")?;
        let single = self.den.len() == 1
            && self
                .den
                .iter()
                .all(|(factor, exp)| *exp == 1 && factor.len() == 1);
        if !single {
            write!(f, "(")?;
        }
        for (idx, (factor, exp)) in self.den.iter().enumerate() {
            if idx > 0 {
                write!(f, "*")?;
            }
            if factor.len() > 1 {
                write!(f, "({factor})")?;
            } else {
                write!(f, "{factor}")?;
            }
            if *exp > 1 {
                write!(f, "^{exp}")?;
            }
        }
        if !single {
            write!(f, ")")?;
        }
        Ok(())
    }
}
