//! Sparse multivariate polynomials over [`Atom`]s with rational coefficients.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use crate::atom::Atom;
use crate::rational::Rational;

/// Product of atoms raised to positive integer powers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct Monomial(BTreeMap<Atom, u32>);

impl Monomial {
    pub(crate) fn one() -> Self {
        Self(BTreeMap::new())
    }

    pub(crate) fn atom(atom: Atom, exp: u32) -> Self {
        let mut powers = BTreeMap::new();
        if exp > 0 {
            powers.insert(atom, exp);
        }
        Self(powers)
    }

    pub(crate) fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn powers(&self) -> impl Iterator<Item = (&Atom, u32)> {
        self.0.iter().map(|(atom, exp)| (atom, *exp))
    }

    fn degree(&self) -> u32 {
        self.0.values().sum()
    }

    pub(crate) fn mul(&self, other: &Monomial) -> Monomial {
        let mut powers = self.0.clone();
        for (atom, exp) in &other.0 {
            *powers.entry(atom.clone()).or_insert(0) += exp;
        }
        Monomial(powers)
    }

    /// `self / other` when every exponent of `other` fits.
    pub(crate) fn checked_div(&self, other: &Monomial) -> Option<Monomial> {
        let mut powers = self.0.clone();
        for (atom, exp) in &other.0 {
            let entry = powers.get_mut(atom)?;
            match (*entry).cmp(exp) {
                Ordering::Less => return None,
                Ordering::Equal => {
                    powers.remove(atom);
                }
                Ordering::Greater => *entry -= exp,
            }
        }
        Some(Monomial(powers))
    }

    /// Greatest common monomial divisor.
    pub(crate) fn gcd(&self, other: &Monomial) -> Monomial {
        Monomial(
            self.0
                .iter()
                .filter_map(|(atom, exp)| other.0.get(atom).map(|o| (atom.clone(), *exp.min(o))))
                .collect(),
        )
    }

    /// Copy with the power of `atom` lowered by one.
    pub(crate) fn without_one(&self, atom: &Atom) -> Monomial {
        let mut powers = self.0.clone();
        if let Some(exp) = powers.get_mut(atom) {
            if *exp > 1 {
                *exp -= 1;
            } else {
                powers.remove(atom);
            }
        }
        Monomial(powers)
    }

    /// Graded lexicographic order; atoms earlier in the atom order dominate.
    pub(crate) fn grlex(&self, other: &Monomial) -> Ordering {
        self.degree().cmp(&other.degree()).then_with(|| {
            let mut lhs = self.0.iter().peekable();
            let mut rhs = other.0.iter().peekable();
            loop {
                match (lhs.peek(), rhs.peek()) {
                    (None, None) => return Ordering::Equal,
                    (Some(_), None) => return Ordering::Greater,
                    (None, Some(_)) => return Ordering::Less,
                    (Some((la, le)), Some((ra, re))) => match la.cmp(ra) {
                        Ordering::Less => return Ordering::Greater,
                        Ordering::Greater => return Ordering::Less,
                        Ordering::Equal => {
                            if le != re {
                                return le.cmp(re);
                            }
                            lhs.next();
                            rhs.next();
                        }
                    },
                }
            }
        })
    }

    /// Splits off the first `cos(a)^k` with `k >= 2`.
    ///
    /// Returns the remaining monomial (with `cos(a)^(k mod 2)`), the `sin(a)` atom and `k / 2`.
    fn split_cos_square(&self) -> Option<(Monomial, Atom, u32)> {
        let (atom, exp) = self.0.iter().find(|(atom, exp)| {
            **exp >= 2 && atom.cos_partner().is_some()
        })?;
        let sin = atom.cos_partner()?;
        let mut rest = self.0.clone();
        if exp % 2 == 0 {
            rest.remove(atom);
        } else {
            rest.insert(atom.clone(), 1);
        }
        Some((Monomial(rest), sin, exp / 2))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (atom, exp)) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, "*")?;
            }
            write!(f, "{atom}")?;
            if *exp > 1 {
                write!(f, "^{exp}")?;
            }
        }
        Ok(())
    }
}

/// Map from monomial to nonzero coefficient.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct Poly(BTreeMap<Monomial, Rational>);

impl Poly {
    pub(crate) fn zero() -> Self {
        Self(BTreeMap::new())
    }

    pub(crate) fn constant(value: Rational) -> Self {
        let mut poly = Poly::zero();
        poly.add_term(Monomial::one(), value);
        poly
    }

    pub(crate) fn one() -> Self {
        Poly::constant(Rational::one())
    }

    pub(crate) fn term(mono: Monomial, coeff: Rational) -> Self {
        let mut poly = Poly::zero();
        poly.add_term(mono, coeff);
        poly
    }

    pub(crate) fn atom(atom: Atom) -> Self {
        Poly::term(Monomial::atom(atom, 1), Rational::one())
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn is_one(&self) -> bool {
        self.as_constant().map(|c| c.is_one()).unwrap_or(false)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn as_constant(&self) -> Option<Rational> {
        match self.0.len() {
            0 => Some(Rational::zero()),
            1 => self
                .0
                .iter()
                .next()
                .filter(|(mono, _)| mono.is_one())
                .map(|(_, coeff)| coeff.clone()),
            _ => None,
        }
    }

    pub(crate) fn terms(&self) -> impl Iterator<Item = (&Monomial, &Rational)> {
        self.0.iter()
    }

    /// The single monomial of a one-term polynomial with unit coefficient.
    pub(crate) fn as_monomial(&self) -> Option<&Monomial> {
        if self.0.len() != 1 {
            return None;
        }
        self.0
            .iter()
            .next()
            .filter(|(_, coeff)| coeff.is_one())
            .map(|(mono, _)| mono)
    }

    fn add_term(&mut self, mono: Monomial, coeff: Rational) {
        if coeff.is_zero() {
            return;
        }
        match self.0.entry(mono) {
            Entry::Occupied(mut slot) => {
                let sum = slot.get() + &coeff;
                if sum.is_zero() {
                    slot.remove();
                } else {
                    *slot.get_mut() = sum;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(coeff);
            }
        }
    }

    pub(crate) fn add(&self, other: &Poly) -> Poly {
        let mut out = self.clone();
        for (mono, coeff) in &other.0 {
            out.add_term(mono.clone(), coeff.clone());
        }
        out
    }

    pub(crate) fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.neg())
    }

    pub(crate) fn neg(&self) -> Poly {
        Poly(self.0.iter().map(|(m, c)| (m.clone(), -c)).collect())
    }

    pub(crate) fn scale(&self, factor: Rational) -> Poly {
        if factor.is_zero() {
            return Poly::zero();
        }
        Poly(self.0.iter().map(|(m, c)| (m.clone(), c * &factor)).collect())
    }

    pub(crate) fn mul_term(&self, mono: &Monomial, coeff: Rational) -> Poly {
        if coeff.is_zero() {
            return Poly::zero();
        }
        Poly(
            self.0
                .iter()
                .map(|(m, c)| (m.mul(mono), c * &coeff))
                .collect(),
        )
    }

    pub(crate) fn mul(&self, other: &Poly) -> Poly {
        let mut out = Poly::zero();
        for (mono, coeff) in &other.0 {
            for (m, c) in &self.0 {
                out.add_term(m.mul(mono), c * coeff);
            }
        }
        out
    }

    pub(crate) fn pow(&self, exp: u32) -> Poly {
        let mut out = Poly::one();
        for _ in 0..exp {
            out = out.mul(self);
        }
        out
    }

    /// Greatest common monomial dividing every term.
    pub(crate) fn monomial_content(&self) -> Monomial {
        let mut terms = self.0.keys();
        let Some(first) = terms.next() else {
            return Monomial::one();
        };
        terms.fold(first.clone(), |acc, mono| acc.gcd(mono))
    }

    /// Leading monomial and coefficient in graded lexicographic order.
    pub(crate) fn leading(&self) -> Option<(&Monomial, Rational)> {
        self.0
            .iter()
            .max_by(|a, b| a.0.grlex(b.0))
            .map(|(mono, coeff)| (mono, coeff.clone()))
    }

    /// Divides every monomial by `mono`; `None` if some term is not divisible.
    pub(crate) fn div_monomial(&self, mono: &Monomial) -> Option<Poly> {
        let mut out = Poly::zero();
        for (m, c) in &self.0 {
            out.add_term(m.checked_div(mono)?, c.clone());
        }
        Some(out)
    }

    /// Exact division in the plain polynomial ring.
    ///
    /// Returns `None` as soon as a leading term is not divisible, which is exact for a
    /// monomial order.
    pub(crate) fn div_exact(&self, divisor: &Poly) -> Option<Poly> {
        let (lead_mono, lead_coeff) = divisor.leading()?;
        let lead_mono = lead_mono.clone();
        let inv_lead = lead_coeff.recip()?;
        let mut quotient = Poly::zero();
        let mut remainder = self.clone();
        while let Some((mono, coeff)) = remainder.leading() {
            let step_mono = mono.checked_div(&lead_mono)?;
            let step_coeff = &coeff * &inv_lead;
            remainder = remainder.sub(&divisor.mul_term(&step_mono, step_coeff.clone()));
            quotient.add_term(step_mono, step_coeff);
        }
        Some(quotient)
    }

    /// Rewrites every `cos(a)^k` with `k >= 2` through `cos(a)^2 = 1 - sin(a)^2`.
    ///
    /// The result has at most one power of each cosine, which makes it a normal form for
    /// the Pythagorean identity.
    pub(crate) fn reduce_trig(self) -> Poly {
        let mut current = self;
        loop {
            let mut changed = false;
            let mut next = Poly::zero();
            for (mono, coeff) in current.0 {
                match mono.split_cos_square() {
                    None => next.add_term(mono, coeff),
                    Some((rest, sin, pairs)) => {
                        changed = true;
                        let sin_sq = Poly::term(Monomial::atom(sin, 2), Rational::one());
                        let base = Poly::one().sub(&sin_sq);
                        next = next.add(&base.pow(pairs).mul_term(&rest, coeff));
                    }
                }
            }
            if !changed {
                return next;
            }
            current = next;
        }
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "0");
        }
        let mut terms: Vec<_> = self.0.iter().collect();
        terms.sort_by(|a, b| b.0.grlex(a.0));
        for (idx, (mono, coeff)) in terms.into_iter().enumerate() {
            let magnitude = if idx == 0 {
                if coeff.is_negative() {
                    write!(f, "-")?;
                }
                coeff.abs()
            } else {
                if coeff.is_negative() {
                    write!(f, " - ")?;
                } else {
                    write!(f, " + ")?;
                }
                coeff.abs()
            };
            if mono.is_one() {
                write!(f, "{magnitude}")?;
            } else if magnitude.is_one() {
                write!(f, "{mono}")?;
            } else {
                write!(f, "{magnitude}*{mono}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Symbol;

    fn var(name: &str) -> Poly {
        Poly::atom(Atom::Symbol(Symbol::new(name)))
    }

    #[test]
    fn exact_division_recovers_factor() {
        let x = var("x");
        let y = var("y");
        let f = x.add(&y);
        let g = x.sub(&Poly::one());
        let product = f.mul(&g);
        assert_eq!(product.div_exact(&f), Some(g.clone()));
        assert_eq!(product.div_exact(&g), Some(f));
        assert_eq!(product.add(&Poly::one()).div_exact(&g), None);
    }

    #[test]
    fn monomial_content_is_common_power() {
        let x = var("x");
        let y = var("y");
        let p = x.mul(&x).mul(&y).add(&x.mul(&y));
        let content = p.monomial_content();
        assert_eq!(Poly::term(content, Rational::one()), x.mul(&y));
    }

    #[test]
    fn cancelled_terms_are_dropped() {
        let x = var("x");
        assert!(x.sub(&x).is_zero());
        assert_eq!(x.add(&x).len(), 1);
    }
}
