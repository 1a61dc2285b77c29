//! Exact rational coefficients.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::integer::Integer;

/// Reduced fraction `num / den` with `den > 0` and unbounded precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    num: Integer,
    den: Integer,
}

impl Rational {
    /// Reduces `num / den` for a positive `den`.
    fn canonical(num: Integer, den: Integer) -> Self {
        let g = num.gcd(&den);
        if g.is_one() {
            return Self { num, den };
        }
        Self {
            num: num.div_rem(&g).0,
            den: den.div_rem(&g).0,
        }
    }

    /// Additive identity.
    pub fn zero() -> Self {
        Self {
            num: Integer::zero(),
            den: Integer::one(),
        }
    }

    /// Multiplicative identity.
    pub fn one() -> Self {
        Self {
            num: Integer::one(),
            den: Integer::one(),
        }
    }

    /// Reduced fraction `num / den`; `None` when `den` is zero.
    pub fn new(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let (num, den) = (Integer::from(num), Integer::from(den));
        if den.is_negative() {
            Some(Rational::canonical(num.negated(), den.negated()))
        } else {
            Some(Rational::canonical(num, den))
        }
    }

    /// Integer value as a fraction.
    pub fn integer(value: i128) -> Self {
        Self {
            num: Integer::from(value),
            den: Integer::one(),
        }
    }

    /// True for exactly zero.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// True for exactly one.
    pub fn is_one(&self) -> bool {
        self.num.is_one() && self.den.is_one()
    }

    /// True for strictly negative values.
    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn recip(&self) -> Option<Self> {
        if self.num.is_zero() {
            return None;
        }
        let (num, den) = if self.num.is_negative() {
            (self.den.negated(), self.num.negated())
        } else {
            (self.den.clone(), self.num.clone())
        };
        Some(Self { num, den })
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Self {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::integer(i128::from(value))
    }
}

impl Add<&Rational> for &Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Rational {
        let g = self.den.gcd(&rhs.den);
        let lhs_scale = rhs.den.div_rem(&g).0;
        let rhs_scale = self.den.div_rem(&g).0;
        Rational::canonical(
            self.num.mul(&lhs_scale).add(&rhs.num.mul(&rhs_scale)),
            self.den.mul(&lhs_scale),
        )
    }
}

impl Sub<&Rational> for &Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Rational {
        self + &(-rhs)
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Rational {
        if self.is_zero() || rhs.is_zero() {
            return Rational::zero();
        }
        // Cross-cancel first so the products stay coprime.
        let g1 = self.num.gcd(&rhs.den);
        let g2 = rhs.num.gcd(&self.den);
        Rational {
            num: self.num.div_rem(&g1).0.mul(&rhs.num.div_rem(&g2).0),
            den: self.den.div_rem(&g2).0.mul(&rhs.den.div_rem(&g1).0),
        }
    }
}

macro_rules! forward_owned_binop {
    ($($imp:ident :: $method:ident),*) => {$(
        impl $imp for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                (&self).$method(&rhs)
            }
        }

        impl $imp<&Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                (&self).$method(rhs)
            }
        }

        impl $imp<Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                self.$method(&rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul);

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: self.num.negated(),
            den: self.den.clone(),
        }
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        -&self
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.num
            .mul(&other.den)
            .cmp(&other.num.mul(&self.den))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
