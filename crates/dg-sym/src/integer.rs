//! Arbitrary-precision signed integers backing [`Rational`](crate::Rational).

use std::cmp::Ordering;
use std::fmt;

/// Sign and magnitude, the magnitude in little-endian base `2^32` limbs.
///
/// The magnitude never ends in a zero limb and zero is never negative, so derived
/// equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Integer {
    negative: bool,
    mag: Vec<u32>,
}

fn trim(mag: &mut Vec<u32>) {
    while mag.last() == Some(&0) {
        mag.pop();
    }
}

fn cmp_mag(a: &[u32], b: &[u32]) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

fn add_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(long.len() + 1);
    let mut carry = 0u64;
    for (i, &limb) in long.iter().enumerate() {
        let sum = u64::from(limb) + u64::from(short.get(i).copied().unwrap_or(0)) + carry;
        out.push(sum as u32);
        carry = sum >> 32;
    }
    if carry != 0 {
        out.push(carry as u32);
    }
    out
}

/// `a - b` for `a >= b`.
fn sub_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0i64;
    for (i, &limb) in a.iter().enumerate() {
        let mut diff = i64::from(limb) - i64::from(b.get(i).copied().unwrap_or(0)) - borrow;
        if diff < 0 {
            diff += 1 << 32;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out.push(diff as u32);
    }
    trim(&mut out);
    out
}

fn mul_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0u32; a.len() + b.len()];
    for (i, &x) in a.iter().enumerate() {
        let mut carry = 0u64;
        for (j, &y) in b.iter().enumerate() {
            let cur = u64::from(out[i + j]) + u64::from(x) * u64::from(y) + carry;
            out[i + j] = cur as u32;
            carry = cur >> 32;
        }
        out[i + b.len()] = carry as u32;
    }
    trim(&mut out);
    out
}

fn divrem_small(a: &[u32], divisor: u32) -> (Vec<u32>, u32) {
    let divisor = u64::from(divisor);
    let mut quotient = vec![0u32; a.len()];
    let mut rem = 0u64;
    for i in (0..a.len()).rev() {
        let cur = (rem << 32) | u64::from(a[i]);
        quotient[i] = (cur / divisor) as u32;
        rem = cur % divisor;
    }
    trim(&mut quotient);
    (quotient, rem as u32)
}

fn shl1(mag: &mut Vec<u32>) {
    let mut carry = 0u32;
    for limb in mag.iter_mut() {
        let next = *limb >> 31;
        *limb = (*limb << 1) | carry;
        carry = next;
    }
    if carry != 0 {
        mag.push(carry);
    }
}

/// Truncating magnitude division. A zero divisor yields a zero quotient.
fn divrem_mag(a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    if b.is_empty() || cmp_mag(a, b) == Ordering::Less {
        return (Vec::new(), a.to_vec());
    }
    if let [single] = b {
        let (quotient, rem) = divrem_small(a, *single);
        let rem = if rem == 0 { Vec::new() } else { vec![rem] };
        return (quotient, rem);
    }
    // Binary long division: shift one bit of `a` into the remainder at a time.
    let mut quotient = vec![0u32; a.len()];
    let mut rem: Vec<u32> = Vec::with_capacity(b.len() + 1);
    for bit in (0..a.len() * 32).rev() {
        shl1(&mut rem);
        if (a[bit / 32] >> (bit % 32)) & 1 == 1 {
            match rem.first_mut() {
                Some(low) => *low |= 1,
                None => rem.push(1),
            }
        }
        if cmp_mag(&rem, b) != Ordering::Less {
            rem = sub_mag(&rem, b);
            quotient[bit / 32] |= 1 << (bit % 32);
        }
    }
    trim(&mut quotient);
    (quotient, rem)
}

impl Integer {
    fn from_parts(negative: bool, mut mag: Vec<u32>) -> Self {
        trim(&mut mag);
        Self {
            negative: negative && !mag.is_empty(),
            mag,
        }
    }

    pub(crate) const fn zero() -> Self {
        Self {
            negative: false,
            mag: Vec::new(),
        }
    }

    pub(crate) fn one() -> Self {
        Self {
            negative: false,
            mag: vec![1],
        }
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.mag.is_empty()
    }

    pub(crate) fn is_one(&self) -> bool {
        !self.negative && self.mag == [1]
    }

    pub(crate) fn is_negative(&self) -> bool {
        self.negative
    }

    pub(crate) fn abs(&self) -> Self {
        Self {
            negative: false,
            mag: self.mag.clone(),
        }
    }

    pub(crate) fn negated(&self) -> Self {
        Integer::from_parts(!self.negative, self.mag.clone())
    }

    pub(crate) fn add(&self, other: &Integer) -> Integer {
        if self.negative == other.negative {
            return Integer::from_parts(self.negative, add_mag(&self.mag, &other.mag));
        }
        match cmp_mag(&self.mag, &other.mag) {
            Ordering::Equal => Integer::zero(),
            Ordering::Greater => Integer::from_parts(self.negative, sub_mag(&self.mag, &other.mag)),
            Ordering::Less => Integer::from_parts(other.negative, sub_mag(&other.mag, &self.mag)),
        }
    }

    pub(crate) fn mul(&self, other: &Integer) -> Integer {
        Integer::from_parts(self.negative != other.negative, mul_mag(&self.mag, &other.mag))
    }

    /// Truncating quotient and remainder; the remainder takes the sign of `self`.
    pub(crate) fn div_rem(&self, divisor: &Integer) -> (Integer, Integer) {
        let (quotient, rem) = divrem_mag(&self.mag, &divisor.mag);
        (
            Integer::from_parts(self.negative != divisor.negative, quotient),
            Integer::from_parts(self.negative, rem),
        )
    }

    /// Non-negative greatest common divisor; zero only when both inputs are zero.
    pub(crate) fn gcd(&self, other: &Integer) -> Integer {
        let mut a = self.abs();
        let mut b = other.abs();
        while !b.is_zero() {
            let (_, rem) = a.div_rem(&b);
            a = b;
            b = rem;
        }
        a
    }
}

impl From<i128> for Integer {
    fn from(value: i128) -> Self {
        let mut magnitude = value.unsigned_abs();
        let mut mag = Vec::new();
        while magnitude != 0 {
            mag.push(magnitude as u32);
            magnitude >>= 32;
        }
        Integer::from_parts(value < 0, mag)
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => cmp_mag(&self.mag, &other.mag),
            (true, true) => cmp_mag(&other.mag, &self.mag),
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const CHUNK: u32 = 1_000_000_000;
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut chunks = Vec::new();
        let mut rest = self.mag.clone();
        while !rest.is_empty() {
            let (quotient, rem) = divrem_small(&rest, CHUNK);
            chunks.push(rem);
            rest = quotient;
        }
        if self.negative {
            write!(f, "-")?;
        }
        let mut chunks = chunks.into_iter().rev();
        if let Some(head) = chunks.next() {
            write!(f, "{head}")?;
        }
        for chunk in chunks {
            write!(f, "{chunk:09}")?;
        }
        Ok(())
    }
}
