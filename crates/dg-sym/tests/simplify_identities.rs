use std::collections::BTreeMap;

use dg_core::DgError;
use dg_sym::{symbols, Expr, Rational, Symbol};

fn vars(names: &str) -> Vec<Expr> {
    symbols(names).iter().map(Expr::symbol).collect()
}

#[test]
fn like_terms_combine() {
    let x = vars("x").remove(0);
    assert_eq!(x.clone() + x.clone(), 2 * x.clone());
    assert!((x.clone() - x).is_zero());
}

#[test]
fn polynomial_identity_is_zero() {
    let x = vars("x").remove(0);
    let lhs = (x.clone() + 1i32) * (x.clone() - 1i32);
    let rhs = x.pow(2) - 1i32;
    assert!((lhs - rhs).is_zero());
}

#[test]
fn pythagorean_identity_collapses() {
    let theta = vars("theta").remove(0);
    let sum = theta.sin().pow(2) + theta.cos().pow(2);
    assert!(sum.is_one());

    let cube = theta.cos().pow(3);
    let reduced = theta.cos() - theta.cos() * theta.sin().pow(2);
    assert_eq!(cube, reduced);
}

#[test]
fn fractions_share_denominators() {
    let r = vars("r").remove(0);
    let inv = Expr::one().checked_div(&r).expect("nonzero divisor");
    let twice = Expr::from(2).checked_div(&r).expect("nonzero divisor");
    assert_eq!(inv.clone() + inv, twice);

    let half = Expr::ratio(1, 2).expect("ratio");
    assert!((half.clone() + half).is_one());
}

#[test]
fn common_factors_cancel() {
    let v = vars("x, y");
    let (x, y) = (v[0].clone(), v[1].clone());
    let quotient = (x.clone() * y.clone() + x.clone()).checked_div(&x).expect("nonzero divisor");
    assert_eq!(quotient, y + 1);

    let difference_of_squares = (x.pow(2) - 1i32)
        .checked_div(&(x.clone() - 1))
        .expect("nonzero divisor");
    assert_eq!(difference_of_squares, x + 1);
}

#[test]
fn rendering_is_readable() {
    let v = vars("r, theta");
    let (r, theta) = (v[0].clone(), v[1].clone());
    assert_eq!((-r.clone()).to_string(), "-r");
    assert_eq!(Expr::one().checked_div(&r).expect("nonzero divisor").to_string(), "1/r");
    assert_eq!(theta.sin().pow(2).to_string(), "sin(theta)^2");
    assert_eq!(Expr::from(0).to_string(), "0");
}

#[test]
fn division_by_zero_is_reported() {
    let x = vars("x").remove(0);
    let err = x.checked_div(&Expr::zero()).unwrap_err();
    assert!(matches!(err, DgError::Symbolic(_)));
    assert_eq!(err.info().code, "division-by-zero");
    assert!(Expr::ratio(1, 0).is_err());
    assert!(Expr::zero().ln().is_err());
    assert!(Expr::one().ln().expect("log of nonzero").is_zero());
}

#[test]
fn free_symbols_reach_into_function_arguments() {
    let v = vars("x, y");
    let expr = v[0].sin() * v[1].clone();
    let free: Vec<_> = expr.free_symbols().into_iter().collect();
    assert_eq!(free, symbols("x, y"));
    assert!(expr.depends_on(&Symbol::new("x")));
    assert!(!expr.depends_on(&Symbol::new("z")));
}

#[test]
fn substitution_expands_and_renormalizes() {
    let v = vars("x, y");
    let (x, y) = (v[0].clone(), v[1].clone());
    let map = BTreeMap::from([(Symbol::new("x"), y.clone() + 1)]);
    let replaced = (x.clone() * x.clone()).subs(&map).expect("subs");
    assert_eq!(replaced, y.pow(2) + 2 * y + 1);

    let zero_map = BTreeMap::from([(Symbol::new("x"), Expr::zero())]);
    let inv = Expr::one().checked_div(&x).expect("nonzero divisor");
    assert!(inv.subs(&zero_map).is_err());
    assert!(x.sin().subs(&zero_map).expect("subs").is_zero());
}

#[test]
fn simplify_is_idempotent() {
    let v = vars("r, theta");
    let expr = (v[1].cos().checked_div(&v[1].sin()).expect("nonzero divisor")) * v[0].clone();
    assert_eq!(expr.simplify(), expr);
    assert_eq!(expr.simplify().simplify(), expr.simplify());
}

#[test]
fn constants_and_symbols_are_recognised() {
    let x = vars("x").remove(0);
    assert_eq!(x.as_symbol(), Some(&Symbol::new("x")));
    assert_eq!((x.clone() * 2i32).as_symbol(), None);
    assert_eq!(Expr::from(7).as_rational(), Some(Rational::integer(7)));
    assert_eq!(
        Expr::ratio(6, -4).expect("ratio").as_rational(),
        Rational::new(-3, 2)
    );
    assert!(x.as_rational().is_none());
}

#[test]
fn integer_powers_accept_negative_exponents() {
    let r = vars("r").remove(0);
    let inv_square = Expr::one().checked_div(&r.pow(2)).expect("nonzero divisor");
    assert_eq!(r.powi(-2).expect("nonzero base"), inv_square);
    assert_eq!(r.powi(3).expect("positive power"), r.pow(3));
    assert!(r.powi(0).expect("zeroth power").is_one());
    assert!(Expr::zero().powi(-1).is_err());
}

#[test]
fn coefficients_beyond_machine_width_stay_exact() {
    let big = Expr::from(i64::MAX);
    let cube = big.pow(3);
    assert_eq!(
        cube.to_string(),
        "784637716923335095224261902710254454442933591094742482943"
    );
    assert_eq!(cube.checked_div(&big.pow(2)).expect("nonzero divisor"), big);
    assert!((&(&cube + &Expr::one()) - &cube).is_one());

    let x = vars("x").remove(0);
    let near = &(&cube * &x) + &Expr::one();
    assert!(!(&near - &(&cube * &x)).is_zero());
    assert!((&near - &near).is_zero());
}
