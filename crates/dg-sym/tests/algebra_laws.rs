use dg_sym::{Expr, Symbol};
use proptest::prelude::*;

/// A term `c * x^i * y^j * sin(x)^k * cos(x)^m`.
type Term = (i64, u32, u32, u32, u32);

fn build(terms: &[Term], trig: bool) -> Expr {
    let x = Symbol::new("x").expr();
    let y = Symbol::new("y").expr();
    terms
        .iter()
        .map(|&(c, i, j, k, m)| {
            let mut term = Expr::from(c) * x.pow(i) * y.pow(j);
            if trig {
                term = term * x.sin().pow(k) * x.cos().pow(m);
            }
            term
        })
        .sum()
}

fn terms() -> impl Strategy<Value = Vec<Term>> {
    prop::collection::vec((-4i64..5, 0u32..3, 0u32..3, 0u32..3, 0u32..3), 1..4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn addition_commutes_and_cancels(a in terms(), b in terms(), trig in any::<bool>()) {
        let a = build(&a, trig);
        let b = build(&b, trig);
        prop_assert_eq!(&a + &b, &b + &a);
        prop_assert_eq!(&(&a + &b) - &b, a);
    }

    #[test]
    fn multiplication_distributes(a in terms(), b in terms(), c in terms(), trig in any::<bool>()) {
        let a = build(&a, trig);
        let b = build(&b, trig);
        let c = build(&c, trig);
        prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
    }

    #[test]
    fn derivative_is_linear_and_obeys_product_rule(a in terms(), b in terms(), trig in any::<bool>()) {
        let x = Symbol::new("x");
        let a = build(&a, trig);
        let b = build(&b, trig);
        prop_assert_eq!((&a + &b).diff(&x), &a.diff(&x) + &b.diff(&x));
        prop_assert_eq!((&a * &b).diff(&x), &(&a.diff(&x) * &b) + &(&a * &b.diff(&x)));
    }

    #[test]
    fn division_undoes_multiplication(a in terms(), b in terms()) {
        let a = build(&a, false);
        let b = build(&b, false);
        prop_assume!(!b.is_zero());
        let product = &a * &b;
        prop_assert_eq!(product.checked_div(&b).expect("nonzero divisor"), a);
    }

    #[test]
    fn quotients_differentiate_consistently(a in terms(), b in terms()) {
        let x = Symbol::new("x");
        let a = build(&a, false);
        let b = build(&b, false);
        prop_assume!(!b.is_zero());
        let q = a.checked_div(&b).expect("nonzero divisor");
        // (a / b)' * b == a' - (a / b) * b'
        let lhs = &q.diff(&x) * &b;
        let rhs = &a.diff(&x) - &(&q * &b.diff(&x));
        prop_assert!((&lhs - &rhs).is_zero());
    }
}
