use dg_tensor::{symbols, DgError, Expr, Manifold, Matrix, Symbol, Tensor};

fn minkowski() -> (Manifold, Vec<Symbol>) {
    let coords = symbols("t, x, y, z");
    let metric = Matrix::diag(vec![-Expr::one(), Expr::one(), Expr::one(), Expr::one()]);
    (Manifold::new(metric, coords.clone()).expect("manifold"), coords)
}

fn polar() -> (Manifold, Vec<Symbol>) {
    let coords = symbols("r, phi");
    let metric = Matrix::diag(vec![Expr::one(), coords[0].expr().pow(2)]);
    (Manifold::new(metric, coords.clone()).expect("manifold"), coords)
}

fn mixed(plane: &Manifold, seed: i64) -> Tensor {
    let r = plane.coords()[0].expr();
    Tensor::new(
        plane,
        "ul",
        [
            ((0, 0), Expr::from(seed)),
            ((0, 1), r.pow(2)),
            ((1, 1), seed * r.sin()),
        ],
    )
    .expect("tensor")
}

#[test]
fn addition_is_commutative_and_invertible() {
    let (plane, _) = polar();
    let a = mixed(&plane, 2);
    let b = mixed(&plane, 5);
    let sum = a.add(&b).expect("add");
    assert_eq!(sum, b.add(&a).expect("add"));
    assert_eq!(sum.sub(&b).expect("sub"), a);
    assert!(a.sub(&a).expect("sub").is_empty());
    assert_eq!(sum.get((1, 1)).expect("component"), 7 * plane.coords()[0].expr().sin());
}

#[test]
fn mismatched_signatures_are_rejected() {
    let (plane, _) = polar();
    let upper = Tensor::new(&plane, "uuu", [((0, 0, 0), Expr::one())]).expect("tensor");
    let lower = Tensor::new(&plane, "lll", [((0, 0, 0), Expr::one())]).expect("tensor");
    let err = upper.add(&lower).unwrap_err();
    assert!(matches!(err, DgError::Signature(_)));
    assert_eq!(err.info().code, "signature-mismatch");
    assert!(matches!(upper.sub(&lower), Err(DgError::Signature(_))));
}

#[test]
fn tensors_from_different_manifolds_do_not_mix() {
    let (first, _) = polar();
    let (second, _) = polar();
    let a = mixed(&first, 1);
    let b = mixed(&second, 1);
    let err = a.add(&b).unwrap_err();
    assert_eq!(err.info().code, "manifold-mismatch");
    assert!(matches!(a.product(&b), Err(DgError::Signature(_))));
}

#[test]
fn scalar_multiplication_commutes() {
    let (plane, coords) = polar();
    let a = mixed(&plane, 3);
    let k = coords[1].expr() + 1;
    assert_eq!(&a * &k, &k * &a);
    assert_eq!(a.clone() * k.clone(), k.clone() * a.clone());
    assert!((a.clone() * Expr::zero()).is_empty());
    assert_eq!((&a * &k).get((0, 1)).expect("component"), coords[0].expr().pow(2) * k);
}

#[test]
fn product_concatenates_signatures() {
    let (space, coords) = minkowski();
    let v = Tensor::vector(&space, coords.iter().map(Symbol::expr).collect()).expect("vector");
    let w = Tensor::one_form(&space, vec![Expr::one(), Expr::zero(), Expr::zero(), Expr::from(2)])
        .expect("one-form");
    let vw = v.product(&w).expect("product");
    assert_eq!(vw.rank(), 2);
    assert_eq!(vw.signature().to_string(), "ul");
    assert_eq!(vw.len(), 8);
    assert_eq!(vw.get((&coords[1], &coords[3])).expect("component"), 2 * coords[1].expr());
    assert_eq!(vw.dims(), 4);
    assert_eq!(vw.coords(), coords.as_slice());
}

#[test]
fn lowering_with_minkowski_flips_time_sign() {
    let (space, coords) = minkowski();
    let position =
        Tensor::vector(&space, coords.iter().map(Symbol::expr).collect()).expect("vector");
    let lowered = position.lower_index(0).expect("lower");
    assert_eq!(lowered.signature().to_string(), "l");
    assert_eq!(lowered.get(0).expect("component"), -coords[0].expr());
    assert_eq!(lowered.get(&coords[2]).expect("component"), coords[2].expr());

    let interval = position.product(&lowered).expect("product").contract(0, 1).expect("contract");
    assert_eq!(interval.rank(), 0);
    let expected = -coords[0].expr().pow(2)
        + coords[1].expr().pow(2)
        + coords[2].expr().pow(2)
        + coords[3].expr().pow(2);
    assert_eq!(interval.get(()).expect("component"), expected);
}

#[test]
fn lower_then_raise_round_trips() {
    let (plane, coords) = polar();
    let a = mixed(&plane, 4);
    for slot in 0..2 {
        let shifted = if a.signature().get(slot) == Some(dg_tensor::IndexPosition::Up) {
            a.lower_index(slot).expect("lower").raise_index(slot).expect("raise")
        } else {
            a.raise_index(slot).expect("raise").lower_index(slot).expect("lower")
        };
        assert_eq!(shifted, a);
    }
    let v = Tensor::vector(&plane, vec![coords[1].expr(), Expr::one()]).expect("vector");
    let lowered = v.lower_index(0).expect("lower");
    assert_eq!(lowered.get(1).expect("component"), coords[0].expr().pow(2));
    assert_eq!(lowered.raise_index(0).expect("raise"), v);
}

#[test]
fn shifting_into_the_current_position_fails() {
    let (plane, _) = polar();
    let a = mixed(&plane, 1);
    let err = a.raise_index(0).unwrap_err();
    assert!(matches!(err, DgError::Position(_)));
    assert_eq!(err.info().code, "already-upper");
    assert_eq!(a.lower_index(1).unwrap_err().info().code, "already-lower");
    assert!(matches!(a.raise_index(2), Err(DgError::Lookup(_))));
}

#[test]
fn contraction_checks_slots() {
    let (plane, _) = polar();
    let a = mixed(&plane, 1);
    assert_eq!(a.contract(0, 0).unwrap_err().info().code, "repeated-slot");
    assert!(matches!(a.contract(0, 3), Err(DgError::Lookup(_))));
    let trace = a.contract(1, 0).expect("contract");
    let r = plane.coords()[0].expr();
    assert_eq!(trace.get(()).expect("component"), 1 + r.sin());
}

#[test]
fn contraction_ignores_slot_positions() {
    let (plane, coords) = polar();
    let both_lower = Tensor::new(
        &plane,
        "ll",
        [((0, 0), coords[0].expr()), ((1, 1), Expr::from(3)), ((0, 1), Expr::one())],
    )
    .expect("tensor");
    let trace = both_lower.contract(0, 1).expect("contract");
    assert_eq!(trace.get(()).expect("component"), coords[0].expr() + 3);
}

#[test]
fn products_of_large_components_stay_exact() {
    let scale = Expr::from(10i64.pow(13));
    let metric = Matrix::diag(vec![scale.clone(), scale.clone()]);
    let plane = Manifold::new(metric, symbols("x, y")).expect("manifold");
    let v = Tensor::vector(&plane, vec![scale.clone(), Expr::zero()]).expect("vector");
    let low = v.lower_index(0).expect("lower");
    assert_eq!(low.get(0).expect("component"), scale.pow(2));

    let square = low.product(&low).expect("product");
    let expected = scale.pow(4);
    assert_eq!(square.get((0, 0)).expect("component"), expected);
    assert_eq!(expected.to_string(), format!("1{}", "0".repeat(52)));
    assert_eq!(square.len(), 1);

    let norm = low.product(&v).expect("product").contract(0, 1).expect("contract");
    assert_eq!(norm.get(()).expect("component"), scale.pow(3));
}
