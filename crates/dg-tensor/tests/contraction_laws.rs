use dg_tensor::{symbols, Expr, Manifold, Matrix, Tensor};
use proptest::prelude::*;

fn polar_plane() -> Manifold {
    let coords = symbols("r, phi");
    let metric = Matrix::diag(vec![Expr::one(), coords[0].expr().pow(2)]);
    Manifold::new(metric, coords).expect("manifold")
}

fn signature() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['u', 'l']), 2..5)
        .prop_map(|letters| letters.into_iter().collect())
}

fn build(plane: &Manifold, signature: &str, seeds: &[(u8, i64)]) -> Tensor {
    let rank = signature.len();
    let r = plane.coords()[0].expr();
    let entries = seeds.iter().map(|&(bits, coeff)| {
        let index: Vec<usize> = (0..rank).map(|slot| usize::from((bits >> slot) & 1)).collect();
        (index, coeff * r.clone())
    });
    Tensor::new(plane, signature, entries).expect("tensor")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn contraction_drops_two_slots(
        sig in signature(),
        seeds in prop::collection::vec((any::<u8>(), -3i64..4), 0..6),
        picks in (0usize..16, 0usize..16),
    ) {
        let plane = polar_plane();
        let tensor = build(&plane, &sig, &seeds);
        let rank = tensor.rank();
        let i = picks.0 % rank;
        let j = (i + 1 + picks.1 % (rank - 1)) % rank;
        prop_assume!(i != j);
        let contracted = tensor.contract(i, j).expect("contract");
        prop_assert_eq!(contracted.rank(), rank - 2);
        let mut expected = tensor.signature().positions().to_vec();
        expected.remove(i.max(j));
        expected.remove(i.min(j));
        prop_assert_eq!(contracted.signature().positions(), expected.as_slice());
    }

    #[test]
    fn sums_and_differences_cancel(
        sig in signature(),
        a in prop::collection::vec((any::<u8>(), -3i64..4), 0..6),
        b in prop::collection::vec((any::<u8>(), -3i64..4), 0..6),
    ) {
        let plane = polar_plane();
        let a = build(&plane, &sig, &a);
        let b = build(&plane, &sig, &b);
        let sum = a.add(&b).expect("add");
        prop_assert_eq!(&sum, &b.add(&a).expect("add"));
        prop_assert_eq!(sum.sub(&b).expect("sub"), a);
    }

    #[test]
    fn product_rank_is_additive(
        left in signature(),
        right in signature(),
        seeds in prop::collection::vec((any::<u8>(), -3i64..4), 0..4),
    ) {
        let plane = polar_plane();
        let a = build(&plane, &left, &seeds);
        let b = build(&plane, &right, &seeds);
        let ab = a.product(&b).expect("product");
        prop_assert_eq!(ab.rank(), a.rank() + b.rank());
        prop_assert_eq!(ab.signature().to_string(), format!("{left}{right}"));
        prop_assert!(ab.len() <= a.len() * b.len());
    }
}
