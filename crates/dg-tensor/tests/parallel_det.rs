use dg_tensor::{symbols, EngineOpts, Expr, Manifold, Matrix, RiemannTensor, TensorReport};

fn schwarzschild(opts: &EngineOpts) -> Manifold {
    let coords = symbols("t, r, theta, phi");
    let r = coords[1].expr();
    let theta = coords[2].expr();
    let mass = symbols("M").remove(0).expr();
    let lapse = Expr::one() - (2i32 * mass).checked_div(&r).expect("nonzero divisor");
    let metric = Matrix::diag(vec![
        -lapse.clone(),
        lapse.recip().expect("nonzero"),
        r.pow(2),
        r.pow(2) * theta.sin().pow(2),
    ]);
    Manifold::with_opts(metric, coords, opts).expect("manifold")
}

#[test]
fn pooled_connection_matches_inline() {
    let inline = schwarzschild(&EngineOpts::default());
    let pooled = schwarzschild(&EngineOpts::with_concurrency(4));
    assert_eq!(inline.christoffel(), pooled.christoffel());
    assert_eq!(
        TensorReport::from_connection(&inline).expect("connection report").hash,
        TensorReport::from_connection(&pooled).expect("connection report").hash
    );
}

#[test]
fn pooled_curvature_matches_inline() {
    let manifold = schwarzschild(&EngineOpts::default());
    let inline = RiemannTensor::new(&manifold).expect("riemann");
    let pooled =
        RiemannTensor::with_opts(&manifold, &EngineOpts::with_concurrency(3)).expect("riemann");
    assert_eq!(inline, pooled);
    assert!(!inline.is_empty());
}

#[test]
fn vacuum_solution_is_ricci_flat() {
    let manifold = schwarzschild(&EngineOpts::with_concurrency(2));
    let riemann = RiemannTensor::new(&manifold).expect("riemann");
    assert!(riemann.ricci().expect("ricci").is_empty());
}
