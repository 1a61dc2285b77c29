use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dg_tensor::{symbols, EngineOpts, Expr, Manifold, Matrix, RiemannTensor};

fn schwarzschild(opts: &EngineOpts) -> Manifold {
    let coords = symbols("t, r, theta, phi");
    let r = coords[1].expr();
    let theta = coords[2].expr();
    let mass = symbols("M").remove(0).expr();
    let lapse = Expr::one() - (2 * mass).checked_div(&r).expect("nonzero radius");
    let metric = Matrix::diag(vec![
        -lapse.clone(),
        lapse.recip().expect("nonzero lapse"),
        r.pow(2),
        r.pow(2) * theta.sin().pow(2),
    ]);
    Manifold::with_opts(metric, coords, opts).expect("schwarzschild manifold")
}

fn bench_connection(c: &mut Criterion) {
    let opts = EngineOpts::default();
    c.bench_function("schwarzschild_connection", |b| {
        b.iter(|| black_box(schwarzschild(&opts).christoffel().len()))
    });
}

fn bench_curvature(c: &mut Criterion) {
    let mut group = c.benchmark_group("schwarzschild_riemann");
    group.sample_size(10);
    for threads in [1usize, 4] {
        let opts = EngineOpts::with_concurrency(threads);
        let manifold = schwarzschild(&opts);
        group.bench_function(format!("threads_{threads}"), |b| {
            b.iter(|| {
                let riemann = RiemannTensor::with_opts(&manifold, &opts).expect("riemann");
                black_box(riemann.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_connection, bench_curvature);
criterion_main!(benches);
