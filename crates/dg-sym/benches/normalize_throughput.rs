use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dg_sym::{Expr, Matrix, Symbol};

fn normalize_bench(c: &mut Criterion) {
    let theta = Symbol::new("theta");
    let t = theta.expr();
    let cot = t.cos().checked_div(&t.sin()).expect("nonzero divisor");
    c.bench_function("cot_second_derivative", |b| {
        b.iter(|| {
            let value = cot.diff(&theta).diff(&theta);
            black_box(value);
        });
    });

    let r = Symbol::new("r").expr();
    let m = Symbol::new("M").expr();
    let lapse = Expr::one() + 2 * m.checked_div(&r).expect("nonzero divisor");
    let metric = Matrix::diag(vec![
        -lapse.clone(),
        lapse.recip().expect("nonzero"),
        r.pow(2),
        r.pow(2) * t.sin().pow(2),
    ]);
    c.bench_function("schwarzschild_metric_inverse", |b| {
        b.iter(|| {
            let inv = metric.inverse().expect("invertible");
            black_box(inv);
        });
    });
}

criterion_group!(benches, normalize_bench);
criterion_main!(benches);
