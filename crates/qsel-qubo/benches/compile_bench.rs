//! Benchmarks for QUBO compilation.
//!
//! Run with: cargo bench -p qsel-qubo

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsel_qubo::{ExpansionStrategy, QuboCompiler};

fn costs(n: usize) -> (Vec<f64>, f64) {
    let costs: Vec<f64> = (0..n).map(|i| ((i * 7919) % 101) as f64).collect();
    let penalty = costs.iter().sum::<f64>() + 1.0;
    (costs, penalty)
}

/// Compilation cost grows with the N(N−1)/2 cross terms.
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for n in &[8, 32, 128, 512] {
        let (costs, penalty) = costs(*n);
        for (label, strategy) in [
            ("closed_form", ExpansionStrategy::ClosedForm),
            ("algebraic", ExpansionStrategy::Algebraic),
        ] {
            let compiler = QuboCompiler::default().with_expansion(strategy);
            group.bench_with_input(BenchmarkId::new(label, n), n, |b, &n| {
                b.iter(|| compiler.compile(black_box(n), black_box(&costs), black_box(penalty)));
            });
        }
    }

    group.finish();
}

fn bench_ising(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_ising");

    for n in &[32, 256] {
        let (costs, penalty) = costs(*n);
        let compiled = QuboCompiler::default().compile(*n, &costs, penalty).unwrap();
        group.bench_with_input(BenchmarkId::new("n", n), &compiled.qubo, |b, qubo| {
            b.iter(|| black_box(qubo).to_ising());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_ising);
criterion_main!(benches);
