use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ordering_graph::conflict::{intersect, sort_and_intersect};
use ordering_graph::ordering::{build_ordering_graph, generate_inputs, BuildOptions, GeneratorParams};
use ordering_graph::generate_graph;

fn benchmark_intersection(c: &mut Criterion) {
    let a: Vec<u32> = (0..2_000).step_by(3).collect();
    let b: Vec<u32> = (0..2_000).step_by(5).collect();

    c.bench_function("intersect_sorted", |bench| {
        bench.iter(|| intersect(black_box(&a), black_box(&b)));
    });

    let shuffled_a: Vec<u32> = a.iter().rev().copied().collect();
    let shuffled_b: Vec<u32> = b.iter().rev().copied().collect();
    c.bench_function("sort_and_intersect", |bench| {
        bench.iter(|| {
            let mut a = shuffled_a.clone();
            let mut b = shuffled_b.clone();
            sort_and_intersect(black_box(&mut a), black_box(&mut b))
        });
    });
}

fn benchmark_build(c: &mut Criterion) {
    let params = GeneratorParams::new(200, 40, 10, 30);
    let Ok((infrastructure, timetable)) = generate_inputs(&params) else {
        return;
    };

    // Builder alone on fixed inputs
    c.bench_function("build_ordering_graph", |bench| {
        bench.iter(|| {
            build_ordering_graph(black_box(&infrastructure), black_box(&timetable), &BuildOptions::default())
        });
    });

    // Input generation plus build
    c.bench_function("generate_graph", |bench| {
        bench.iter(|| generate_graph(black_box(&params), &BuildOptions::default()));
    });
}

criterion_group!(benches, benchmark_intersection, benchmark_build);
criterion_main!(benches);
