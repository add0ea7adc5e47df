//! Benchmarks for weave operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use knotwork::algo::remesh::medial;
use knotwork::algo::strand::{analyze_strands, trace_strands, StrandEvent};
use knotwork::algo::twist::{medial_twists, plain_twists, twill_twists};
use knotwork::mesh::shapes;
use knotwork::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn torus() -> HalfEdgeMesh {
    shapes::quad_torus(48, 24).unwrap()
}

fn bench_mesh_construction(c: &mut Criterion) {
    c.bench_function("build_quad_torus_48x24", |b| {
        b.iter(|| {
            let mesh: HalfEdgeMesh = shapes::quad_torus(48, 24).unwrap();
            mesh
        });
    });
}

fn bench_twists(c: &mut Criterion) {
    let mesh = torus();

    c.bench_function("plain_twists", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(0);
            plain_twists(black_box(&mesh), 0.5, &mut rng).unwrap()
        });
    });

    c.bench_function("twill_twists", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(0);
            twill_twists(black_box(&mesh), &mut rng).unwrap()
        });
    });

    c.bench_function("medial_twists", |b| {
        b.iter(|| {
            let medial = medial(black_box(&mesh)).unwrap();
            medial_twists(&medial)
        });
    });
}

fn bench_trace(c: &mut Criterion) {
    let mesh = torus();
    let twists = twill_twists(&mesh, &mut StdRng::seed_from_u64(0)).unwrap();

    c.bench_function("trace_strands", |b| {
        b.iter(|| {
            let mut events: Vec<StrandEvent> = Vec::new();
            trace_strands(black_box(&mesh), &twists, &mut events).unwrap()
        });
    });

    c.bench_function("analyze_strands", |b| {
        b.iter(|| {
            let analyzer = analyze_strands(black_box(&mesh), &twists).unwrap();
            analyzer.num_braids()
        });
    });
}

criterion_group!(benches, bench_mesh_construction, bench_twists, bench_trace);
criterion_main!(benches);
