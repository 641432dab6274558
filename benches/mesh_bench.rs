//! Build throughput for each display mode.
#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec3;
use molmesh::molecule::{Atom, Bond, Molecule};
use molmesh::options::Options;
use molmesh::representation::{MoleculeDisplay, RepresentationBuilder};

const ELEMENTS: [&str; 4] = ["N", "C", "C", "O"];

/// A helical chain of `count` atoms, each bonded to the next.
fn chain(count: usize) -> Molecule {
    let atoms = (0..count)
        .map(|i| {
            let t = i as f32 * 0.6;
            let element = ELEMENTS[i % ELEMENTS.len()];
            Atom::new(i as u32 + 1, element, element)
                .at(Vec3::new(2.3 * t.cos(), 0.25 * t, 2.3 * t.sin()))
        })
        .collect();
    let bonds = (1..count).map(|i| Bond::new(i - 1, i)).collect();
    Molecule::new(atoms, bonds)
}

fn build_benchmark(c: &mut Criterion) {
    let builder = match RepresentationBuilder::from_options(&Options::default()) {
        Ok(builder) => builder,
        Err(e) => panic!("default options are invalid: {e}"),
    };
    let mut group = c.benchmark_group("build");

    for count in [100, 1_000, 10_000] {
        let molecule = chain(count);
        for display in MoleculeDisplay::ALL {
            let _ = group.bench_function(format!("{display}/{count}_atoms"), |b| {
                b.iter(|| black_box(builder.build(display, black_box(&molecule))))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, build_benchmark);
criterion_main!(benches);
