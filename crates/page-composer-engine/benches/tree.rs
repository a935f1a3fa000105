use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use page_composer_engine::blocks::{Breakpoint, EngineOptions, Registry};
use page_composer_engine::editing::{Document, MoveSource, Session, format_outline};
use page_composer_engine::Properties;
use serde_json::json;
mod common;

fn bench_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("moves");
    group.sample_size(20);

    let (mut doc, landmarks) = common::generate_page(200);
    let first = landmarks.headings[0].clone();
    let last_grid = landmarks.grids[landmarks.grids.len() - 1].clone();
    let far_cell = doc.slots(last_grid.as_str())[3].id.to_string();
    let home_cell = doc.slots(landmarks.grids[0].as_str())[0].id.to_string();

    group.bench_function("move_across_page", |b| {
        b.iter(|| {
            doc.move_block(MoveSource::Existing(first.clone()), black_box(&far_cell), None)
                .unwrap();
            doc.move_block(MoveSource::Existing(first.clone()), black_box(&home_cell), Some(0))
                .unwrap();
        });
    });

    let outer = landmarks.grids[0].clone();
    group.bench_function("rejected_cycle", |b| {
        b.iter(|| {
            let err = doc
                .move_block(MoveSource::Existing(outer.clone()), black_box(&home_cell), None)
                .unwrap_err();
            black_box(err);
        });
    });

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    group.sample_size(20);

    let (mut doc, landmarks) = common::generate_page(200);
    let grid = landmarks.grids[100].clone();

    group.bench_function("grow_then_shrink", |b| {
        b.iter(|| {
            for count in [6, 4] {
                let patch = doc
                    .update_properties(
                        grid.as_str(),
                        Properties::from([("cellCount".to_string(), json!(count))]),
                    )
                    .unwrap();
                black_box(patch);
            }
        });
    });

    group.bench_function("steady_state", |b| {
        b.iter(|| {
            let patch = doc.reconcile(black_box(grid.as_str())).unwrap();
            black_box(patch);
        });
    });

    group.finish();
}

fn bench_read_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_paths");
    group.sample_size(20);

    let (doc, _) = common::generate_page(200);
    let session = Session::new();
    let json = doc.to_json().unwrap();

    group.bench_function("render", |b| {
        b.iter(|| black_box(doc.render(&session, Breakpoint::Mobile)));
    });

    group.bench_function("outline", |b| {
        b.iter(|| black_box(format_outline(&doc)));
    });

    group.bench_function("load", |b| {
        let registry = Arc::new(Registry::builtin());
        b.iter(|| {
            let loaded =
                Document::from_json(black_box(&json), registry.clone(), EngineOptions::default())
                    .unwrap();
            black_box(loaded);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_moves, bench_reconcile, bench_read_paths);
criterion_main!(benches);
