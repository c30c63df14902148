//! Criterion micro-benchmarks for value tree construction, navigation and text round trips.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_bench::{actor_scene, deep_path, deep_tree};
use strata_test_utils::MiniJson;
use strata_tree::Document;

fn bench_build(c: &mut Criterion) {
    c.bench_function("tree_build_depth32_width16", |b| {
        b.iter(|| {
            let doc = deep_tree(black_box(32), black_box(16));
            black_box(doc.node_count());
        });
    });
}

fn bench_navigate(c: &mut Criterion) {
    let doc = deep_tree(32, 16);
    let path = deep_path(32);
    c.bench_function("tree_navigate_depth32", |b| {
        b.iter(|| {
            let mut node = doc.root();
            for key in &path {
                node = node.key(key);
            }
            black_box(node.key("k7").get::<i64>().ok());
        });
    });
}

fn bench_missing_path(c: &mut Criterion) {
    let doc = deep_tree(8, 4);
    c.bench_function("tree_navigate_missing", |b| {
        b.iter(|| {
            let node = doc.root().key("child").key("absent").key("deeper").at(3);
            black_box(node.is_empty());
        });
    });
}

fn bench_clone_compare(c: &mut Criterion) {
    let doc = actor_scene(256);
    c.bench_function("tree_clone_eq_256_objects", |b| {
        b.iter(|| {
            let copy: Document = doc.clone();
            black_box(copy == doc);
        });
    });
}

fn bench_json(c: &mut Criterion) {
    let doc = actor_scene(256);
    let text = MiniJson::render(&doc).unwrap();
    c.bench_function("json_render_256_objects", |b| {
        b.iter(|| {
            black_box(MiniJson::render(black_box(&doc)).unwrap());
        });
    });
    c.bench_function("json_parse_256_objects", |b| {
        b.iter(|| {
            black_box(MiniJson::parse(black_box(&text)).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_navigate,
    bench_missing_path,
    bench_clone_compare,
    bench_json
);
criterion_main!(benches);
