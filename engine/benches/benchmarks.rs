//! Performance benchmarks for quotesync-engine

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quotesync_engine::{merge_remote, normalize_remote, QuoteRecord, Store};
use serde_json::json;

fn collection(prefix: &str, count: usize) -> Vec<QuoteRecord> {
    (0..count)
        .map(|i| {
            QuoteRecord::new(
                format!("{prefix}{i}"),
                format!("Quote number {i}"),
                format!("category-{}", i % 10),
                Utc::now(),
            )
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [100usize, 1_000] {
        // Half the snapshot overlaps local ids with changed text, half is new.
        let local = collection("s-", size);
        let mut remote: Vec<QuoteRecord> = local
            .iter()
            .take(size / 2)
            .map(|q| {
                QuoteRecord::new(
                    q.id.clone().unwrap_or_default(),
                    format!("{} (revised)", q.text),
                    q.category.clone(),
                    Utc::now(),
                )
            })
            .collect();
        remote.extend(collection("s-new-", size / 2));

        group.bench_with_input(BenchmarkId::new("merge_remote", size), &size, |b, _| {
            b.iter(|| merge_remote(black_box(&local), black_box(&remote), Utc::now()))
        });
    }

    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    group.bench_function("add", |b| {
        let mut store = Store::new();
        b.iter(|| store.add(black_box("A quote"), black_box("Category")))
    });

    group.bench_function("import_merge_1000", |b| {
        let batch: Vec<QuoteRecord> = (0..1_000)
            .map(|i| QuoteRecord::bare(format!("Imported {i}"), "Imported"))
            .collect();
        b.iter(|| {
            let mut store = Store::with_records(collection("s-", 1_000));
            store.import_merge(black_box(batch.clone()))
        })
    });

    group.bench_function("to_json_1000", |b| {
        let store = Store::with_records(collection("s-", 1_000));
        b.iter(|| store.to_json())
    });

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let items: Vec<serde_json::Value> = (0..1_000)
        .map(|i| {
            if i % 2 == 0 {
                json!({"id": i, "title": format!("Post {i}"), "body": "b", "userId": i % 7})
            } else {
                json!({"id": format!("s-{i}"), "text": format!("Quote {i}"), "category": "Server"})
            }
        })
        .collect();

    c.bench_function("normalize_remote_1000", |b| {
        b.iter(|| normalize_remote(black_box(items.clone()), Utc::now()))
    });
}

criterion_group!(benches, bench_merge, bench_store, bench_normalize);
criterion_main!(benches);
