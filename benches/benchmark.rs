use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tabsift::execute::execute;
use tabsift::resolve::resolve;
use tabsift::store::{LoadOptions, TabularStore};

fn synthetic_store(rows: usize) -> TabularStore {
    let mut csv = String::from("city,price\n");
    for i in 0..rows {
        csv.push_str(&format!("city{},{}\n", i % 17, i));
    }
    let mut store = TabularStore::new();
    store
        .load(csv.as_bytes(), "bench.csv", &LoadOptions::default())
        .unwrap();
    store
}

fn bench_resolution(c: &mut Criterion) {
    c.bench_function("resolve filter shape", |b| {
        b.iter(|| resolve(black_box("filter price > 5000 and show top 10")))
    });
    c.bench_function("resolve unrecognized text", |b| {
        b.iter(|| resolve(black_box("tell me something interesting about this data")))
    });
}

fn bench_execution(c: &mut Criterion) {
    let store = synthetic_store(10_000);
    let dataset = store.dataset().unwrap();
    c.bench_function("filter 10k rows top 10", |b| {
        b.iter(|| {
            let query = resolve("filter price > 5000 and show top 10").unwrap();
            execute(black_box(query), dataset).unwrap()
        })
    });
    c.bench_function("mean over 10k rows", |b| {
        b.iter(|| {
            let query = resolve("average of price").unwrap();
            execute(black_box(query), dataset).unwrap()
        })
    });
    c.bench_function("unique values over 10k rows", |b| {
        b.iter(|| {
            let query = resolve("unique values of city").unwrap();
            execute(black_box(query), dataset).unwrap()
        })
    });
}

criterion_group!(benches, bench_resolution, bench_execution);
criterion_main!(benches);
