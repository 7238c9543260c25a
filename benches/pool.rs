use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use varpool::{VariablePool, VariableType};

fn benchmark_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [16, 1024, 65536] {
        let pool = VariablePool::new();
        let names = (0..size).map(|i| format!("v{}", i)).collect::<Vec<_>>();
        for name in &names {
            pool.get_or_create(name, VariableType::Real).unwrap();
        }

        group.throughput(Throughput::Elements(1));
        group.bench_function(BenchmarkId::new("get_or_create_hit", size), |b| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % names.len();
                pool.get_or_create(black_box(&names[i]), VariableType::Real).unwrap()
            })
        });
        group.bench_function(BenchmarkId::new("find_by_name_miss", size), |b| {
            b.iter(|| pool.find_by_name(black_box("absent")))
        });
    }

    group.finish();
}

fn benchmark_minting(c: &mut Criterion) {
    let mut group = c.benchmark_group("mint");

    group.bench_function("create_fresh", |b| {
        let pool = VariablePool::new();
        b.iter(|| pool.create_fresh(black_box(VariableType::Int)))
    });

    group.bench_function("create_fresh_named", |b| {
        let pool = VariablePool::new();
        b.iter(|| pool.create_fresh_named(black_box("x"), VariableType::Int).unwrap())
    });

    group.bench_function("get_or_create_miss", |b| {
        let pool = VariablePool::new();
        let mut i: u64 = 0;
        b.iter(|| {
            i += 1;
            pool.get_or_create(&format!("m{}", i), VariableType::Bool).unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_lookups, benchmark_minting);
criterion_main!(benches);
