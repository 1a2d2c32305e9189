use core::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use sequin::{
    OrderCodeGenerator, SerialGenerator, SnowflakeConfig, SnowflakeGenerator, UlidGenerator,
};

const TOTAL_IDS: usize = 4096;

fn bench_snowflake(c: &mut Criterion) {
    let mut group = c.benchmark_group("snowflake");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let generator = SnowflakeGenerator::with_system_clock(SnowflakeConfig::default()).unwrap();
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next().unwrap());
            }
        })
    });
    group.finish();
}

fn bench_ulid(c: &mut Criterion) {
    let mut group = c.benchmark_group("ulid");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));
    group.bench_function(format!("monotonic/elems/{TOTAL_IDS}"), |b| {
        let generator = UlidGenerator::monotonic();
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_ulid());
            }
        })
    });
    group.bench_function(format!("secure/elems/{TOTAL_IDS}"), |b| {
        let generator = UlidGenerator::secure(true);
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_ulid());
            }
        })
    });
    group.finish();
}

fn bench_order_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_code");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let inner = SnowflakeGenerator::with_system_clock(SnowflakeConfig::default()).unwrap();
        let generator = OrderCodeGenerator::new(inner);
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_string().unwrap());
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_snowflake, bench_ulid, bench_order_code);
criterion_main!(benches);
