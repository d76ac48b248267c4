//! Performance benchmarks for the tip engine.
//!
//! Covers the full pipeline on a small and a large roster, plus the refine
//! stage on its own.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use tip_engine::calculation::{TipRun, allocate_tips, refine_drawer};
use tip_engine::models::{CashDrawer, Period, Recipient, Roster};

fn period() -> Period {
    Period {
        start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 1, 18).unwrap(),
    }
}

/// A roster with `size` recipients and varied hours.
fn create_roster(size: usize) -> Roster {
    let recipients = (0..size)
        .map(|i| {
            let hundredths = 400 + (i as i64 * 1237) % 3600;
            Recipient::new(format!("staff_{:03}", i + 1), Decimal::new(hundredths, 2))
        })
        .collect();
    Roster::new(recipients).expect("Failed to create roster")
}

/// A busy two-week drawer.
fn create_drawer() -> CashDrawer {
    CashDrawer::new([14, 9, 23, 17, 41, 126, 88, 63])
}

/// Benchmark: full tip run for a typical shift roster.
fn bench_full_run(c: &mut Criterion) {
    let drawer = create_drawer();
    let roster = create_roster(8);

    c.bench_function("full_run_8_recipients", |b| {
        b.iter(|| {
            let report = TipRun::new(black_box(drawer), roster.clone(), period())
                .execute()
                .unwrap();
            black_box(report)
        })
    });
}

/// Benchmark: full tip run as the roster grows.
fn bench_roster_sizes(c: &mut Criterion) {
    let drawer = create_drawer();
    let mut group = c.benchmark_group("roster_size");

    for size in [4usize, 16, 64] {
        let roster = create_roster(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &roster, |b, roster| {
            b.iter(|| {
                let report = TipRun::new(drawer, roster.clone(), period())
                    .execute()
                    .unwrap();
                black_box(report)
            })
        });
    }

    group.finish();
}

/// Benchmark: refine stage alone.
fn bench_refine(c: &mut Criterion) {
    let drawer = create_drawer();
    let roster = create_roster(16);
    let shares = allocate_tips(drawer.total(), &roster, 1).unwrap().shares;

    c.bench_function("refine_16_recipients", |b| {
        b.iter(|| black_box(refine_drawer(black_box(drawer), &shares, 2)))
    });
}

criterion_group!(benches, bench_full_run, bench_roster_sizes, bench_refine);
criterion_main!(benches);
