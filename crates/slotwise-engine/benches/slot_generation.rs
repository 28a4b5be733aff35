//! Criterion benchmarks for the hot path: merging busy intervals and
//! packing slots across a dense day.

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use slotwise_engine::busy::{merge_busy, BusyInterval, BusySource};
use slotwise_engine::slots::generate_slots;
use slotwise_engine::windows::OpenWindow;

/// Two dozen 20-minute meetings scattered over a 12-hour window.
fn dense_day() -> (OpenWindow, Vec<BusyInterval>) {
    let midnight = Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap();
    let window = OpenWindow {
        start: midnight + Duration::hours(8),
        end: midnight + Duration::hours(20),
    };
    let intervals = (0..24i64)
        .map(|i| BusyInterval {
            start: midnight + Duration::minutes(8 * 60 + i * 29),
            end: midnight + Duration::minutes(8 * 60 + i * 29 + 20),
            source: if i % 2 == 0 {
                BusySource::InternalBooking
            } else {
                BusySource::ExternalCalendar
            },
            origin_id: format!("evt_{}", i),
        })
        .collect();
    (window, intervals)
}

fn bench_merge_busy(c: &mut Criterion) {
    let (_, intervals) = dense_day();
    c.bench_function("merge_busy/24_intervals", |b| {
        b.iter(|| merge_busy(black_box(&intervals)))
    });
}

fn bench_generate_slots(c: &mut Criterion) {
    let (window, intervals) = dense_day();
    let merged = merge_busy(&intervals);
    let windows = [window];
    c.bench_function("generate_slots/dense_day", |b| {
        b.iter(|| generate_slots(black_box(&windows), black_box(&merged), 30, 10))
    });
}

fn bench_free_day(c: &mut Criterion) {
    let (window, _) = dense_day();
    let windows = [window];
    c.bench_function("generate_slots/free_day", |b| {
        b.iter(|| generate_slots(black_box(&windows), black_box(&[]), 15, 0))
    });
}

criterion_group!(benches, bench_merge_busy, bench_generate_slots, bench_free_day);
criterion_main!(benches);
