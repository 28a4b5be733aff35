//! Tests for slot generation: packing, buffers, and range queries.
//!
//! All scenarios run directly in instant space on one UTC date; the
//! timezone-sensitive paths are covered by the window and engine tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use slotwise_engine::busy::BusySpan;
use slotwise_engine::slots::{first_slot_in_range, generate_slots};
use slotwise_engine::windows::OpenWindow;

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn window(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> OpenWindow {
    OpenWindow {
        start: at(start_hour, start_min),
        end: at(end_hour, end_min),
    }
}

fn busy(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> BusySpan {
    BusySpan {
        start: at(start_hour, start_min),
        end: at(end_hour, end_min),
    }
}

#[test]
fn free_day_fills_the_grid() {
    // 09:00-17:00 with 30-minute slots: 16 slots, 09:00 through 16:30.
    let slots = generate_slots(&[window(9, 0, 17, 0)], &[], 30, 0);

    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0].start, at(9, 0));
    assert_eq!(slots[1].start, at(9, 30));
    assert_eq!(slots[15].start, at(16, 30));
    assert_eq!(slots[15].end, at(17, 0));
}

#[test]
fn every_slot_has_exact_duration() {
    let slots = generate_slots(&[window(9, 0, 17, 0)], &[busy(10, 0, 11, 0)], 45, 10);

    assert!(!slots.is_empty());
    for slot in &slots {
        assert_eq!(slot.end - slot.start, Duration::minutes(45));
    }
}

#[test]
fn busy_block_reanchors_the_grid() {
    // 09:00-17:00, 30-minute slots, 15-minute buffer, busy 10:00-11:00.
    // 09:00 fits; 09:30 would end at 10:00 which is inside the buffered
    // block, so the cursor resumes at 11:15 and packs from there.
    let slots = generate_slots(&[window(9, 0, 17, 0)], &[busy(10, 0, 11, 0)], 30, 15);

    let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();
    assert_eq!(starts[0], at(9, 0));
    assert_eq!(starts[1], at(11, 15));
    assert_eq!(starts[2], at(11, 45));
    assert_eq!(*starts.last().unwrap(), at(16, 15));
    assert_eq!(slots.len(), 12);
}

#[test]
fn zero_buffer_allows_flush_slots() {
    // With no buffer a slot may end exactly where busy time starts and
    // the next may start exactly where it ends.
    let slots = generate_slots(&[window(9, 0, 17, 0)], &[busy(10, 0, 11, 0)], 30, 0);

    let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();
    assert!(starts.contains(&at(9, 30)), "slot ending at busy start must fit");
    assert!(starts.contains(&at(11, 0)), "slot starting at busy end must fit");
    assert!(!starts.contains(&at(10, 0)));
    assert!(!starts.contains(&at(10, 30)));
}

#[test]
fn buffer_reaches_across_window_edge() {
    // Busy time just before the window pushes the first slot to 09:15.
    let slots = generate_slots(&[window(9, 0, 17, 0)], &[busy(8, 0, 9, 0)], 30, 15);

    assert_eq!(slots[0].start, at(9, 15));
}

#[test]
fn window_shorter_than_duration_yields_nothing() {
    let slots = generate_slots(&[window(9, 0, 9, 20)], &[], 30, 0);

    assert!(slots.is_empty());
}

#[test]
fn exact_fit_yields_single_slot() {
    let slots = generate_slots(&[window(9, 0, 9, 30)], &[], 30, 0);

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start, at(9, 0));
    assert_eq!(slots[0].end, at(9, 30));
}

#[test]
fn busy_covering_window_yields_nothing() {
    let slots = generate_slots(&[window(9, 0, 17, 0)], &[busy(8, 0, 18, 0)], 30, 0);

    assert!(slots.is_empty());
}

#[test]
fn multiple_windows_pack_independently() {
    let windows = [window(9, 0, 10, 0), window(13, 0, 14, 0)];
    let slots = generate_slots(&windows, &[], 45, 0);

    // 45-minute slots: one per window, each anchored at its window start.
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start, at(9, 0));
    assert_eq!(slots[1].start, at(13, 0));
}

#[test]
fn output_is_sorted_and_disjoint() {
    let windows = [window(9, 0, 12, 0), window(13, 0, 17, 0)];
    let busy = [busy(9, 40, 10, 5), busy(14, 0, 14, 10)];
    let slots = generate_slots(&windows, &busy, 25, 5);

    for pair in slots.windows(2) {
        assert!(pair[0].end <= pair[1].start, "slots must not overlap");
    }
}

#[test]
fn short_busy_block_shifts_grid_minimally() {
    // A 5-minute interruption at 09:05 re-anchors the grid at 09:10
    // rather than discarding the rest of the hour.
    let slots = generate_slots(&[window(9, 0, 17, 0)], &[busy(9, 5, 9, 10)], 30, 0);

    assert_eq!(slots[0].start, at(9, 10));
}

#[test]
fn first_slot_skips_until_earliest() {
    // Grid runs 09:00, 09:30, ... With earliest=12:10 the first
    // admissible start is 12:30 (12:00 is too early).
    let found = first_slot_in_range(&[window(9, 0, 17, 0)], &[], 30, 0, at(12, 10), at(23, 0));

    assert_eq!(found.unwrap().start, at(12, 30));
}

#[test]
fn first_slot_respects_latest() {
    let found = first_slot_in_range(&[window(9, 0, 17, 0)], &[], 30, 0, at(16, 45), at(23, 0));
    assert!(found.is_none(), "grid ends at 16:30; nothing admissible after 16:45");

    let found = first_slot_in_range(&[window(9, 0, 17, 0)], &[], 30, 0, at(0, 0), at(8, 0));
    assert!(found.is_none(), "every slot starts after latest");
}

#[test]
fn first_slot_agrees_with_full_generation() {
    let windows = [window(9, 0, 17, 0)];
    let busy = [busy(10, 0, 11, 0)];
    let all = generate_slots(&windows, &busy, 30, 15);
    let found = first_slot_in_range(&windows, &busy, 30, 15, at(9, 30), at(23, 0));

    let expected = all.iter().find(|s| s.start >= at(9, 30)).copied();
    assert_eq!(found, expected);
}

#[test]
fn zero_duration_generates_nothing() {
    let slots = generate_slots(&[window(9, 0, 17, 0)], &[], 0, 0);

    assert!(slots.is_empty());
}
