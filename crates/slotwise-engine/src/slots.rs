//! Slot generation over absolute-instant windows.
//!
//! All slot arithmetic happens in instant space. That is what makes the
//! result independent of the timezone a viewer asks in: wall clocks are
//! attached to slots afterwards, never consulted here.

use chrono::{DateTime, Duration, Utc};

use crate::busy::BusySpan;
use crate::windows::OpenWindow;

/// A bookable slot. `end - start` always equals the configured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Generate every bookable slot for a set of open windows.
///
/// Within each window a cursor packs duration-sized slots back to back
/// starting at the window start. A candidate colliding with any
/// buffer-expanded busy span is rejected and the cursor re-anchors at the
/// end of the blocking span plus buffer. The collision test is
/// `candidate.start < busy.end + buffer && candidate.end > busy.start - buffer`,
/// so a slot may sit flush against busy time when the buffer is zero.
///
/// `windows` must be ascending and disjoint (as produced by
/// [`crate::windows::resolve_open_windows`]) and `busy` merged (as
/// produced by [`crate::busy::merge_busy`]). The output is then ascending
/// with no two slots overlapping.
pub fn generate_slots(
    windows: &[OpenWindow],
    busy: &[BusySpan],
    duration_minutes: u32,
    buffer_minutes: u32,
) -> Vec<Slot> {
    let mut slots = Vec::new();
    each_slot(windows, busy, duration_minutes, buffer_minutes, |slot| {
        slots.push(slot);
        true
    });
    slots
}

/// Find the first slot whose start lies within `[earliest, latest]`.
///
/// Walks the same slot sequence as [`generate_slots`], so a month summary
/// built on this agrees with the day view slot for slot, but stops at the
/// first hit and gives up once the walk passes `latest`.
pub fn first_slot_in_range(
    windows: &[OpenWindow],
    busy: &[BusySpan],
    duration_minutes: u32,
    buffer_minutes: u32,
    earliest: DateTime<Utc>,
    latest: DateTime<Utc>,
) -> Option<Slot> {
    let mut found = None;
    each_slot(windows, busy, duration_minutes, buffer_minutes, |slot| {
        if slot.start > latest {
            return false;
        }
        if slot.start >= earliest {
            found = Some(slot);
            return false;
        }
        true
    });
    found
}

/// Walk accepted slots in chronological order, feeding each to `visit`.
/// `visit` returns false to stop the walk early.
fn each_slot(
    windows: &[OpenWindow],
    busy: &[BusySpan],
    duration_minutes: u32,
    buffer_minutes: u32,
    mut visit: impl FnMut(Slot) -> bool,
) {
    // A zero-length slot would pin the cursor in place; nothing to walk.
    if duration_minutes == 0 {
        return;
    }
    let duration = Duration::minutes(duration_minutes as i64);
    let buffer = Duration::minutes(buffer_minutes as i64);

    for window in windows {
        let mut cursor = window.start;
        while cursor + duration <= window.end {
            let candidate = Slot {
                start: cursor,
                end: cursor + duration,
            };
            match blocking_span(candidate, busy, buffer) {
                None => {
                    if !visit(candidate) {
                        return;
                    }
                    cursor += duration;
                }
                // Re-anchor past the blocking span. The collision test
                // guarantees cursor < span.end + buffer, so this advances.
                Some(span) => cursor = span.end + buffer,
            }
        }
    }
}

/// The first merged span the buffer-expanded candidate collides with.
fn blocking_span(candidate: Slot, busy: &[BusySpan], buffer: Duration) -> Option<BusySpan> {
    busy.iter()
        .copied()
        .find(|b| candidate.start < b.end + buffer && candidate.end > b.start - buffer)
}
