//! Busy-interval aggregation across heterogeneous sources.
//!
//! Confirmed bookings and externally synced calendar events arrive as
//! separate unordered lists. The aggregator flattens them into one
//! ascending, non-overlapping set of spans; source metadata matters for
//! diagnostics but not for slot math, so it is dropped at the merge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Where a busy interval came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusySource {
    InternalBooking,
    ExternalCalendar,
}

/// One busy interval in absolute time, with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub source: BusySource,
    /// Identifier in the source system (booking id, external event id).
    pub origin_id: String,
}

/// A merged busy span. Within a merged list, no two spans overlap or touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusySpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Merge unordered busy intervals into an ascending, non-overlapping list.
///
/// Sorts by start time (then end time for stability), then sweeps left to
/// right, folding every interval that starts at or before the current
/// span's end into it. Adjacent intervals merge too: back-to-back meetings
/// form one block, and a gap survives only if it has positive width.
/// Empty and inverted intervals are discarded.
pub fn merge_busy(intervals: &[BusyInterval]) -> Vec<BusySpan> {
    let mut spans: Vec<BusySpan> = intervals
        .iter()
        .filter(|b| b.start < b.end)
        .map(|b| BusySpan {
            start: b.start,
            end: b.end,
        })
        .collect();
    spans.sort_by_key(|s| (s.start, s.end));

    let mut merged: Vec<BusySpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if let Some(last) = merged.last_mut() {
            if span.start <= last.end {
                last.end = last.end.max(span.end);
                continue;
            }
        }
        merged.push(span);
    }
    merged
}

/// Outcome of fetching one connected external calendar.
pub type ExternalFetch = std::result::Result<Vec<BusyInterval>, FetchError>;

/// Everything one request knows about busy time, before merging.
///
/// Internal bookings come from the platform's own store and are assumed
/// complete. Each external feed carries its own fetch outcome: a failed
/// feed contributes nothing and flips the degraded flag, so callers can
/// warn that the computed availability may be optimistic.
#[derive(Debug, Clone, Default)]
pub struct BusySources {
    pub internal: Vec<BusyInterval>,
    pub external: Vec<ExternalFetch>,
}

impl BusySources {
    /// Merge every source into a single span list.
    ///
    /// Returns the merged spans and whether any external feed had failed.
    pub fn merged(&self) -> (Vec<BusySpan>, bool) {
        let mut all = self.internal.clone();
        let mut degraded = false;
        for feed in &self.external {
            match feed {
                Ok(intervals) => all.extend(intervals.iter().cloned()),
                Err(_) => degraded = true,
            }
        }
        (merge_busy(&all), degraded)
    }
}
