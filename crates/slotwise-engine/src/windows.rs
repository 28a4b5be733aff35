//! Per-date resolution of open booking windows.
//!
//! The weekly pattern describes a normal week in the organizer's own
//! wall-clock time; date exceptions override it wholesale for single
//! dates. Resolution happens in local time first, then each window is
//! anchored to absolute instants through the organizer's zone.
//!
//! Windows never cross midnight: an entry whose end is not after its
//! start contributes nothing.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tz;

/// One weekly-pattern entry. A profile may carry several entries for the
/// same weekday; each available entry contributes its own window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    pub day_of_week: Weekday,
    pub is_available: bool,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// A single-date override. Any exception for a date replaces the weekly
/// pattern for that date entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityException {
    pub date: NaiveDate,
    pub is_available: bool,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

/// An open window in organizer wall-clock time, within a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// An open window anchored to absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Resolve the open wall-clock windows for one date.
///
/// Exceptions take precedence over the weekly pattern for their date:
/// - any unavailable exception closes the whole date;
/// - available exceptions with explicit times contribute those windows;
/// - an available exception without explicit times re-confirms the date
///   and falls back to the weekly pattern for that weekday.
///
/// Without exceptions, every available weekly entry matching the date's
/// weekday contributes a window. The result is sorted by start time, with
/// overlapping or touching windows coalesced and degenerate windows
/// (end not after start) dropped.
pub fn resolve_local_windows(
    date: NaiveDate,
    weekly: &[WeeklyAvailability],
    exceptions: &[AvailabilityException],
) -> Vec<LocalWindow> {
    let todays: Vec<&AvailabilityException> =
        exceptions.iter().filter(|e| e.date == date).collect();

    let windows = if todays.is_empty() {
        pattern_windows(date.weekday(), weekly)
    } else {
        if todays.iter().any(|e| !e.is_available) {
            return Vec::new();
        }
        let timed: Vec<LocalWindow> = todays
            .iter()
            .filter_map(|e| match (e.start_time, e.end_time) {
                (Some(start), Some(end)) => Some(LocalWindow { start, end }),
                _ => None,
            })
            .collect();
        if timed.is_empty() {
            // Re-confirmed without times: the weekly pattern stands.
            pattern_windows(date.weekday(), weekly)
        } else {
            timed
        }
    };

    coalesce(windows)
}

/// Resolve one date's windows and anchor them to instants through the
/// organizer's zone.
///
/// Window edges inside a DST gap shift forward per the gap policy; a
/// window whose edges collapse onto each other (or invert) under the
/// conversion is dropped.
pub fn resolve_open_windows(
    date: NaiveDate,
    weekly: &[WeeklyAvailability],
    exceptions: &[AvailabilityException],
    organizer_tz: Tz,
) -> Result<Vec<OpenWindow>> {
    let mut open = Vec::new();
    for window in resolve_local_windows(date, weekly, exceptions) {
        let start = tz::to_instant(date, window.start, organizer_tz)?;
        let end = tz::to_instant(date, window.end, organizer_tz)?;
        if start < end {
            open.push(OpenWindow { start, end });
        }
    }
    Ok(open)
}

/// The windows the weekly pattern yields for one weekday.
fn pattern_windows(weekday: Weekday, weekly: &[WeeklyAvailability]) -> Vec<LocalWindow> {
    weekly
        .iter()
        .filter(|w| w.day_of_week == weekday && w.is_available)
        .map(|w| LocalWindow {
            start: w.start_time,
            end: w.end_time,
        })
        .collect()
}

/// Sort windows and merge any that overlap or touch, dropping degenerate
/// ones. The slot generator relies on windows being disjoint.
fn coalesce(mut windows: Vec<LocalWindow>) -> Vec<LocalWindow> {
    windows.retain(|w| w.start < w.end);
    windows.sort_by_key(|w| (w.start, w.end));

    let mut merged: Vec<LocalWindow> = Vec::with_capacity(windows.len());
    for window in windows {
        if let Some(last) = merged.last_mut() {
            if window.start <= last.end {
                last.end = last.end.max(window.end);
                continue;
            }
        }
        merged.push(window);
    }
    merged
}
