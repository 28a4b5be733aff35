//! Orchestration of a full availability computation.
//!
//! Pulls the pipeline together for one request: validate config and
//! zones, merge busy sources once, resolve open windows per date,
//! generate slots, apply the advance-notice and horizon cutoffs, and
//! attach wall-clock labels for the organizer and the viewer.
//!
//! Everything here is pure. The clock is an explicit `now` argument, so
//! two calls with identical inputs return identical results.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::busy::{BusyInterval, BusySources, BusySpan, ExternalFetch};
use crate::config::SlotConfig;
use crate::error::{EngineError, Result};
use crate::slots::{self, Slot};
use crate::tz;
use crate::windows::{self, AvailabilityException, WeeklyAvailability};

/// A span in somebody's wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// One bookable slot, labeled for presentation.
///
/// `start` and `end` are the slot's identity; the wall-clock labels are
/// derived from them and carry no extra information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// The slot in the organizer's wall-clock time.
    pub organizer: LocalSpan,
    /// The slot in the requesting viewer's wall-clock time.
    pub viewer: LocalSpan,
}

/// Bookable slots for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<AvailableSlot>,
    /// True if an external calendar feed failed and busy data may be
    /// incomplete.
    pub degraded: bool,
}

/// What a month view records per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayEntry {
    /// Whether at least one bookable slot exists (summary mode).
    Open(bool),
    /// The full slot list (eager mode).
    Slots(Vec<AvailableSlot>),
}

impl DayEntry {
    /// Whether the date has at least one bookable slot.
    pub fn is_open(&self) -> bool {
        match self {
            DayEntry::Open(open) => *open,
            DayEntry::Slots(slots) => !slots.is_empty(),
        }
    }
}

/// Availability for every date of a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAvailability {
    pub year: i32,
    pub month: u32,
    /// One entry per date of the month, in order.
    pub days: BTreeMap<NaiveDate, DayEntry>,
    pub degraded: bool,
}

/// How much work a month computation does per date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthMode {
    /// Per-date booleans; stops at the first bookable slot of each date.
    #[default]
    Summary,
    /// Full slot lists per date.
    Eager,
}

/// An inclusive range of organizer-local dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Per-request data the engine consumes from the surrounding platform.
///
/// The engine owns no storage; profile patterns, exceptions, and busy
/// time all come from collaborating services. Implementations fetch per
/// profile and date range, and report external-calendar failures through
/// the `Err` side of [`ExternalFetch`] rather than panicking or hiding
/// them.
pub trait ScheduleSource {
    /// The profile's weekly recurring pattern.
    fn weekly_pattern(&self, profile_id: &str) -> Vec<WeeklyAvailability>;

    /// Date-specific overrides within `range`.
    fn exceptions(&self, profile_id: &str, range: DateRange) -> Vec<AvailabilityException>;

    /// Confirmed bookings from the platform's own store within `range`.
    fn internal_busy(&self, profile_id: &str, range: DateRange) -> Vec<BusyInterval>;

    /// One fetch outcome per connected external calendar, within `range`.
    fn external_busy(&self, profile_id: &str, range: DateRange) -> Vec<ExternalFetch>;
}

/// Compute the bookable slots for one date.
///
/// # Arguments
/// - `date` -- the date to compute, in the organizer's calendar
/// - `organizer_tz` -- IANA zone the pattern and exceptions are written in
/// - `viewer_tz` -- IANA zone the viewer wants labels in
/// - `weekly` -- the profile's weekly recurring pattern
/// - `exceptions` -- date-specific overrides
/// - `busy` -- busy intervals from every source, not yet merged
/// - `config` -- slot duration, buffer, and advance rules
/// - `now` -- the instant the request was made; cutoffs derive from it
///
/// The returned slots are ascending and non-overlapping, each labeled
/// with organizer and viewer wall-clock times. An empty pattern yields an
/// empty slot list, not an error. A failed external feed yields slots
/// computed from the remaining sources, with `degraded` set.
///
/// # Errors
/// Returns `EngineError::InvalidTimezone` if either zone is unknown, and
/// `EngineError::InvalidConfig` if the config fails validation. Both are
/// rejected before any slot work happens.
pub fn available_slots(
    date: NaiveDate,
    organizer_tz: &str,
    viewer_tz: &str,
    weekly: &[WeeklyAvailability],
    exceptions: &[AvailabilityException],
    busy: &BusySources,
    config: &SlotConfig,
    now: DateTime<Utc>,
) -> Result<DayAvailability> {
    config.validate()?;
    let organizer = tz::parse_zone(organizer_tz)?;
    let viewer = tz::parse_zone(viewer_tz)?;

    let (busy_spans, degraded) = busy.merged();
    let cutoffs = Cutoffs::compute(config, now);

    let slots = day_slots(
        date,
        weekly,
        exceptions,
        &busy_spans,
        config,
        organizer,
        viewer,
        &cutoffs,
    )?;
    Ok(DayAvailability {
        date,
        slots,
        degraded,
    })
}

/// Compute availability for every date of a calendar month.
///
/// Summary mode answers "which dates are worth clicking" with one boolean
/// per date, short-circuiting at the first bookable slot; eager mode
/// embeds the same slot lists [`available_slots`] would return. Dates
/// wholly before the advance-notice cutoff or past the booking horizon
/// are marked closed without resolving windows at all.
///
/// The map contains every date of the month, closed or not, so callers
/// can render a calendar grid directly.
///
/// # Errors
/// Returns `EngineError::InvalidConfig` if `(year, month)` is not a real
/// calendar month, plus everything [`available_slots`] rejects.
pub fn month_availability(
    year: i32,
    month: u32,
    organizer_tz: &str,
    viewer_tz: &str,
    weekly: &[WeeklyAvailability],
    exceptions: &[AvailabilityException],
    busy: &BusySources,
    config: &SlotConfig,
    mode: MonthMode,
    now: DateTime<Utc>,
) -> Result<MonthAvailability> {
    config.validate()?;
    let organizer = tz::parse_zone(organizer_tz)?;
    let viewer = tz::parse_zone(viewer_tz)?;
    let (first, last) = month_bounds(year, month)?;

    let (busy_spans, degraded) = busy.merged();
    let cutoffs = Cutoffs::compute(config, now);

    // Short-circuit bounds, as organizer-local dates. A date entirely
    // before the earliest cutoff or after the latest cannot contain a
    // bookable slot, because windows never cross midnight.
    let earliest_day = tz::to_local(cutoffs.earliest, organizer).date();
    let latest_day = tz::to_local(cutoffs.latest, organizer).date();

    let mut days = BTreeMap::new();
    for date in first.iter_days().take_while(|d| *d <= last) {
        if date < earliest_day || date > latest_day {
            days.insert(date, closed_entry(mode));
            continue;
        }
        let entry = match mode {
            MonthMode::Summary => {
                let open = windows::resolve_open_windows(date, weekly, exceptions, organizer)?;
                let first_hit = slots::first_slot_in_range(
                    &open,
                    &busy_spans,
                    config.duration_minutes,
                    config.buffer_minutes,
                    cutoffs.earliest,
                    cutoffs.latest,
                );
                DayEntry::Open(first_hit.is_some())
            }
            MonthMode::Eager => DayEntry::Slots(day_slots(
                date,
                weekly,
                exceptions,
                &busy_spans,
                config,
                organizer,
                viewer,
                &cutoffs,
            )?),
        };
        days.insert(date, entry);
    }

    Ok(MonthAvailability {
        year,
        month,
        days,
        degraded,
    })
}

/// [`available_slots`] driven by a [`ScheduleSource`].
///
/// Fetches the profile named by `config.profile_id` for the single-date
/// range, then delegates.
pub fn available_slots_from(
    source: &impl ScheduleSource,
    date: NaiveDate,
    organizer_tz: &str,
    viewer_tz: &str,
    config: &SlotConfig,
    now: DateTime<Utc>,
) -> Result<DayAvailability> {
    let range = DateRange { from: date, to: date };
    let weekly = source.weekly_pattern(&config.profile_id);
    let exceptions = source.exceptions(&config.profile_id, range);
    let busy = BusySources {
        internal: source.internal_busy(&config.profile_id, range),
        external: source.external_busy(&config.profile_id, range),
    };
    available_slots(
        date,
        organizer_tz,
        viewer_tz,
        &weekly,
        &exceptions,
        &busy,
        config,
        now,
    )
}

/// [`month_availability`] driven by a [`ScheduleSource`].
pub fn month_availability_from(
    source: &impl ScheduleSource,
    year: i32,
    month: u32,
    organizer_tz: &str,
    viewer_tz: &str,
    config: &SlotConfig,
    mode: MonthMode,
    now: DateTime<Utc>,
) -> Result<MonthAvailability> {
    let (from, to) = month_bounds(year, month)?;
    let range = DateRange { from, to };
    let weekly = source.weekly_pattern(&config.profile_id);
    let exceptions = source.exceptions(&config.profile_id, range);
    let busy = BusySources {
        internal: source.internal_busy(&config.profile_id, range),
        external: source.external_busy(&config.profile_id, range),
    };
    month_availability(
        year,
        month,
        organizer_tz,
        viewer_tz,
        &weekly,
        &exceptions,
        &busy,
        config,
        mode,
        now,
    )
}

/// The two instants that bound which slots may be offered, computed once
/// per request in UTC. Deriving them before any per-date work is what
/// keeps the advance-notice rule independent of every zone involved.
struct Cutoffs {
    earliest: DateTime<Utc>,
    latest: DateTime<Utc>,
}

impl Cutoffs {
    fn compute(config: &SlotConfig, now: DateTime<Utc>) -> Self {
        Cutoffs {
            earliest: now + Duration::hours(config.min_advance_hours as i64),
            latest: now + Duration::days(config.max_advance_days as i64),
        }
    }

    /// Whether a slot starting at `start` may be offered. Both bounds are
    /// inclusive.
    fn admits(&self, start: DateTime<Utc>) -> bool {
        start >= self.earliest && start <= self.latest
    }
}

/// Generate, filter, and label the slots for one date.
fn day_slots(
    date: NaiveDate,
    weekly: &[WeeklyAvailability],
    exceptions: &[AvailabilityException],
    busy_spans: &[BusySpan],
    config: &SlotConfig,
    organizer: Tz,
    viewer: Tz,
    cutoffs: &Cutoffs,
) -> Result<Vec<AvailableSlot>> {
    let open = windows::resolve_open_windows(date, weekly, exceptions, organizer)?;
    let raw = slots::generate_slots(
        &open,
        busy_spans,
        config.duration_minutes,
        config.buffer_minutes,
    );
    Ok(raw
        .into_iter()
        .filter(|slot| cutoffs.admits(slot.start))
        .map(|slot| label_slot(slot, organizer, viewer))
        .collect())
}

/// Attach organizer and viewer wall-clock labels to a slot.
fn label_slot(slot: Slot, organizer: Tz, viewer: Tz) -> AvailableSlot {
    AvailableSlot {
        start: slot.start,
        end: slot.end,
        organizer: LocalSpan {
            start: tz::to_local(slot.start, organizer),
            end: tz::to_local(slot.end, organizer),
        },
        viewer: LocalSpan {
            start: tz::to_local(slot.start, viewer),
            end: tz::to_local(slot.end, viewer),
        },
    }
}

/// First and last date of a calendar month.
fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let bad_month =
        || EngineError::InvalidConfig(format!("no such month: {}-{:02}", year, month));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(bad_month)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(bad_month)?;
    Ok((first, last))
}

fn closed_entry(mode: MonthMode) -> DayEntry {
    match mode {
        MonthMode::Summary => DayEntry::Open(false),
        MonthMode::Eager => DayEntry::Slots(Vec::new()),
    }
}
