//! Timezone conversion between wall-clock times and absolute instants.
//!
//! Wraps `chrono-tz` (the compiled-in IANA database) and pins down the two
//! DST edge cases explicitly instead of inheriting library defaults:
//!
//! - **Gap** (spring forward; the wall-clock time does not exist): shift
//!   forward to the first valid local time at or after the requested one.
//! - **Overlap** (fall back; the wall-clock time occurs twice): resolve to
//!   the chronologically earlier instant, always.
//!
//! Both conversions are pure functions of the compiled timezone tables, so
//! the same inputs produce the same instants on every call.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};

/// Widest DST gap the forward probe will cross, in minutes. Real gaps run
/// from 30 minutes to 2 hours; the bound exists so the probe terminates.
const MAX_GAP_PROBE_MINUTES: i64 = 24 * 60;

/// Parse an IANA timezone identifier (e.g., "America/New_York").
///
/// # Errors
/// Returns `EngineError::InvalidTimezone` if the identifier is unknown.
pub fn parse_zone(id: &str) -> Result<Tz> {
    id.parse()
        .map_err(|_| EngineError::InvalidTimezone(id.to_string()))
}

/// Convert a wall-clock date and time in `tz` to the instant it denotes.
///
/// A time inside a DST gap shifts forward (minute granularity) to the first
/// wall-clock time that exists. A time inside a DST overlap resolves to the
/// earlier of the two instants, so repeated calls agree.
///
/// # Errors
/// Returns `EngineError::UnresolvableLocalTime` if no valid local time
/// exists within 24 hours of the request. No IANA zone can trigger this.
pub fn to_instant(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<DateTime<Utc>> {
    resolve_local(date.and_time(time), tz)
}

/// Convert an instant to its wall-clock representation in `tz`.
///
/// Total: every instant has exactly one local representation, even during
/// DST transitions.
pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

/// Map a naive local datetime into `tz`, applying the gap and overlap
/// policies.
fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>> {
    for offset in 0..=MAX_GAP_PROBE_MINUTES {
        let candidate = match naive.checked_add_signed(Duration::minutes(offset)) {
            Some(c) => c,
            None => break,
        };
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return Ok(dt.with_timezone(&Utc)),
            // Fall-back repeats this wall-clock time; the earlier instant wins.
            LocalResult::Ambiguous(earlier, _later) => return Ok(earlier.with_timezone(&Utc)),
            // Inside a spring-forward gap; keep probing forward.
            LocalResult::None => continue,
        }
    }
    Err(EngineError::UnresolvableLocalTime(
        naive.to_string(),
        tz.to_string(),
    ))
}
