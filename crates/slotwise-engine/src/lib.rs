//! # slotwise-engine
//!
//! Timezone-invariant availability calculation for appointment scheduling.
//!
//! Organizers publish a weekly working-hours pattern and date exceptions in
//! their own timezone; attendees browse bookable slots in theirs. This
//! crate computes those slots from the pattern, the exceptions, and busy
//! intervals gathered from bookings and external calendars. The set of
//! instants offered is identical whatever timezone the request asks in;
//! zones only change the wall-clock labels attached to each slot.
//!
//! ## Modules
//!
//! - [`tz`] — wall-clock ↔ instant conversion with pinned DST policies
//! - [`busy`] — merging busy intervals from bookings and external calendars
//! - [`windows`] — weekly pattern + exceptions → per-date open windows
//! - [`slots`] — packing duration-sized slots around busy time
//! - [`config`] — slot duration, buffer, advance-notice, and horizon rules
//! - [`engine`] — the orchestrating entry points
//! - [`error`] — error types
//!
//! ## Example
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
//! use slotwise_engine::{available_slots, BusySources, SlotConfig, WeeklyAvailability};
//!
//! let weekly: Vec<WeeklyAvailability> = [Weekday::Mon, Weekday::Tue, Weekday::Wed]
//!     .into_iter()
//!     .map(|day| WeeklyAvailability {
//!         day_of_week: day,
//!         is_available: true,
//!         start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
//!         end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
//!     })
//!     .collect();
//! let config = SlotConfig {
//!     duration_minutes: 30,
//!     buffer_minutes: 0,
//!     min_advance_hours: 0,
//!     max_advance_days: 60,
//!     profile_id: "demo".to_string(),
//! };
//!
//! let day = available_slots(
//!     NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(), // a Monday
//!     "UTC",
//!     "UTC",
//!     &weekly,
//!     &[],
//!     &BusySources::default(),
//!     &config,
//!     Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
//! )
//! .unwrap();
//! assert_eq!(day.slots.len(), 16); // 09:00, 09:30, ..., 16:30
//! ```

pub mod busy;
pub mod config;
pub mod engine;
pub mod error;
pub mod slots;
pub mod tz;
pub mod windows;

pub use busy::{merge_busy, BusyInterval, BusySource, BusySources, BusySpan, ExternalFetch};
pub use config::SlotConfig;
pub use engine::{
    available_slots, available_slots_from, month_availability, month_availability_from,
    AvailableSlot, DateRange, DayAvailability, DayEntry, LocalSpan, MonthAvailability, MonthMode,
    ScheduleSource,
};
pub use error::{EngineError, FetchError, Result};
pub use windows::{AvailabilityException, WeeklyAvailability};
