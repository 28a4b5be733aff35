//! The JSON request file the CLI feeds to the engine.
//!
//! A request bundles everything the platform's collaborator services
//! would supply for one organizer profile: the weekly pattern, date
//! exceptions, internal bookings, and one entry per connected external
//! calendar carrying either its intervals or the error its fetch ended
//! in. [`BookingRequest`] implements [`ScheduleSource`], so the CLI
//! drives the engine through the same seam a request handler would.

use serde::Deserialize;

use slotwise_engine::busy::{BusyInterval, BusySources, ExternalFetch};
use slotwise_engine::config::SlotConfig;
use slotwise_engine::engine::{DateRange, ScheduleSource};
use slotwise_engine::error::FetchError;
use slotwise_engine::windows::{AvailabilityException, WeeklyAvailability};

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    /// IANA zone the pattern and exceptions are written in.
    pub organizer_tz: String,
    /// IANA zone the viewer wants slot labels in.
    pub viewer_tz: String,
    #[serde(default)]
    pub weekly: Vec<WeeklyAvailability>,
    #[serde(default)]
    pub exceptions: Vec<AvailabilityException>,
    #[serde(default)]
    pub internal_busy: Vec<BusyInterval>,
    #[serde(default)]
    pub external_calendars: Vec<ExternalCalendar>,
    pub config: SlotConfig,
}

/// One connected external calendar: either the busy intervals it
/// reported, or the error its fetch ended in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ExternalCalendar {
    Fetched {
        calendar_id: String,
        intervals: Vec<BusyInterval>,
    },
    Failed {
        calendar_id: String,
        error: String,
    },
}

impl ExternalCalendar {
    fn fetch_outcome(&self) -> ExternalFetch {
        match self {
            ExternalCalendar::Fetched { intervals, .. } => Ok(intervals.clone()),
            ExternalCalendar::Failed { calendar_id, error } => Err(FetchError {
                provider: calendar_id.clone(),
                reason: error.clone(),
            }),
        }
    }
}

impl BookingRequest {
    /// All busy inputs bundled for the aggregator.
    pub fn busy_sources(&self) -> BusySources {
        BusySources {
            internal: self.internal_busy.clone(),
            external: self
                .external_calendars
                .iter()
                .map(ExternalCalendar::fetch_outcome)
                .collect(),
        }
    }
}

// A request file is a complete snapshot for one profile, so the source
// impl ignores the profile id and date range and returns what it holds.
impl ScheduleSource for BookingRequest {
    fn weekly_pattern(&self, _profile_id: &str) -> Vec<WeeklyAvailability> {
        self.weekly.clone()
    }

    fn exceptions(&self, _profile_id: &str, _range: DateRange) -> Vec<AvailabilityException> {
        self.exceptions.clone()
    }

    fn internal_busy(&self, _profile_id: &str, _range: DateRange) -> Vec<BusyInterval> {
        self.internal_busy.clone()
    }

    fn external_busy(&self, _profile_id: &str, _range: DateRange) -> Vec<ExternalFetch> {
        self.external_calendars
            .iter()
            .map(ExternalCalendar::fetch_outcome)
            .collect()
    }
}
