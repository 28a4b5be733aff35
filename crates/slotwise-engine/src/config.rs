//! Booking rules for an organizer profile.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Upper bound on `max_advance_days`. Keeps the computation for a single
/// request bounded to roughly a year of dates.
pub const MAX_ADVANCE_DAYS_CAP: u32 = 366;

/// Upper bound on `min_advance_hours`. [`MAX_ADVANCE_DAYS_CAP`] in hours;
/// a longer lead time would put every slot past the booking horizon.
pub const MAX_ADVANCE_HOURS_CAP: u32 = 24 * MAX_ADVANCE_DAYS_CAP;

/// How slots are cut and which ones are offered.
///
/// Unsigned fields make negative durations, buffers, and advance values
/// unrepresentable; [`SlotConfig::validate`] covers the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Length of every offered slot, in minutes. Must be positive.
    pub duration_minutes: u32,
    /// Required clearance before and after busy time, in minutes.
    #[serde(default)]
    pub buffer_minutes: u32,
    /// Minimum lead time before a slot may start, in hours. 0..=8784.
    #[serde(default)]
    pub min_advance_hours: u32,
    /// How far into the future slots may be booked, in days. 1..=366.
    pub max_advance_days: u32,
    /// The organizer profile these rules belong to. Opaque to the engine.
    pub profile_id: String,
}

impl SlotConfig {
    /// Reject unusable configurations before any computation runs.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidConfig` if `duration_minutes` is zero,
    /// `min_advance_hours` is above [`MAX_ADVANCE_HOURS_CAP`], or
    /// `max_advance_days` is zero or above [`MAX_ADVANCE_DAYS_CAP`].
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(EngineError::InvalidConfig(
                "duration_minutes must be positive".to_string(),
            ));
        }
        if self.min_advance_hours > MAX_ADVANCE_HOURS_CAP {
            return Err(EngineError::InvalidConfig(format!(
                "min_advance_hours must be at most {}",
                MAX_ADVANCE_HOURS_CAP
            )));
        }
        if self.max_advance_days == 0 {
            return Err(EngineError::InvalidConfig(
                "max_advance_days must be positive".to_string(),
            ));
        }
        if self.max_advance_days > MAX_ADVANCE_DAYS_CAP {
            return Err(EngineError::InvalidConfig(format!(
                "max_advance_days must be at most {}",
                MAX_ADVANCE_DAYS_CAP
            )));
        }
        Ok(())
    }
}
