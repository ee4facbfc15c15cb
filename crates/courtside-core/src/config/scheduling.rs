//! Business-hour and allocation bound configuration.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Opening hours and duration/capacity bounds for bookings and classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Hour of day (0-23) the facility opens.
    #[serde(default = "default_opening_hour")]
    pub opening_hour: u32,
    /// Hour of day (1-24) the facility closes; an allocation may end exactly then.
    #[serde(default = "default_closing_hour")]
    pub closing_hour: u32,
    /// Offset from UTC, in minutes, of the facility's wall clock.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Shortest booking in minutes.
    #[serde(default = "default_booking_min")]
    pub booking_min_minutes: i64,
    /// Longest booking in minutes.
    #[serde(default = "default_booking_max")]
    pub booking_max_minutes: i64,
    /// Shortest class in minutes.
    #[serde(default = "default_class_min")]
    pub class_min_minutes: i64,
    /// Longest class in minutes.
    #[serde(default = "default_class_max")]
    pub class_max_minutes: i64,
    /// Smallest allowed class capacity.
    #[serde(default = "default_class_min_capacity")]
    pub class_min_capacity: i32,
    /// Largest allowed class capacity.
    #[serde(default = "default_class_max_capacity")]
    pub class_max_capacity: i32,
}

impl SchedulingConfig {
    /// The facility's wall-clock offset; falls back to UTC when out of range.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            opening_hour: default_opening_hour(),
            closing_hour: default_closing_hour(),
            utc_offset_minutes: 0,
            booking_min_minutes: default_booking_min(),
            booking_max_minutes: default_booking_max(),
            class_min_minutes: default_class_min(),
            class_max_minutes: default_class_max(),
            class_min_capacity: default_class_min_capacity(),
            class_max_capacity: default_class_max_capacity(),
        }
    }
}

fn default_opening_hour() -> u32 {
    9
}

fn default_closing_hour() -> u32 {
    23
}

fn default_booking_min() -> i64 {
    60
}

fn default_booking_max() -> i64 {
    180
}

fn default_class_min() -> i64 {
    30
}

fn default_class_max() -> i64 {
    180
}

fn default_class_min_capacity() -> i32 {
    1
}

fn default_class_max_capacity() -> i32 {
    20
}
