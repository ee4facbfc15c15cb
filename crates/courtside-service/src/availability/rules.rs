//! Business rules layered on top of availability: opening hours, duration
//! bounds, no past starts, class capacity bounds.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use courtside_core::config::SchedulingConfig;
use courtside_core::error::AppError;
use courtside_core::result::AppResult;
use courtside_core::types::TimeRange;

/// Validates allocation windows against the configured schedule.
#[derive(Debug, Clone)]
pub struct SchedulingRules {
    config: SchedulingConfig,
}

impl SchedulingRules {
    pub fn new(config: SchedulingConfig) -> Self {
        Self { config }
    }

    /// Hours, booking duration bounds, and no past start.
    pub fn check_booking(&self, range: &TimeRange, now: DateTime<Utc>) -> AppResult<()> {
        self.check_window(
            range,
            now,
            self.config.booking_min_minutes,
            self.config.booking_max_minutes,
            "Booking",
        )
    }

    /// Hours, class duration bounds, and no past start.
    pub fn check_class(&self, range: &TimeRange, now: DateTime<Utc>) -> AppResult<()> {
        self.check_window(
            range,
            now,
            self.config.class_min_minutes,
            self.config.class_max_minutes,
            "Class",
        )
    }

    /// Class capacity must lie within the configured bounds.
    pub fn check_capacity(&self, capacity: i32) -> AppResult<()> {
        let (min, max) = (self.config.class_min_capacity, self.config.class_max_capacity);
        if capacity < min || capacity > max {
            return Err(AppError::validation(format!(
                "Class capacity must be between {min} and {max}"
            )));
        }
        Ok(())
    }

    fn check_window(
        &self,
        range: &TimeRange,
        now: DateTime<Utc>,
        min_minutes: i64,
        max_minutes: i64,
        what: &str,
    ) -> AppResult<()> {
        if range.start() < now {
            return Err(AppError::validation(format!(
                "{what} cannot start in the past"
            )));
        }

        let minutes = range.duration().num_minutes();
        if minutes < min_minutes || minutes > max_minutes {
            return Err(AppError::validation(format!(
                "{what} duration must be between {min_minutes} and {max_minutes} minutes"
            )));
        }

        let (open, close) = self.business_hours(range.start())?;
        let offset = self.config.offset();
        let start = range.start().with_timezone(&offset).naive_local();
        let end = range.end().with_timezone(&offset).naive_local();
        if start < open || end > close {
            return Err(AppError::validation(format!(
                "{what} must fall within business hours {:02}:00-{:02}:00",
                self.config.opening_hour, self.config.closing_hour
            )));
        }
        Ok(())
    }

    /// Local opening and closing instants on the day `start` falls on.
    fn business_hours(&self, start: DateTime<Utc>) -> AppResult<(NaiveDateTime, NaiveDateTime)> {
        let day = start.with_timezone(&self.config.offset()).date_naive();
        let midnight = day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::internal("Invalid calendar day"))?;
        Ok((
            midnight + Duration::hours(i64::from(self.config.opening_hour)),
            midnight + Duration::hours(i64::from(self.config.closing_hour)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rules() -> SchedulingRules {
        SchedulingRules::new(SchedulingConfig::default())
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2033, 1, 15, h, m, 0).unwrap()
    }

    fn range(s: DateTime<Utc>, e: DateTime<Utc>) -> TimeRange {
        TimeRange::new(s, e).unwrap()
    }

    fn long_ago() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn booking_hours_are_inclusive_at_the_edges() {
        let r = rules();
        assert!(r.check_booking(&range(at(9, 0), at(10, 0)), long_ago()).is_ok());
        assert!(r.check_booking(&range(at(22, 0), at(23, 0)), long_ago()).is_ok());
        assert!(r.check_booking(&range(at(8, 30), at(9, 30)), long_ago()).is_err());
        assert!(r.check_booking(&range(at(22, 30), at(23, 30)), long_ago()).is_err());
    }

    #[test]
    fn duration_bounds_differ_for_classes() {
        let r = rules();
        let half_hour = range(at(10, 0), at(10, 30));
        assert!(r.check_booking(&half_hour, long_ago()).is_err());
        assert!(r.check_class(&half_hour, long_ago()).is_ok());
        let four_hours = range(at(10, 0), at(14, 0));
        assert!(r.check_booking(&four_hours, long_ago()).is_err());
        assert!(r.check_class(&four_hours, long_ago()).is_err());
    }

    #[test]
    fn past_start_is_rejected() {
        let r = rules();
        assert!(r.check_booking(&range(at(10, 0), at(11, 0)), at(10, 1)).is_err());
        assert!(r.check_booking(&range(at(10, 0), at(11, 0)), at(10, 0)).is_ok());
    }

    #[test]
    fn capacity_bounds() {
        let r = rules();
        assert!(r.check_capacity(0).is_err());
        assert!(r.check_capacity(1).is_ok());
        assert!(r.check_capacity(20).is_ok());
        assert!(r.check_capacity(21).is_err());
    }

    #[test]
    fn hours_follow_the_configured_offset() {
        let r = SchedulingRules::new(SchedulingConfig {
            utc_offset_minutes: 120,
            ..SchedulingConfig::default()
        });
        // 07:00 UTC is 09:00 at UTC+2.
        assert!(r.check_booking(&range(at(7, 0), at(8, 0)), long_ago()).is_ok());
        assert!(r.check_booking(&range(at(9, 0), at(10, 0)), long_ago()).is_ok());
        assert!(r.check_booking(&range(at(21, 0), at(22, 0)), long_ago()).is_err());
    }
}
