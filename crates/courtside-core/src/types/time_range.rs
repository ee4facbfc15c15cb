//! Half-open time intervals.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{AppError, codes};

/// A non-empty half-open interval `[start, end)`.
///
/// Two ranges that merely touch (`a.end == b.start`) do not overlap, so
/// back-to-back allocations on the same pista are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting `end <= start` as a validation error.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::validation("End time must be after start time")
                .with_code(codes::INVALID_INTERVAL));
        }
        Ok(Self { start, end })
    }

    /// Inclusive start.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the range.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `s1 < e2 && s2 < e1`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Raw-bound variant of [`TimeRange::overlaps`] for stored rows.
    pub fn overlaps_bounds(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}
