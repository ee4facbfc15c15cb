//! Class enrollment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Enrollment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "enrollment_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    /// Holds a seat.
    Confirmed,
    /// Gave up the seat.
    Cancelled,
    /// Waiting for a seat.
    Waitlist,
}

/// A user's seat in a class. Unique per (class, user).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    /// Unique identifier.
    pub id: Uuid,
    /// The class.
    pub class_id: Uuid,
    /// The participant.
    pub user_id: Uuid,
    /// Status.
    pub status: EnrollmentStatus,
    /// When the user enrolled.
    pub registered_at: DateTime<Utc>,
}
