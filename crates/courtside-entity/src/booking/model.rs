//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{BookingPaymentStatus, BookingStatus};

/// A user's reservation of a pista for `[start_time, end_time)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique identifier.
    pub id: Uuid,
    /// Who booked.
    pub user_id: Uuid,
    /// Which pista.
    pub pista_id: Uuid,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Exclusive end.
    pub end_time: DateTime<Utc>,
    /// Price at creation; never recomputed.
    pub price_snapshot_cents: i64,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Payment status.
    pub payment_status: BookingPaymentStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Whether this booking blocks its slot.
    pub fn holds_slot(&self) -> bool {
        self.deleted_at.is_none() && self.status.holds_slot()
    }
}

/// Data required to insert a booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Who books.
    pub user_id: Uuid,
    /// Which pista.
    pub pista_id: Uuid,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Exclusive end.
    pub end_time: DateTime<Utc>,
    /// Price snapshot.
    pub price_snapshot_cents: i64,
    /// Notes.
    pub notes: Option<String>,
}
