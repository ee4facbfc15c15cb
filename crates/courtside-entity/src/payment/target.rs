//! What a payment pays for.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtside_core::AppError;

/// Exactly one paid-for object.
///
/// Stored as three nullable foreign-key columns guarded by a database CHECK;
/// [`PaymentTarget::from_columns`] and [`PaymentTarget::columns`] are the only
/// conversions between the two shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum PaymentTarget {
    /// A pista booking.
    Booking(Uuid),
    /// A class enrollment.
    Enrollment(Uuid),
    /// A club membership.
    Membership(Uuid),
}

impl PaymentTarget {
    /// Rebuild from `(booking_id, enrollment_id, membership_id)`.
    pub fn from_columns(
        booking_id: Option<Uuid>,
        enrollment_id: Option<Uuid>,
        membership_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        match (booking_id, enrollment_id, membership_id) {
            (Some(id), None, None) => Ok(Self::Booking(id)),
            (None, Some(id), None) => Ok(Self::Enrollment(id)),
            (None, None, Some(id)) => Ok(Self::Membership(id)),
            _ => Err(AppError::internal(
                "Payment row must reference exactly one of booking, enrollment, membership",
            )),
        }
    }

    /// Split into `(booking_id, enrollment_id, membership_id)`.
    pub fn columns(&self) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
        match *self {
            Self::Booking(id) => (Some(id), None, None),
            Self::Enrollment(id) => (None, Some(id), None),
            Self::Membership(id) => (None, None, Some(id)),
        }
    }

    /// Referenced object's ID.
    pub fn id(&self) -> Uuid {
        match *self {
            Self::Booking(id) | Self::Enrollment(id) | Self::Membership(id) => id,
        }
    }
}
