//! Booking lifecycle and payment status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a booking.
///
/// `Pending` -> `Confirmed` (payment) -> `Completed` (time passes), or
/// `Cancelled` at any point before completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created, awaiting payment or confirmation.
    Pending,
    /// Paid or confirmed by staff.
    Confirmed,
    /// Cancelled; no longer occupies its slot.
    Cancelled,
    /// Ended.
    Completed,
}

impl BookingStatus {
    /// Whether the booking still occupies its slot.
    pub fn holds_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Terminal states cannot be edited or cancelled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a booking has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_payment_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingPaymentStatus {
    /// No completed payment.
    Unpaid,
    /// Paid in full.
    Paid,
    /// Payment was refunded.
    Refunded,
}
