//! Allocations: the union of bookings and classes as seen by the
//! availability engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::booking::Booking;
use crate::class::Class;

/// Which kind of allocation occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationKind {
    /// A booking.
    Booking,
    /// A class.
    Class,
}

impl fmt::Display for AllocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booking => f.write_str("booking"),
            Self::Class => f.write_str("class"),
        }
    }
}

/// Identity of one allocation, used to exclude it from its own check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationRef {
    /// Kind.
    pub kind: AllocationKind,
    /// Booking or class ID.
    pub id: Uuid,
}

impl AllocationRef {
    /// Reference a booking.
    pub fn booking(id: Uuid) -> Self {
        Self {
            kind: AllocationKind::Booking,
            id,
        }
    }

    /// Reference a class.
    pub fn class(id: Uuid) -> Self {
        Self {
            kind: AllocationKind::Class,
            id,
        }
    }
}

/// A slot-holding allocation on a pista.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Identity.
    pub reference: AllocationRef,
    /// The pista.
    pub pista_id: Uuid,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Exclusive end.
    pub end_time: DateTime<Utc>,
}

impl From<&Booking> for Allocation {
    fn from(b: &Booking) -> Self {
        Self {
            reference: AllocationRef::booking(b.id),
            pista_id: b.pista_id,
            start_time: b.start_time,
            end_time: b.end_time,
        }
    }
}

impl From<&Class> for Allocation {
    fn from(c: &Class) -> Self {
        Self {
            reference: AllocationRef::class(c.id),
            pista_id: c.pista_id,
            start_time: c.start_time,
            end_time: c.end_time,
        }
    }
}
