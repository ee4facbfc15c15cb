//! Club entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Club availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "club_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClubStatus {
    /// Accepting members.
    Active,
    /// Closed.
    Inactive,
    /// At `max_members`.
    Full,
}

/// A club with a monthly fee.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Club {
    /// Unique identifier.
    pub id: Uuid,
    /// Public slug.
    pub slug: String,
    /// Owning staff user.
    pub owner_id: Uuid,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Membership ceiling.
    pub max_members: i32,
    /// Monthly fee in cents.
    pub monthly_fee_cents: i64,
    /// Availability status.
    pub status: ClubStatus,
    /// When the club was created.
    pub created_at: DateTime<Utc>,
    /// When the club was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a club.
#[derive(Debug, Clone)]
pub struct NewClub {
    /// Public slug.
    pub slug: String,
    /// Owner.
    pub owner_id: Uuid,
    /// Name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Membership ceiling.
    pub max_members: i32,
    /// Monthly fee in cents.
    pub monthly_fee_cents: i64,
}

/// Partial club update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClubPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New membership ceiling.
    pub max_members: Option<i32>,
    /// New monthly fee in cents.
    pub monthly_fee_cents: Option<i64>,
    /// New status.
    pub status: Option<ClubStatus>,
}

impl Club {
    /// Apply a patch in place.
    pub fn apply(&mut self, patch: &ClubPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if patch.description.is_some() {
            self.description = patch.description.clone();
        }
        if let Some(max) = patch.max_members {
            self.max_members = max;
        }
        if let Some(fee) = patch.monthly_fee_cents {
            self.monthly_fee_cents = fee;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}
