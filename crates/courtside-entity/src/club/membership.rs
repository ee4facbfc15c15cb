//! Club membership entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Membership lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    /// Member in good standing.
    Active,
    /// Temporarily suspended by staff.
    Suspended,
    /// Lapsed; cannot be reactivated.
    Expired,
    /// Ended by the member or staff.
    Cancelled,
}

/// Whether the monthly fee is up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "billing_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingStatus {
    /// Last renewal succeeded.
    UpToDate,
    /// Last renewal charge was declined.
    PastDue,
}

/// A user's membership in a club. Unique per (club, user).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClubMembership {
    /// Unique identifier.
    pub id: Uuid,
    /// The club.
    pub club_id: Uuid,
    /// The member.
    pub user_id: Uuid,
    /// Lifecycle status.
    pub status: MembershipStatus,
    /// When the membership started.
    pub start_date: DateTime<Utc>,
    /// When the membership ended.
    pub end_date: Option<DateTime<Utc>>,
    /// When the next monthly fee is due.
    pub next_billing_date: Option<DateTime<Utc>>,
    /// Billing standing.
    pub billing_status: BillingStatus,
    /// Last successful renewal payment.
    pub last_payment_id: Option<Uuid>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}
