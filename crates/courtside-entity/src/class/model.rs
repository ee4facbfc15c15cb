//! Class entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ClassStatus;

/// A group class occupying a pista for `[start_time, end_time)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Class {
    /// Unique identifier.
    pub id: Uuid,
    /// Public slug.
    pub slug: String,
    /// Which pista.
    pub pista_id: Uuid,
    /// Instructor running the class.
    pub instructor_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Exclusive end.
    pub end_time: DateTime<Utc>,
    /// Maximum confirmed enrollments.
    pub max_capacity: i32,
    /// Price per participant in cents.
    pub price_cents: i64,
    /// Lifecycle status.
    pub status: ClassStatus,
    /// When the class was created.
    pub created_at: DateTime<Utc>,
    /// When the class was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a class.
#[derive(Debug, Clone)]
pub struct NewClass {
    /// Public slug.
    pub slug: String,
    /// Which pista.
    pub pista_id: Uuid,
    /// Instructor.
    pub instructor_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Exclusive end.
    pub end_time: DateTime<Utc>,
    /// Capacity.
    pub max_capacity: i32,
    /// Price in cents.
    pub price_cents: i64,
}

/// Full replacement of a class's editable fields, already validated.
#[derive(Debug, Clone)]
pub struct ClassPatch {
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Exclusive end.
    pub end_time: DateTime<Utc>,
    /// Capacity.
    pub max_capacity: i32,
    /// Price in cents.
    pub price_cents: i64,
}
