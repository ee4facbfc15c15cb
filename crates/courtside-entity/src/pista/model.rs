//! Pista entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bookable court.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pista {
    /// Unique identifier.
    pub id: Uuid,
    /// Public slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Court type (e.g. "padel", "tennis").
    pub court_type: String,
    /// Playing surface.
    pub surface: Option<String>,
    /// Where the court is in the facility.
    pub location_info: Option<String>,
    /// Inactive pistas cannot be booked.
    pub is_active: bool,
    /// Hourly price in cents.
    pub base_price_cents: i64,
    /// When the pista was created.
    pub created_at: DateTime<Utc>,
    /// When the pista was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a pista.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePista {
    /// Public slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Court type.
    pub court_type: String,
    /// Playing surface.
    pub surface: Option<String>,
    /// Location description.
    pub location_info: Option<String>,
    /// Hourly price in cents.
    pub base_price_cents: i64,
}

/// Partial update of a pista; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePista {
    /// New name.
    pub name: Option<String>,
    /// New court type.
    pub court_type: Option<String>,
    /// New surface.
    pub surface: Option<String>,
    /// New location description.
    pub location_info: Option<String>,
    /// New hourly price in cents.
    pub base_price_cents: Option<i64>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

impl Pista {
    /// Apply a patch in place.
    pub fn apply(&mut self, patch: &UpdatePista) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(court_type) = &patch.court_type {
            self.court_type = court_type.clone();
        }
        if patch.surface.is_some() {
            self.surface = patch.surface.clone();
        }
        if patch.location_info.is_some() {
            self.location_info = patch.location_info.clone();
        }
        if let Some(price) = patch.base_price_cents {
            self.base_price_cents = price;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
    }
}
