//! Availability queries spanning bookings and classes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use courtside_core::error::{AppError, ErrorKind};
use courtside_core::result::AppResult;
use courtside_core::types::TimeRange;
use courtside_entity::allocation::{Allocation, AllocationKind, AllocationRef};

use crate::store::AllocationStore;

#[derive(Debug, FromRow)]
struct AllocationRow {
    kind: String,
    id: Uuid,
    pista_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl From<AllocationRow> for Allocation {
    fn from(row: AllocationRow) -> Self {
        let kind = if row.kind == "class" {
            AllocationKind::Class
        } else {
            AllocationKind::Booking
        };
        Self {
            reference: AllocationRef { kind, id: row.id },
            pista_id: row.pista_id,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

/// Reads the union of slot-holding bookings and classes.
#[derive(Debug, Clone)]
pub struct AllocationRepository {
    pool: PgPool,
}

impl AllocationRepository {
    /// Create a new allocation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AllocationStore for AllocationRepository {
    async fn find_overlapping(
        &self,
        pista_id: Uuid,
        range: &TimeRange,
        exclude: Option<AllocationRef>,
    ) -> AppResult<Vec<Allocation>> {
        let (exclude_kind, exclude_id) = match exclude {
            Some(r) => (Some(r.kind.to_string()), Some(r.id)),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, AllocationRow>(
            "SELECT 'booking' AS kind, id, pista_id, start_time, end_time FROM bookings \
             WHERE pista_id = $1 AND status <> 'cancelled' AND deleted_at IS NULL \
               AND start_time < $3 AND $2 < end_time \
               AND ($5::uuid IS NULL OR NOT ($4::text = 'booking' AND id = $5)) \
             UNION ALL \
             SELECT 'class' AS kind, id, pista_id, start_time, end_time FROM classes \
             WHERE pista_id = $1 AND status <> 'cancelled' \
               AND start_time < $3 AND $2 < end_time \
               AND ($5::uuid IS NULL OR NOT ($4::text = 'class' AND id = $5)) \
             ORDER BY start_time",
        )
        .bind(pista_id)
        .bind(range.start())
        .bind(range.end())
        .bind(exclude_kind)
        .bind(exclude_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to query pista availability", e)
        })?;

        Ok(rows.into_iter().map(Allocation::from).collect())
    }
}
