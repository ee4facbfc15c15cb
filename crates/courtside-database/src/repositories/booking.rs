//! Booking repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::error::{AppError, ErrorKind};
use courtside_core::result::AppResult;
use courtside_core::types::TimeRange;
use courtside_core::types::pagination::{PageRequest, PageResponse};
use courtside_entity::booking::{Booking, BookingPaymentStatus, BookingStatus, NewBooking};

use super::{SLOT_CONSTRAINT, slot_taken};
use crate::connection::map_db_error;
use crate::store::BookingStore;

/// Repository for bookings. Slot exclusivity is enforced by the
/// `pista_slots` exclusion constraint, kept in sync by triggers.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn page(
        &self,
        user_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE deleted_at IS NULL AND ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count bookings", e))?;

        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE deleted_at IS NULL AND ($1::uuid IS NULL OR user_id = $1) \
             ORDER BY start_time DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookings", e))?;

        Ok(PageResponse::new(
            bookings,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn insert(&self, data: &NewBooking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, user_id, pista_id, start_time, end_time, price_snapshot_cents, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.user_id)
        .bind(data.pista_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.price_snapshot_cents)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_db_error(e, "Failed to create booking", |c| {
                (c == SLOT_CONSTRAINT).then(slot_taken)
            })
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        self.page(Some(user_id), page).await
    }

    async fn list_all(&self, page: &PageRequest) -> AppResult<PageResponse<Booking>> {
        self.page(None, page).await
    }

    async fn reschedule(
        &self,
        id: Uuid,
        range: &TimeRange,
        notes: Option<String>,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET start_time = $2, end_time = $3, notes = $4, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(range.start())
        .bind(range.end())
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_db_error(e, "Failed to reschedule booking", |c| {
                (c == SLOT_CONSTRAINT).then(slot_taken)
            })
        })?
        .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_db_error(e, "Failed to update booking status", |c| {
                (c == SLOT_CONSTRAINT).then(slot_taken)
            })
        })?
        .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
    }

    async fn set_payment_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        payment_status: BookingPaymentStatus,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, payment_status = $3, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(payment_status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update booking payment", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE bookings SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete booking", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Booking {id} not found")));
        }
        Ok(())
    }

    async fn complete_finished(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'completed', updated_at = NOW() \
             WHERE status = 'confirmed' AND end_time <= $1 AND deleted_at IS NULL",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to complete bookings", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn cancel_unconfirmed_started(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', updated_at = NOW() \
             WHERE status = 'pending' AND start_time < $1 AND deleted_at IS NULL",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to cancel stale bookings", e)
        })?;
        Ok(result.rows_affected())
    }
}
