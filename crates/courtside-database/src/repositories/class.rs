//! Class repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::error::{AppError, ErrorKind, codes};
use courtside_core::result::AppResult;
use courtside_core::types::pagination::{PageRequest, PageResponse};
use courtside_entity::class::{Class, ClassPatch, ClassStatus, NewClass};

use super::{SLOT_CONSTRAINT, capacity_below_enrolled, slot_taken};
use crate::connection::map_db_error;
use crate::store::ClassStore;

/// Repository for classes.
#[derive(Debug, Clone)]
pub struct ClassRepository {
    pool: PgPool,
}

impl ClassRepository {
    /// Create a new class repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn class_write_error(err: sqlx::Error, context: &str) -> AppError {
    map_db_error(err, context, |c| match c {
        SLOT_CONSTRAINT => Some(slot_taken()),
        "classes_slug_key" => {
            Some(AppError::conflict("Class slug already exists").with_code(codes::SLUG_TAKEN))
        }
        _ => None,
    })
}

#[async_trait]
impl ClassStore for ClassRepository {
    async fn insert(&self, data: &NewClass) -> AppResult<Class> {
        sqlx::query_as::<_, Class>(
            "INSERT INTO classes \
             (id, slug, pista_id, instructor_id, title, description, start_time, end_time, max_capacity, price_cents) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.slug)
        .bind(data.pista_id)
        .bind(data.instructor_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.max_capacity)
        .bind(data.price_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| class_write_error(e, "Failed to create class"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Class>> {
        sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find class", e))
    }

    async fn list_upcoming(
        &self,
        from: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Class>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes WHERE start_time >= $1")
            .bind(from)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count classes", e))?;

        let classes = sqlx::query_as::<_, Class>(
            "SELECT * FROM classes WHERE start_time >= $1 ORDER BY start_time LIMIT $2 OFFSET $3",
        )
        .bind(from)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list classes", e))?;

        Ok(PageResponse::new(
            classes,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn update(&self, id: Uuid, patch: &ClassPatch) -> AppResult<Class> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin class update", e)
        })?;

        // Enrollments lock the same row, so the count cannot move under us.
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM classes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock class", e))?
            .ok_or_else(|| AppError::not_found(format!("Class {id} not found")))?;

        let enrolled: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM class_enrollments WHERE class_id = $1 AND status = 'confirmed'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count enrollments", e))?;
        if i64::from(patch.max_capacity) < enrolled {
            return Err(capacity_below_enrolled(enrolled));
        }

        let class = sqlx::query_as::<_, Class>(
            "UPDATE classes SET title = $2, description = $3, start_time = $4, end_time = $5, \
               max_capacity = $6, price_cents = $7, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(patch.max_capacity)
        .bind(patch.price_cents)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| class_write_error(e, "Failed to update class"))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit class update", e)
        })?;
        Ok(class)
    }

    async fn set_status(&self, id: Uuid, status: ClassStatus) -> AppResult<Class> {
        sqlx::query_as::<_, Class>(
            "UPDATE classes SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| class_write_error(e, "Failed to update class status"))?
        .ok_or_else(|| AppError::not_found(format!("Class {id} not found")))
    }

    async fn complete_finished(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE classes SET status = 'completed', updated_at = NOW() \
             WHERE status IN ('open', 'in_progress') AND end_time <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete classes", e))?;
        Ok(result.rows_affected())
    }
}
