//! Enrollment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::error::{AppError, ErrorKind, codes};
use courtside_core::result::AppResult;
use courtside_entity::class::{ClassStatus, Enrollment, EnrollmentStatus};

use crate::connection::map_db_error;
use crate::store::EnrollmentStore;

/// Repository for class enrollments.
///
/// Enrolling locks the class row (`FOR UPDATE`), so concurrent enrollments
/// into the same class are serialized between the count and the insert.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

#[async_trait]
impl EnrollmentStore for EnrollmentRepository {
    async fn enroll(&self, class_id: Uuid, user_id: Uuid) -> AppResult<Enrollment> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db("Failed to begin enrollment transaction"))?;

        let class: Option<(ClassStatus, i32)> = sqlx::query_as(
            "SELECT status, max_capacity FROM classes WHERE id = $1 FOR UPDATE",
        )
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db("Failed to lock class"))?;

        let (status, capacity) =
            class.ok_or_else(|| AppError::not_found(format!("Class {class_id} not found")))?;
        if status != ClassStatus::Open {
            return Err(AppError::conflict("Class is not open for enrollment")
                .with_code(codes::CLASS_NOT_OPEN));
        }

        let existing = sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM class_enrollments WHERE class_id = $1 AND user_id = $2",
        )
        .bind(class_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db("Failed to find enrollment"))?;

        if existing
            .as_ref()
            .is_some_and(|e| e.status == EnrollmentStatus::Confirmed)
        {
            return Err(AppError::conflict("User is already enrolled in this class")
                .with_code(codes::ALREADY_ENROLLED));
        }

        let confirmed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM class_enrollments WHERE class_id = $1 AND status = 'confirmed'",
        )
        .bind(class_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db("Failed to count enrollments"))?;

        if confirmed >= i64::from(capacity) {
            return Err(AppError::conflict("Class is full").with_code(codes::CLASS_FULL));
        }

        let enrollment = match existing {
            Some(previous) => sqlx::query_as::<_, Enrollment>(
                "UPDATE class_enrollments SET status = 'confirmed', registered_at = NOW() \
                 WHERE id = $1 RETURNING *",
            )
            .bind(previous.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db("Failed to re-enroll"))?,
            None => sqlx::query_as::<_, Enrollment>(
                "INSERT INTO class_enrollments (id, class_id, user_id) VALUES ($1, $2, $3) RETURNING *",
            )
            .bind(Uuid::now_v7())
            .bind(class_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                map_db_error(e, "Failed to create enrollment", |c| {
                    (c == "class_enrollments_class_user_key").then(|| {
                        AppError::conflict("User is already enrolled in this class")
                            .with_code(codes::ALREADY_ENROLLED)
                    })
                })
            })?,
        };

        tx.commit()
            .await
            .map_err(db("Failed to commit enrollment"))?;
        Ok(enrollment)
    }

    async fn unenroll(&self, class_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE class_enrollments SET status = 'cancelled' \
             WHERE class_id = $1 AND user_id = $2 AND status = 'confirmed'",
        )
        .bind(class_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db("Failed to cancel enrollment"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Enrollment>> {
        sqlx::query_as::<_, Enrollment>("SELECT * FROM class_enrollments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db("Failed to find enrollment"))
    }

    async fn find(&self, class_id: Uuid, user_id: Uuid) -> AppResult<Option<Enrollment>> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM class_enrollments WHERE class_id = $1 AND user_id = $2",
        )
        .bind(class_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db("Failed to find enrollment"))
    }

    async fn list_by_class(&self, class_id: Uuid) -> AppResult<Vec<Enrollment>> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM class_enrollments WHERE class_id = $1 AND status = 'confirmed' \
             ORDER BY registered_at",
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db("Failed to list enrollments"))
    }

    async fn count_confirmed(&self, class_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM class_enrollments WHERE class_id = $1 AND status = 'confirmed'",
        )
        .bind(class_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db("Failed to count enrollments"))
    }
}
