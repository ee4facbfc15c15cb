//! Payment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::error::{AppError, ErrorKind};
use courtside_core::result::AppResult;
use courtside_core::types::pagination::{PageRequest, PageResponse};
use courtside_entity::payment::{NewPayment, Payment, PaymentRow, PaymentStatus};

use crate::connection::map_db_error;
use crate::store::PaymentStore;

/// Repository for payments. Rows store the target as three nullable
/// columns; conversion happens through [`PaymentRow`].
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Create a new payment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn page(
        &self,
        user_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Payment>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count payments", e))?;

        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT * FROM payments WHERE ($1::uuid IS NULL OR user_id = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list payments", e))?;

        let payments = rows
            .into_iter()
            .map(Payment::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(PageResponse::new(
            payments,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}

#[async_trait]
impl PaymentStore for PaymentRepository {
    async fn create(&self, data: &NewPayment) -> AppResult<Payment> {
        let (booking_id, enrollment_id, membership_id) = data.target.columns();
        let row = sqlx::query_as::<_, PaymentRow>(
            "INSERT INTO payments \
             (id, user_id, amount_cents, currency, status, provider, payment_intent_id, \
              booking_id, enrollment_id, membership_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.user_id)
        .bind(data.amount_cents)
        .bind(&data.currency)
        .bind(data.status)
        .bind(data.provider)
        .bind(&data.payment_intent_id)
        .bind(booking_id)
        .bind(enrollment_id)
        .bind(membership_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_db_error(e, "Failed to record payment", |c| {
                (c == "payments_payment_intent_id_key")
                    .then(|| AppError::conflict("Payment intent already recorded"))
            })
        })?;
        Payment::try_from(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        sqlx::query_as::<_, PaymentRow>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find payment", e))?
            .map(Payment::try_from)
            .transpose()
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Payment>> {
        self.page(Some(user_id), page).await
    }

    async fn list_all(&self, page: &PageRequest) -> AppResult<PageResponse<Payment>> {
        self.page(None, page).await
    }

    async fn set_status(&self, id: Uuid, status: PaymentStatus) -> AppResult<Payment> {
        let row = sqlx::query_as::<_, PaymentRow>(
            "UPDATE payments SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update payment", e))?
        .ok_or_else(|| AppError::not_found(format!("Payment {id} not found")))?;
        Payment::try_from(row)
    }
}
