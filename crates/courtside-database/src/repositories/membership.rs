//! Club membership repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::error::{AppError, ErrorKind, codes};
use courtside_core::result::AppResult;
use courtside_entity::club::{BillingStatus, ClubMembership, ClubStatus, MembershipStatus};

use crate::connection::map_db_error;
use crate::store::MembershipStore;

/// Repository for club memberships.
///
/// Adding a member locks the club row so the active-member count and the
/// insert cannot interleave with another join.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn add(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        next_billing_date: DateTime<Utc>,
    ) -> AppResult<ClubMembership> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let club: Option<(ClubStatus, i32)> =
            sqlx::query_as("SELECT status, max_members FROM clubs WHERE id = $1 FOR UPDATE")
                .bind(club_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock club", e))?;

        let (status, max_members) =
            club.ok_or_else(|| AppError::not_found(format!("Club {club_id} not found")))?;
        if status == ClubStatus::Inactive {
            return Err(AppError::conflict("Club is not accepting members")
                .with_code(codes::INVALID_STATE));
        }

        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM club_memberships WHERE club_id = $1 AND user_id = $2",
        )
        .bind(club_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check membership", e))?;
        if existing.is_some() {
            return Err(AppError::conflict("User is already a member of this club")
                .with_code(codes::ALREADY_MEMBER));
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM club_memberships WHERE club_id = $1 AND status = 'active'",
        )
        .bind(club_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count members", e))?;

        if status == ClubStatus::Full || active >= i64::from(max_members) {
            return Err(AppError::conflict("Club is full").with_code(codes::CLUB_FULL));
        }

        let membership = sqlx::query_as::<_, ClubMembership>(
            "INSERT INTO club_memberships (id, club_id, user_id, next_billing_date) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(club_id)
        .bind(user_id)
        .bind(next_billing_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_db_error(e, "Failed to add member", |c| {
                (c == "club_memberships_club_user_key").then(|| {
                    AppError::conflict("User is already a member of this club")
                        .with_code(codes::ALREADY_MEMBER)
                })
            })
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit membership", e)
        })?;
        Ok(membership)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ClubMembership>> {
        sqlx::query_as::<_, ClubMembership>("SELECT * FROM club_memberships WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    async fn list_by_club(&self, club_id: Uuid) -> AppResult<Vec<ClubMembership>> {
        sqlx::query_as::<_, ClubMembership>(
            "SELECT * FROM club_memberships WHERE club_id = $1 ORDER BY start_date",
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))
    }

    async fn count_active(&self, club_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM club_memberships WHERE club_id = $1 AND status = 'active'",
        )
        .bind(club_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count members", e))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: MembershipStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<ClubMembership> {
        sqlx::query_as::<_, ClubMembership>(
            "UPDATE club_memberships SET status = $2, end_date = COALESCE($3, end_date), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(end_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update membership status", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Membership {id} not found")))
    }

    async fn record_billing(
        &self,
        id: Uuid,
        billing_status: BillingStatus,
        next_billing_date: Option<DateTime<Utc>>,
        last_payment_id: Option<Uuid>,
    ) -> AppResult<ClubMembership> {
        sqlx::query_as::<_, ClubMembership>(
            "UPDATE club_memberships SET billing_status = $2, \
               next_billing_date = COALESCE($3, next_billing_date), \
               last_payment_id = COALESCE($4, last_payment_id), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(billing_status)
        .bind(next_billing_date)
        .bind(last_payment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record membership billing", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Membership {id} not found")))
    }
}
