//! Refresh-session repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::error::{AppError, ErrorKind};
use courtside_core::result::AppResult;
use courtside_core::types::pagination::{PageRequest, PageResponse};
use courtside_entity::session::{CreateSession, RefreshSession, RevokeReason};

use crate::store::SessionStore;

/// Repository for refresh sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create(&self, data: &CreateSession) -> AppResult<RefreshSession> {
        sqlx::query_as::<_, RefreshSession>(
            "INSERT INTO refresh_sessions \
             (id, user_id, family_id, device_id, current_token_hash, session_version, expires_at, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.user_id)
        .bind(data.family_id)
        .bind(&data.device_id)
        .bind(&data.token_hash)
        .bind(data.session_version)
        .bind(data.expires_at)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    async fn find_by_family(&self, family_id: Uuid) -> AppResult<Option<RefreshSession>> {
        sqlx::query_as::<_, RefreshSession>("SELECT * FROM refresh_sessions WHERE family_id = $1")
            .bind(family_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find session by family", e)
            })
    }

    async fn find_active_by_device(
        &self,
        user_id: Uuid,
        device_id: &str,
    ) -> AppResult<Option<RefreshSession>> {
        sqlx::query_as::<_, RefreshSession>(
            "SELECT * FROM refresh_sessions WHERE user_id = $1 AND device_id = $2 AND NOT revoked \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by device", e)
        })
    }

    async fn list_active_by_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<RefreshSession>> {
        sqlx::query_as::<_, RefreshSession>(
            "SELECT * FROM refresh_sessions WHERE user_id = $1 AND NOT revoked AND expires_at > $2 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active sessions", e)
        })
    }

    async fn list_active(
        &self,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RefreshSession>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM refresh_sessions WHERE NOT revoked AND expires_at > $1",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count sessions", e))?;

        let sessions = sqlx::query_as::<_, RefreshSession>(
            "SELECT * FROM refresh_sessions WHERE NOT revoked AND expires_at > $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(now)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))?;

        Ok(PageResponse::new(
            sessions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn rotate(
        &self,
        family_id: Uuid,
        old_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_sessions \
             SET current_token_hash = $3, expires_at = $4, last_used_at = NOW() \
             WHERE family_id = $1 AND current_token_hash = $2 AND NOT revoked",
        )
        .bind(family_id)
        .bind(old_hash)
        .bind(new_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rotate session", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn revoke(&self, family_id: Uuid, reason: RevokeReason) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET revoked = TRUE, revoked_reason = $2, revoked_at = NOW() \
             WHERE family_id = $1 AND NOT revoked",
        )
        .bind(family_id)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke session", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, reason: RevokeReason) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET revoked = TRUE, revoked_reason = $2, revoked_at = NOW() \
             WHERE user_id = $1 AND NOT revoked",
        )
        .bind(user_id)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user sessions", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn revoke_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET revoked = TRUE, revoked_reason = $2, revoked_at = $1 \
             WHERE NOT revoked AND expires_at <= $1",
        )
        .bind(now)
        .bind(RevokeReason::ExpiredCleanup)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke expired sessions", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn purge(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM refresh_sessions \
             WHERE (revoked AND revoked_at < $1) OR expires_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to purge sessions", e))?;
        Ok(result.rows_affected())
    }
}
