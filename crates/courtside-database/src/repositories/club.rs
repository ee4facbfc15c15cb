//! Club repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::error::{AppError, ErrorKind, codes};
use courtside_core::result::AppResult;
use courtside_core::types::pagination::{PageRequest, PageResponse};
use courtside_entity::club::{Club, ClubPatch, NewClub};

use crate::connection::map_db_error;
use crate::store::ClubStore;

/// Repository for clubs.
#[derive(Debug, Clone)]
pub struct ClubRepository {
    pool: PgPool,
}

impl ClubRepository {
    /// Create a new club repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClubStore for ClubRepository {
    async fn create(&self, data: &NewClub) -> AppResult<Club> {
        sqlx::query_as::<_, Club>(
            "INSERT INTO clubs (id, slug, owner_id, name, description, max_members, monthly_fee_cents) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.slug)
        .bind(data.owner_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.max_members)
        .bind(data.monthly_fee_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_db_error(e, "Failed to create club", |c| {
                (c == "clubs_slug_key")
                    .then(|| AppError::conflict("Club slug already exists").with_code(codes::SLUG_TAKEN))
            })
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Club>> {
        sqlx::query_as::<_, Club>("SELECT * FROM clubs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find club", e))
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Club>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clubs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count clubs", e))?;

        let clubs =
            sqlx::query_as::<_, Club>("SELECT * FROM clubs ORDER BY name LIMIT $1 OFFSET $2")
                .bind(page.limit() as i64)
                .bind(page.offset() as i64)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list clubs", e))?;

        Ok(PageResponse::new(
            clubs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn update(&self, id: Uuid, patch: &ClubPatch) -> AppResult<Club> {
        sqlx::query_as::<_, Club>(
            "UPDATE clubs SET \
               name = COALESCE($2, name), \
               description = COALESCE($3, description), \
               max_members = COALESCE($4, max_members), \
               monthly_fee_cents = COALESCE($5, monthly_fee_cents), \
               status = COALESCE($6, status), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.max_members)
        .bind(patch.monthly_fee_cents)
        .bind(patch.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update club", e))?
        .ok_or_else(|| AppError::not_found(format!("Club {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM clubs WHERE id = $1 \
             AND NOT EXISTS (SELECT 1 FROM club_memberships WHERE club_id = $1)",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete club", e))?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                Some(_) => Err(AppError::conflict("Club still has members")
                    .with_code(codes::CLUB_HAS_MEMBERS)),
                None => Err(AppError::not_found(format!("Club {id} not found"))),
            };
        }
        Ok(())
    }
}
