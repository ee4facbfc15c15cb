//! Pista repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::error::{AppError, ErrorKind, codes};
use courtside_core::result::AppResult;
use courtside_entity::pista::{CreatePista, Pista, UpdatePista};

use crate::connection::map_db_error;
use crate::store::PistaStore;

/// Repository for pistas.
#[derive(Debug, Clone)]
pub struct PistaRepository {
    pool: PgPool,
}

impl PistaRepository {
    /// Create a new pista repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PistaStore for PistaRepository {
    async fn create(&self, data: &CreatePista) -> AppResult<Pista> {
        sqlx::query_as::<_, Pista>(
            "INSERT INTO pistas (id, slug, name, court_type, surface, location_info, base_price_cents) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.slug)
        .bind(&data.name)
        .bind(&data.court_type)
        .bind(&data.surface)
        .bind(&data.location_info)
        .bind(data.base_price_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_db_error(e, "Failed to create pista", |constraint| {
                (constraint == "pistas_slug_key")
                    .then(|| AppError::conflict("Pista slug already exists").with_code(codes::SLUG_TAKEN))
            })
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pista>> {
        sqlx::query_as::<_, Pista>("SELECT * FROM pistas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find pista", e))
    }

    async fn list(&self, active_only: bool) -> AppResult<Vec<Pista>> {
        sqlx::query_as::<_, Pista>(
            "SELECT * FROM pistas WHERE ($1 = FALSE OR is_active) ORDER BY name",
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list pistas", e))
    }

    async fn update(&self, id: Uuid, patch: &UpdatePista) -> AppResult<Pista> {
        sqlx::query_as::<_, Pista>(
            "UPDATE pistas SET \
               name = COALESCE($2, name), \
               court_type = COALESCE($3, court_type), \
               surface = COALESCE($4, surface), \
               location_info = COALESCE($5, location_info), \
               base_price_cents = COALESCE($6, base_price_cents), \
               is_active = COALESCE($7, is_active), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.court_type)
        .bind(&patch.surface)
        .bind(&patch.location_info)
        .bind(patch.base_price_cents)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update pista", e))?
        .ok_or_else(|| AppError::not_found(format!("Pista {id} not found")))
    }
}
