//! Pista CRUD. Pistas are never hard-deleted; deactivation hides them
//! from booking while existing allocations keep their reference.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use courtside_auth::rbac::{Capability, RbacEnforcer};
use courtside_core::error::AppError;
use courtside_core::result::AppResult;
use courtside_database::store::PistaStore;
use courtside_entity::pista::{CreatePista, Pista, UpdatePista};
use courtside_entity::slug::slugify;

use crate::context::RequestContext;

/// Payload for a new pista.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePistaRequest {
    pub name: String,
    pub court_type: String,
    pub surface: Option<String>,
    pub location_info: Option<String>,
    pub base_price_cents: i64,
}

#[derive(Debug, Clone)]
pub struct PistaService {
    pistas: Arc<dyn PistaStore>,
    rbac: Arc<RbacEnforcer>,
}

impl PistaService {
    pub fn new(pistas: Arc<dyn PistaStore>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { pistas, rbac }
    }

    pub async fn create(&self, ctx: &RequestContext, req: CreatePistaRequest) -> AppResult<Pista> {
        self.rbac.require(ctx.role, Capability::ManagePistas)?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Pista name is required"));
        }
        if req.court_type.trim().is_empty() {
            return Err(AppError::validation("Court type is required"));
        }
        check_price(req.base_price_cents)?;

        let pista = self
            .pistas
            .create(&CreatePista {
                slug: slugify(name),
                name: name.to_string(),
                court_type: req.court_type.trim().to_string(),
                surface: req.surface,
                location_info: req.location_info,
                base_price_cents: req.base_price_cents,
            })
            .await?;
        info!(pista_id = %pista.id, actor = %ctx.user_id, "Pista created");
        Ok(pista)
    }

    /// Partial update. Price changes never touch existing bookings.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: UpdatePista,
    ) -> AppResult<Pista> {
        self.rbac.require(ctx.role, Capability::ManagePistas)?;
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Pista name cannot be empty"));
        }
        if let Some(price) = patch.base_price_cents {
            check_price(price)?;
        }
        let pista = self.pistas.update(id, &patch).await?;
        info!(pista_id = %id, actor = %ctx.user_id, "Pista updated");
        Ok(pista)
    }

    /// Soft delete.
    pub async fn deactivate(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Pista> {
        self.update(
            ctx,
            id,
            UpdatePista {
                is_active: Some(false),
                ..UpdatePista::default()
            },
        )
        .await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Pista> {
        self.pistas
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Pista {id} not found")))
    }

    pub async fn list(&self, active_only: bool) -> AppResult<Vec<Pista>> {
        self.pistas.list(active_only).await
    }
}

fn check_price(cents: i64) -> AppResult<()> {
    if cents < 0 {
        return Err(AppError::validation("Base price cannot be negative"));
    }
    Ok(())
}
