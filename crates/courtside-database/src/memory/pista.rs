use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use courtside_core::error::{AppError, codes};
use courtside_core::result::AppResult;
use courtside_entity::pista::{CreatePista, Pista, UpdatePista};

use super::MemoryStore;
use crate::store::PistaStore;

#[async_trait]
impl PistaStore for MemoryStore {
    async fn create(&self, data: &CreatePista) -> AppResult<Pista> {
        let mut state = self.state.lock().await;
        if state.pistas.values().any(|p| p.slug == data.slug) {
            return Err(AppError::conflict("Pista slug already exists").with_code(codes::SLUG_TAKEN));
        }
        let now = Utc::now();
        let pista = Pista {
            id: Uuid::now_v7(),
            slug: data.slug.clone(),
            name: data.name.clone(),
            court_type: data.court_type.clone(),
            surface: data.surface.clone(),
            location_info: data.location_info.clone(),
            is_active: true,
            base_price_cents: data.base_price_cents,
            created_at: now,
            updated_at: now,
        };
        state.pistas.insert(pista.id, pista.clone());
        Ok(pista)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pista>> {
        Ok(self.state.lock().await.pistas.get(&id).cloned())
    }

    async fn list(&self, active_only: bool) -> AppResult<Vec<Pista>> {
        let state = self.state.lock().await;
        let mut pistas: Vec<Pista> = state
            .pistas
            .values()
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect();
        pistas.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(pistas)
    }

    async fn update(&self, id: Uuid, patch: &UpdatePista) -> AppResult<Pista> {
        let mut state = self.state.lock().await;
        let pista = state
            .pistas
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Pista {id} not found")))?;
        pista.apply(patch);
        pista.updated_at = Utc::now();
        Ok(pista.clone())
    }
}
