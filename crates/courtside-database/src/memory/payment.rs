use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use courtside_core::error::AppError;
use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse};
use courtside_entity::payment::{NewPayment, Payment, PaymentStatus};

use super::{MemoryStore, newest_first};
use crate::store::PaymentStore;

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn create(&self, data: &NewPayment) -> AppResult<Payment> {
        let now = Utc::now();
        let payment = Payment {
            id: Uuid::now_v7(),
            user_id: data.user_id,
            amount_cents: data.amount_cents,
            currency: data.currency.clone(),
            status: data.status,
            provider: data.provider,
            payment_intent_id: data.payment_intent_id.clone(),
            target: data.target,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .await
            .payments
            .insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        Ok(self.state.lock().await.payments.get(&id).cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Payment>> {
        let state = self.state.lock().await;
        let payments = state
            .payments
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        Ok(PageResponse::from_slice(
            newest_first(payments, |p| p.created_at),
            page,
        ))
    }

    async fn list_all(&self, page: &PageRequest) -> AppResult<PageResponse<Payment>> {
        let state = self.state.lock().await;
        let payments = state.payments.values().cloned().collect();
        Ok(PageResponse::from_slice(
            newest_first(payments, |p| p.created_at),
            page,
        ))
    }

    async fn set_status(&self, id: Uuid, status: PaymentStatus) -> AppResult<Payment> {
        let mut state = self.state.lock().await;
        let payment = state
            .payments
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Payment {id} not found")))?;
        payment.status = status;
        payment.updated_at = Utc::now();
        Ok(payment.clone())
    }
}
