//! Payment gateway abstraction.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use courtside_core::error::AppError;
use courtside_core::result::AppResult;
use courtside_entity::payment::PaymentProvider;

/// An external payment processor.
///
/// `charge` returns the provider's payment intent id; `refund` returns the
/// refund id. A declined charge is an [`AppError::payment_declined`].
#[async_trait]
pub trait PaymentGateway: Send + Sync + Debug {
    /// Which provider this gateway talks to.
    fn provider(&self) -> PaymentProvider;

    async fn charge(&self, amount_cents: i64, currency: &str, description: &str)
    -> AppResult<String>;

    async fn refund(&self, payment_intent_id: &str) -> AppResult<String>;
}

/// In-process gateway that approves every charge unless told to decline.
#[derive(Debug, Default)]
pub struct MockGateway {
    decline: AtomicBool,
}

impl MockGateway {
    pub fn new(decline: bool) -> Self {
        Self {
            decline: AtomicBool::new(decline),
        }
    }

    /// Toggle declining at runtime.
    pub fn set_decline(&self, decline: bool) {
        self.decline.store(decline, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Mock
    }

    async fn charge(
        &self,
        amount_cents: i64,
        currency: &str,
        description: &str,
    ) -> AppResult<String> {
        if self.decline.load(Ordering::SeqCst) {
            return Err(AppError::payment_declined("Card declined"));
        }
        let intent = format!("pi_mock_{}", Uuid::new_v4().simple());
        debug!(%intent, amount_cents, currency, description, "Mock charge approved");
        Ok(intent)
    }

    async fn refund(&self, payment_intent_id: &str) -> AppResult<String> {
        let refund = format!("re_mock_{}", Uuid::new_v4().simple());
        debug!(%refund, payment_intent_id, "Mock refund issued");
        Ok(refund)
    }
}
