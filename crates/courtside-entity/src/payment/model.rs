//! Payment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use courtside_core::AppError;

use super::target::PaymentTarget;

/// Payment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Created, not yet charged.
    Pending,
    /// Charged.
    Completed,
    /// Charge failed.
    Failed,
    /// Charged, then refunded.
    Refunded,
}

/// Which gateway processed the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_provider", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentProvider {
    /// Stripe.
    Stripe,
    /// In-process mock gateway.
    Mock,
}

/// A payment for exactly one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: Uuid,
    /// Payer.
    pub user_id: Uuid,
    /// Amount in cents.
    pub amount_cents: i64,
    /// ISO 4217 currency.
    pub currency: String,
    /// Status.
    pub status: PaymentStatus,
    /// Gateway.
    pub provider: PaymentProvider,
    /// Gateway payment intent identifier.
    pub payment_intent_id: Option<String>,
    /// What was paid for.
    pub target: PaymentTarget,
    /// When the payment was created.
    pub created_at: DateTime<Utc>,
    /// When the payment was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Database row shape of [`Payment`], with the target as three columns.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider: PaymentProvider,
    pub payment_intent_id: Option<String>,
    pub booking_id: Option<Uuid>,
    pub enrollment_id: Option<Uuid>,
    pub membership_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let target =
            PaymentTarget::from_columns(row.booking_id, row.enrollment_id, row.membership_id)?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            amount_cents: row.amount_cents,
            currency: row.currency,
            status: row.status,
            provider: row.provider,
            payment_intent_id: row.payment_intent_id,
            target,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Data required to record a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Payer.
    pub user_id: Uuid,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Currency.
    pub currency: String,
    /// Initial status.
    pub status: PaymentStatus,
    /// Gateway.
    pub provider: PaymentProvider,
    /// Gateway intent identifier.
    pub payment_intent_id: Option<String>,
    /// What is paid for.
    pub target: PaymentTarget,
}
