//! Charging and refunding bookings, enrollments and memberships.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use courtside_auth::rbac::{Capability, RbacEnforcer};
use courtside_core::error::{AppError, codes};
use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse};
use courtside_database::store::{BookingStore, ClassStore, EnrollmentStore, PaymentStore};
use courtside_entity::booking::{BookingPaymentStatus, BookingStatus};
use courtside_entity::class::EnrollmentStatus;
use courtside_entity::payment::{NewPayment, Payment, PaymentStatus, PaymentTarget};

use super::gateway::PaymentGateway;
use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentStore>,
    bookings: Arc<dyn BookingStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    classes: Arc<dyn ClassStore>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
    rbac: Arc<RbacEnforcer>,
}

impl PaymentService {
    pub fn new(
        payments: Arc<dyn PaymentStore>,
        bookings: Arc<dyn BookingStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        classes: Arc<dyn ClassStore>,
        gateway: Arc<dyn PaymentGateway>,
        currency: impl Into<String>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            payments,
            bookings,
            enrollments,
            classes,
            gateway,
            currency: currency.into(),
            rbac,
        }
    }

    /// Charge `user_id` through the gateway and record the outcome.
    ///
    /// A declined charge is stored as `FAILED` and the decline is returned.
    pub async fn charge(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        target: PaymentTarget,
        description: &str,
    ) -> AppResult<Payment> {
        if amount_cents <= 0 {
            return Err(AppError::validation("Payment amount must be positive"));
        }

        let mut record = NewPayment {
            user_id,
            amount_cents,
            currency: self.currency.clone(),
            status: PaymentStatus::Completed,
            provider: self.gateway.provider(),
            payment_intent_id: None,
            target,
        };

        match self.gateway.charge(amount_cents, &self.currency, description).await {
            Ok(intent) => {
                record.payment_intent_id = Some(intent);
                let payment = self.payments.create(&record).await?;
                info!(
                    payment_id = %payment.id,
                    user_id = %user_id,
                    amount_cents,
                    target = ?target,
                    "Payment completed"
                );
                Ok(payment)
            }
            Err(decline) => {
                record.status = PaymentStatus::Failed;
                let failed = self.payments.create(&record).await?;
                warn!(
                    payment_id = %failed.id,
                    user_id = %user_id,
                    amount_cents,
                    error = %decline,
                    "Payment failed"
                );
                Err(decline)
            }
        }
    }

    /// Pay the caller's booking at its snapshotted price; the booking
    /// becomes `CONFIRMED`/`PAID`.
    pub async fn pay_booking(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Payment> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;
        if booking.user_id != ctx.user_id {
            return Err(AppError::authorization("Only the owner can pay a booking"));
        }
        if booking.status.is_terminal() || booking.payment_status != BookingPaymentStatus::Unpaid {
            return Err(AppError::conflict("Booking cannot be paid in its current state")
                .with_code(codes::INVALID_STATE));
        }

        let payment = self
            .charge(
                ctx.user_id,
                booking.price_snapshot_cents,
                PaymentTarget::Booking(booking.id),
                "Pista booking",
            )
            .await?;
        self.bookings
            .set_payment_status(booking.id, BookingStatus::Confirmed, BookingPaymentStatus::Paid)
            .await?;
        Ok(payment)
    }

    /// Pay the class price for the caller's confirmed enrollment.
    pub async fn pay_enrollment(
        &self,
        ctx: &RequestContext,
        enrollment_id: Uuid,
    ) -> AppResult<Payment> {
        let enrollment = self
            .enrollments
            .find_by_id(enrollment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Enrollment {enrollment_id} not found")))?;
        if enrollment.user_id != ctx.user_id {
            return Err(AppError::authorization("Only the student can pay an enrollment"));
        }
        if enrollment.status != EnrollmentStatus::Confirmed {
            return Err(AppError::conflict("Enrollment is not active")
                .with_code(codes::INVALID_STATE));
        }
        let class = self
            .classes
            .find_by_id(enrollment.class_id)
            .await?
            .ok_or_else(|| AppError::not_found("Class not found"))?;

        self.charge(
            ctx.user_id,
            class.price_cents,
            PaymentTarget::Enrollment(enrollment.id),
            &class.title,
        )
        .await
    }

    /// Refund a completed payment (staff).
    pub async fn refund(&self, ctx: &RequestContext, payment_id: Uuid) -> AppResult<Payment> {
        self.rbac.require(ctx.role, Capability::ManagePayments)?;
        let payment = self.find(payment_id).await?;
        match payment.status {
            PaymentStatus::Refunded => {
                return Err(AppError::conflict("Payment already refunded")
                    .with_code(codes::ALREADY_REFUNDED));
            }
            PaymentStatus::Completed => {}
            other => {
                return Err(AppError::conflict(format!("Cannot refund a {other:?} payment"))
                    .with_code(codes::INVALID_STATE));
            }
        }
        let intent = payment
            .payment_intent_id
            .as_deref()
            .ok_or_else(|| AppError::validation("Payment has no payment intent to refund"))?;

        let refund_id = self.gateway.refund(intent).await?;
        let refunded = self
            .payments
            .set_status(payment.id, PaymentStatus::Refunded)
            .await?;

        if let PaymentTarget::Booking(booking_id) = payment.target {
            if let Some(booking) = self.bookings.find_by_id(booking_id).await? {
                self.bookings
                    .set_payment_status(booking_id, booking.status, BookingPaymentStatus::Refunded)
                    .await?;
            }
        }

        info!(
            payment_id = %payment.id,
            refund_id = %refund_id,
            actor = %ctx.user_id,
            "Payment refunded"
        );
        Ok(refunded)
    }

    /// A payment visible to the caller.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Payment> {
        let payment = self.find(id).await?;
        if payment.user_id != ctx.user_id {
            self.rbac.require(ctx.role, Capability::ManagePayments)?;
        }
        Ok(payment)
    }

    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Payment>> {
        self.payments.list_by_user(ctx.user_id, page).await
    }

    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Payment>> {
        self.rbac.require(ctx.role, Capability::ManagePayments)?;
        self.payments.list_all(page).await
    }

    async fn find(&self, id: Uuid) -> AppResult<Payment> {
        self.payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment {id} not found")))
    }
}
