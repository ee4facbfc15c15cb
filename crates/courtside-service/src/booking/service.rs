//! Booking lifecycle: create, reschedule, cancel, confirm, delete.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use courtside_auth::rbac::{Capability, RbacEnforcer};
use courtside_core::error::{AppError, codes};
use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse, TimeRange};
use courtside_database::store::BookingStore;
use courtside_entity::allocation::AllocationRef;
use courtside_entity::booking::{Booking, BookingStatus, NewBooking};

use super::pricing::price_for;
use crate::availability::{AvailabilityEngine, SchedulingRules};
use crate::context::RequestContext;

/// Payload for a new booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub pista_id: Uuid,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub notes: Option<String>,
}

/// New times and notes for an existing booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub notes: Option<String>,
}

/// Creates and manages bookings. Every write that claims a slot goes
/// through the availability engine first.
#[derive(Debug, Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    engine: Arc<AvailabilityEngine>,
    rules: Arc<SchedulingRules>,
    rbac: Arc<RbacEnforcer>,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        engine: Arc<AvailabilityEngine>,
        rules: Arc<SchedulingRules>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            bookings,
            engine,
            rules,
            rbac,
        }
    }

    /// Book a pista for the caller.
    ///
    /// The price is snapshotted from the pista's hourly rate and never
    /// changes afterwards.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateBookingRequest,
    ) -> AppResult<Booking> {
        self.rbac.require(ctx.role, Capability::BookPistas)?;
        let range = TimeRange::new(req.start_time, req.end_time)?;
        self.rules.check_booking(&range, ctx.request_time)?;

        let pista = self.engine.require_pista(req.pista_id).await?;
        if !pista.is_active {
            return Err(AppError::validation("Pista is not available for booking"));
        }
        self.engine.check_available(pista.id, &range, None).await?;

        let booking = self
            .bookings
            .insert(&NewBooking {
                user_id: ctx.user_id,
                pista_id: pista.id,
                start_time: range.start(),
                end_time: range.end(),
                price_snapshot_cents: price_for(pista.base_price_cents, range.duration()),
                notes: req.notes,
            })
            .await?;

        info!(
            booking_id = %booking.id,
            pista_id = %pista.id,
            user_id = %ctx.user_id,
            price_cents = booking.price_snapshot_cents,
            "Booking created"
        );
        Ok(booking)
    }

    /// Fetch a booking visible to the caller (owner or staff).
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Booking> {
        let booking = self.find(id).await?;
        if booking.user_id != ctx.user_id {
            self.rbac.require(ctx.role, Capability::ManageBookings)?;
        }
        Ok(booking)
    }

    /// The caller's bookings.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        self.bookings.list_by_user(ctx.user_id, page).await
    }

    /// Every booking (staff).
    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        self.rbac.require(ctx.role, Capability::ManageBookings)?;
        self.bookings.list_all(page).await
    }

    /// Move a booking; it never conflicts with itself.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateBookingRequest,
    ) -> AppResult<Booking> {
        let booking = self.find(id).await?;
        if booking.user_id != ctx.user_id {
            return Err(AppError::authorization("Only the owner can change a booking"));
        }
        if booking.status.is_terminal() {
            return Err(invalid_state(booking.status));
        }

        let range = TimeRange::new(req.start_time, req.end_time)?;
        self.rules.check_booking(&range, ctx.request_time)?;
        self.engine
            .check_available(booking.pista_id, &range, Some(AllocationRef::booking(id)))
            .await?;

        let updated = self.bookings.reschedule(id, &range, req.notes).await?;
        info!(booking_id = %id, "Booking rescheduled");
        Ok(updated)
    }

    /// Cancel a booking (owner or staff). Frees the slot.
    pub async fn cancel(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Booking> {
        let booking = self.get(ctx, id).await?;
        if booking.status.is_terminal() {
            return Err(invalid_state(booking.status));
        }
        let cancelled = self.bookings.set_status(id, BookingStatus::Cancelled).await?;
        info!(booking_id = %id, actor = %ctx.user_id, "Booking cancelled");
        Ok(cancelled)
    }

    /// Confirm a pending booking without payment (staff).
    pub async fn confirm(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Booking> {
        self.rbac.require(ctx.role, Capability::ManageBookings)?;
        let booking = self.find(id).await?;
        if booking.status != BookingStatus::Pending {
            return Err(invalid_state(booking.status));
        }
        let confirmed = self.bookings.set_status(id, BookingStatus::Confirmed).await?;
        info!(booking_id = %id, actor = %ctx.user_id, "Booking confirmed");
        Ok(confirmed)
    }

    /// Soft-delete a booking (staff).
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        self.rbac.require(ctx.role, Capability::ManageBookings)?;
        self.find(id).await?;
        self.bookings.soft_delete(id).await?;
        info!(booking_id = %id, actor = %ctx.user_id, "Booking deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
    }
}

fn invalid_state(status: BookingStatus) -> AppError {
    AppError::conflict(format!("Booking is {}", status.as_str()))
        .with_code(codes::INVALID_STATE)
}
