use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use courtside_core::error::{AppError, codes};
use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse, TimeRange};
use courtside_entity::allocation::{Allocation, AllocationRef};
use courtside_entity::booking::{Booking, BookingPaymentStatus, BookingStatus, NewBooking};
use courtside_entity::class::{
    Class, ClassPatch, ClassStatus, Enrollment, EnrollmentStatus, NewClass,
};

use super::{InnerState, MemoryStore, newest_first};
use crate::repositories::{capacity_below_enrolled, slot_taken};
use crate::store::{AllocationStore, BookingStore, ClassStore, EnrollmentStore};

fn booking_mut(state: &mut InnerState, id: Uuid) -> AppResult<&mut Booking> {
    state
        .bookings
        .get_mut(&id)
        .filter(|b| b.deleted_at.is_none())
        .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
}

fn class_mut(state: &mut InnerState, id: Uuid) -> AppResult<&mut Class> {
    state
        .classes
        .get_mut(&id)
        .ok_or_else(|| AppError::not_found(format!("Class {id} not found")))
}

fn confirmed_count(state: &InnerState, class_id: Uuid) -> i64 {
    state
        .enrollments
        .values()
        .filter(|e| e.class_id == class_id && e.status == EnrollmentStatus::Confirmed)
        .count() as i64
}

/// Re-validate a range against everything else on the pista.
fn ensure_free(
    state: &InnerState,
    pista_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    own: Option<AllocationRef>,
) -> AppResult<()> {
    let range = TimeRange::new(start, end)?;
    if state.slot_is_free(pista_id, &range, own) {
        Ok(())
    } else {
        Err(slot_taken())
    }
}

#[async_trait]
impl AllocationStore for MemoryStore {
    async fn find_overlapping(
        &self,
        pista_id: Uuid,
        range: &TimeRange,
        exclude: Option<AllocationRef>,
    ) -> AppResult<Vec<Allocation>> {
        Ok(self.state.lock().await.overlapping(pista_id, range, exclude))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert(&self, data: &NewBooking) -> AppResult<Booking> {
        let mut state = self.state.lock().await;
        ensure_free(&state, data.pista_id, data.start_time, data.end_time, None)?;

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::now_v7(),
            user_id: data.user_id,
            pista_id: data.pista_id,
            start_time: data.start_time,
            end_time: data.end_time,
            price_snapshot_cents: data.price_snapshot_cents,
            status: BookingStatus::Pending,
            payment_status: BookingPaymentStatus::Unpaid,
            notes: data.notes.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let state = self.state.lock().await;
        Ok(state
            .bookings
            .get(&id)
            .filter(|b| b.deleted_at.is_none())
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let state = self.state.lock().await;
        let bookings = state
            .bookings
            .values()
            .filter(|b| b.user_id == user_id && b.deleted_at.is_none())
            .cloned()
            .collect();
        Ok(PageResponse::from_slice(
            newest_first(bookings, |b| b.start_time),
            page,
        ))
    }

    async fn list_all(&self, page: &PageRequest) -> AppResult<PageResponse<Booking>> {
        let state = self.state.lock().await;
        let bookings = state
            .bookings
            .values()
            .filter(|b| b.deleted_at.is_none())
            .cloned()
            .collect();
        Ok(PageResponse::from_slice(
            newest_first(bookings, |b| b.start_time),
            page,
        ))
    }

    async fn reschedule(
        &self,
        id: Uuid,
        range: &TimeRange,
        notes: Option<String>,
    ) -> AppResult<Booking> {
        let mut state = self.state.lock().await;
        let (pista_id, holds_slot) = {
            let booking = booking_mut(&mut state, id)?;
            (booking.pista_id, booking.holds_slot())
        };
        if holds_slot && !state.slot_is_free(pista_id, range, Some(AllocationRef::booking(id))) {
            return Err(slot_taken());
        }
        let booking = booking_mut(&mut state, id)?;
        booking.start_time = range.start();
        booking.end_time = range.end();
        booking.notes = notes;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        let mut state = self.state.lock().await;
        let current = booking_mut(&mut state, id)?.clone();
        if !current.status.holds_slot() && status.holds_slot() {
            ensure_free(
                &state,
                current.pista_id,
                current.start_time,
                current.end_time,
                Some(AllocationRef::booking(id)),
            )?;
        }
        let booking = booking_mut(&mut state, id)?;
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn set_payment_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        payment_status: BookingPaymentStatus,
    ) -> AppResult<Booking> {
        let mut state = self.state.lock().await;
        let booking = booking_mut(&mut state, id)?;
        booking.status = status;
        booking.payment_status = payment_status;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let booking = booking_mut(&mut state, id)?;
        let now = Utc::now();
        booking.deleted_at = Some(now);
        booking.updated_at = now;
        Ok(())
    }

    async fn complete_finished(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut count = 0;
        for booking in state.bookings.values_mut().filter(|b| {
            b.deleted_at.is_none() && b.status == BookingStatus::Confirmed && b.end_time <= now
        }) {
            booking.status = BookingStatus::Completed;
            booking.updated_at = now;
            count += 1;
        }
        Ok(count)
    }

    async fn cancel_unconfirmed_started(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut count = 0;
        for booking in state.bookings.values_mut().filter(|b| {
            b.deleted_at.is_none() && b.status == BookingStatus::Pending && b.start_time < now
        }) {
            booking.status = BookingStatus::Cancelled;
            booking.updated_at = now;
            count += 1;
        }
        Ok(count)
    }
}

#[async_trait]
impl ClassStore for MemoryStore {
    async fn insert(&self, data: &NewClass) -> AppResult<Class> {
        let mut state = self.state.lock().await;
        ensure_free(&state, data.pista_id, data.start_time, data.end_time, None)?;
        if state.classes.values().any(|c| c.slug == data.slug) {
            return Err(AppError::conflict("Class slug already exists").with_code(codes::SLUG_TAKEN));
        }

        let now = Utc::now();
        let class = Class {
            id: Uuid::now_v7(),
            slug: data.slug.clone(),
            pista_id: data.pista_id,
            instructor_id: data.instructor_id,
            title: data.title.clone(),
            description: data.description.clone(),
            start_time: data.start_time,
            end_time: data.end_time,
            max_capacity: data.max_capacity,
            price_cents: data.price_cents,
            status: ClassStatus::Open,
            created_at: now,
            updated_at: now,
        };
        state.classes.insert(class.id, class.clone());
        Ok(class)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Class>> {
        Ok(self.state.lock().await.classes.get(&id).cloned())
    }

    async fn list_upcoming(
        &self,
        from: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Class>> {
        let state = self.state.lock().await;
        let mut classes: Vec<Class> = state
            .classes
            .values()
            .filter(|c| c.start_time >= from)
            .cloned()
            .collect();
        classes.sort_by_key(|c| c.start_time);
        Ok(PageResponse::from_slice(classes, page))
    }

    async fn update(&self, id: Uuid, patch: &ClassPatch) -> AppResult<Class> {
        let mut state = self.state.lock().await;
        let current = class_mut(&mut state, id)?.clone();
        let enrolled = confirmed_count(&state, id);
        if i64::from(patch.max_capacity) < enrolled {
            return Err(capacity_below_enrolled(enrolled));
        }
        if current.status.holds_slot() {
            ensure_free(
                &state,
                current.pista_id,
                patch.start_time,
                patch.end_time,
                Some(AllocationRef::class(id)),
            )?;
        }
        let class = class_mut(&mut state, id)?;
        class.title = patch.title.clone();
        class.description = patch.description.clone();
        class.start_time = patch.start_time;
        class.end_time = patch.end_time;
        class.max_capacity = patch.max_capacity;
        class.price_cents = patch.price_cents;
        class.updated_at = Utc::now();
        Ok(class.clone())
    }

    async fn set_status(&self, id: Uuid, status: ClassStatus) -> AppResult<Class> {
        let mut state = self.state.lock().await;
        let current = class_mut(&mut state, id)?.clone();
        if !current.status.holds_slot() && status.holds_slot() {
            ensure_free(
                &state,
                current.pista_id,
                current.start_time,
                current.end_time,
                Some(AllocationRef::class(id)),
            )?;
        }
        let class = class_mut(&mut state, id)?;
        class.status = status;
        class.updated_at = Utc::now();
        Ok(class.clone())
    }

    async fn complete_finished(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut count = 0;
        for class in state.classes.values_mut().filter(|c| {
            matches!(c.status, ClassStatus::Open | ClassStatus::InProgress) && c.end_time <= now
        }) {
            class.status = ClassStatus::Completed;
            class.updated_at = now;
            count += 1;
        }
        Ok(count)
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn enroll(&self, class_id: Uuid, user_id: Uuid) -> AppResult<Enrollment> {
        let mut state = self.state.lock().await;
        let class = state
            .classes
            .get(&class_id)
            .ok_or_else(|| AppError::not_found(format!("Class {class_id} not found")))?;
        if class.status != ClassStatus::Open {
            return Err(AppError::conflict("Class is not open for enrollment")
                .with_code(codes::CLASS_NOT_OPEN));
        }
        let capacity = i64::from(class.max_capacity);

        let existing = state
            .enrollments
            .values()
            .find(|e| e.class_id == class_id && e.user_id == user_id)
            .cloned();
        if existing
            .as_ref()
            .is_some_and(|e| e.status == EnrollmentStatus::Confirmed)
        {
            return Err(AppError::conflict("User is already enrolled in this class")
                .with_code(codes::ALREADY_ENROLLED));
        }

        if confirmed_count(&state, class_id) >= capacity {
            return Err(AppError::conflict("Class is full").with_code(codes::CLASS_FULL));
        }

        let enrollment = Enrollment {
            id: existing.map(|e| e.id).unwrap_or_else(Uuid::now_v7),
            class_id,
            user_id,
            status: EnrollmentStatus::Confirmed,
            registered_at: Utc::now(),
        };
        state.enrollments.insert(enrollment.id, enrollment.clone());
        Ok(enrollment)
    }

    async fn unenroll(&self, class_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.enrollments.values_mut().find(|e| {
            e.class_id == class_id && e.user_id == user_id && e.status == EnrollmentStatus::Confirmed
        }) {
            Some(enrollment) => {
                enrollment.status = EnrollmentStatus::Cancelled;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Enrollment>> {
        Ok(self.state.lock().await.enrollments.get(&id).cloned())
    }

    async fn find(&self, class_id: Uuid, user_id: Uuid) -> AppResult<Option<Enrollment>> {
        let state = self.state.lock().await;
        Ok(state
            .enrollments
            .values()
            .find(|e| e.class_id == class_id && e.user_id == user_id)
            .cloned())
    }

    async fn list_by_class(&self, class_id: Uuid) -> AppResult<Vec<Enrollment>> {
        let state = self.state.lock().await;
        let mut enrollments: Vec<Enrollment> = state
            .enrollments
            .values()
            .filter(|e| e.class_id == class_id && e.status == EnrollmentStatus::Confirmed)
            .cloned()
            .collect();
        enrollments.sort_by_key(|e| e.registered_at);
        Ok(enrollments)
    }

    async fn count_confirmed(&self, class_id: Uuid) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(confirmed_count(&state, class_id))
    }
}
