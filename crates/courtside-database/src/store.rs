//! Store traits.
//!
//! Services receive these as `Arc<dyn ...>` at construction time. Every
//! implementation must enforce the write-time invariants itself: no two
//! slot-holding allocations on one pista may overlap, a class never holds
//! more confirmed enrollments than its capacity, and a refresh rotation only
//! succeeds against the hash it expects.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use courtside_core::AppResult;
use courtside_core::types::{PageRequest, PageResponse, TimeRange};
use courtside_entity::allocation::{Allocation, AllocationRef};
use courtside_entity::booking::{Booking, BookingPaymentStatus, BookingStatus, NewBooking};
use courtside_entity::class::{Class, ClassPatch, ClassStatus, Enrollment, NewClass};
use courtside_entity::club::{
    BillingStatus, Club, ClubMembership, ClubPatch, MembershipStatus, NewClub,
};
use courtside_entity::payment::{NewPayment, Payment, PaymentStatus};
use courtside_entity::pista::{CreatePista, Pista, UpdatePista};
use courtside_entity::session::{CreateSession, RefreshSession, RevokeReason};
use courtside_entity::user::{CreateUser, User, UserRole};

/// User accounts.
#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    /// Find a user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Find a user by slug.
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<User>>;
    /// Insert a user; a taken email is an `EMAIL_TAKEN` conflict.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;
    /// Page through users, newest first.
    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>>;
    /// Change a user's role.
    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User>;
    /// Activate or deactivate a user.
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<User>;
    /// Replace the self-editable profile fields.
    async fn update_profile(
        &self,
        id: Uuid,
        full_name: &str,
        phone: Option<&str>,
    ) -> AppResult<User>;
    /// Store a new password hash.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;
    /// Record a successful login.
    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;
    /// Atomically increment the session version and return the new value.
    async fn bump_session_version(&self, id: Uuid) -> AppResult<i32>;
}

/// Refresh sessions keyed by family and by device.
#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Insert a new session.
    async fn create(&self, data: &CreateSession) -> AppResult<RefreshSession>;
    /// Find a session by its rotation family.
    async fn find_by_family(&self, family_id: Uuid) -> AppResult<Option<RefreshSession>>;
    /// Find the non-revoked session for a user's device.
    async fn find_active_by_device(
        &self,
        user_id: Uuid,
        device_id: &str,
    ) -> AppResult<Option<RefreshSession>>;
    /// Non-revoked, unexpired sessions of a user, newest first.
    async fn list_active_by_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<RefreshSession>>;
    /// Non-revoked, unexpired sessions of every user (admin view).
    async fn list_active(
        &self,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RefreshSession>>;
    /// Compare-and-swap the token hash. Returns `false` when the stored hash
    /// is no longer `old_hash` or the session is revoked.
    async fn rotate(
        &self,
        family_id: Uuid,
        old_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool>;
    /// Revoke one session if it is not already revoked.
    async fn revoke(&self, family_id: Uuid, reason: RevokeReason) -> AppResult<bool>;
    /// Revoke every non-revoked session of a user.
    async fn revoke_all_for_user(&self, user_id: Uuid, reason: RevokeReason) -> AppResult<u64>;
    /// Revoke sessions past their expiry with `expired_cleanup`.
    async fn revoke_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
    /// Delete revoked or expired sessions last touched before `cutoff`.
    async fn purge(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// Pistas.
#[async_trait]
pub trait PistaStore: Send + Sync + Debug {
    /// Insert a pista.
    async fn create(&self, data: &CreatePista) -> AppResult<Pista>;
    /// Find a pista by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pista>>;
    /// List pistas ordered by name.
    async fn list(&self, active_only: bool) -> AppResult<Vec<Pista>>;
    /// Apply a partial update.
    async fn update(&self, id: Uuid, patch: &UpdatePista) -> AppResult<Pista>;
}

/// Cross-kind availability queries.
#[async_trait]
pub trait AllocationStore: Send + Sync + Debug {
    /// Slot-holding bookings and classes on `pista_id` overlapping `range`,
    /// ignoring `exclude`.
    async fn find_overlapping(
        &self,
        pista_id: Uuid,
        range: &TimeRange,
        exclude: Option<AllocationRef>,
    ) -> AppResult<Vec<Allocation>>;
}

/// Bookings.
///
/// `insert` and `reschedule` fail with `SLOT_TAKEN_CONCURRENTLY` if the slot
/// is held at write time.
#[async_trait]
pub trait BookingStore: Send + Sync + Debug {
    /// Insert a pending, unpaid booking.
    async fn insert(&self, data: &NewBooking) -> AppResult<Booking>;
    /// Find a non-deleted booking.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;
    /// A user's bookings, latest start first.
    async fn list_by_user(&self, user_id: Uuid, page: &PageRequest)
    -> AppResult<PageResponse<Booking>>;
    /// All bookings, latest start first.
    async fn list_all(&self, page: &PageRequest) -> AppResult<PageResponse<Booking>>;
    /// Move a booking to a new interval and replace its notes.
    async fn reschedule(
        &self,
        id: Uuid,
        range: &TimeRange,
        notes: Option<String>,
    ) -> AppResult<Booking>;
    /// Set the lifecycle status.
    async fn set_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking>;
    /// Set lifecycle and payment status together.
    async fn set_payment_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        payment_status: BookingPaymentStatus,
    ) -> AppResult<Booking>;
    /// Soft-delete; the slot is released.
    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;
    /// `CONFIRMED` bookings with `end_time <= now` become `COMPLETED`.
    async fn complete_finished(&self, now: DateTime<Utc>) -> AppResult<u64>;
    /// `PENDING` bookings with `start_time < now` become `CANCELLED`.
    async fn cancel_unconfirmed_started(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Classes.
///
/// `insert` and `update` fail with `SLOT_TAKEN_CONCURRENTLY` if the slot is
/// held at write time.
#[async_trait]
pub trait ClassStore: Send + Sync + Debug {
    /// Insert an open class.
    async fn insert(&self, data: &NewClass) -> AppResult<Class>;
    /// Find a class by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Class>>;
    /// Classes starting at or after `from`, earliest first.
    async fn list_upcoming(
        &self,
        from: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Class>>;
    /// Replace the editable fields. Fails with a validation error when
    /// `max_capacity` is below the confirmed enrollments, checked under the
    /// same lock that enrollment takes.
    async fn update(&self, id: Uuid, patch: &ClassPatch) -> AppResult<Class>;
    /// Set the lifecycle status.
    async fn set_status(&self, id: Uuid, status: ClassStatus) -> AppResult<Class>;
    /// `OPEN`/`IN_PROGRESS` classes with `end_time <= now` become `COMPLETED`.
    async fn complete_finished(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Class enrollments.
#[async_trait]
pub trait EnrollmentStore: Send + Sync + Debug {
    /// Atomically enroll: the class must be `OPEN` (`CLASS_NOT_OPEN`), the
    /// user must not hold a confirmed seat (`ALREADY_ENROLLED`), and the
    /// confirmed count must be below capacity (`CLASS_FULL`).
    async fn enroll(&self, class_id: Uuid, user_id: Uuid) -> AppResult<Enrollment>;
    /// Give up a confirmed seat. Returns `false` if there was none.
    async fn unenroll(&self, class_id: Uuid, user_id: Uuid) -> AppResult<bool>;
    /// Find an enrollment by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Enrollment>>;
    /// Find a user's enrollment in a class.
    async fn find(&self, class_id: Uuid, user_id: Uuid) -> AppResult<Option<Enrollment>>;
    /// Confirmed enrollments of a class.
    async fn list_by_class(&self, class_id: Uuid) -> AppResult<Vec<Enrollment>>;
    /// Number of confirmed enrollments of a class.
    async fn count_confirmed(&self, class_id: Uuid) -> AppResult<i64>;
}

/// Clubs.
#[async_trait]
pub trait ClubStore: Send + Sync + Debug {
    /// Insert an active club.
    async fn create(&self, data: &NewClub) -> AppResult<Club>;
    /// Find a club by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Club>>;
    /// Page through clubs ordered by name.
    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Club>>;
    /// Apply a partial update.
    async fn update(&self, id: Uuid, patch: &ClubPatch) -> AppResult<Club>;
    /// Delete a club with no membership history (`CLUB_HAS_MEMBERS`).
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Club memberships.
#[async_trait]
pub trait MembershipStore: Send + Sync + Debug {
    /// Atomically add an active member: duplicate pairs are `ALREADY_MEMBER`
    /// and a club at `max_members` active members is `CLUB_FULL`.
    async fn add(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        next_billing_date: DateTime<Utc>,
    ) -> AppResult<ClubMembership>;
    /// Find a membership by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ClubMembership>>;
    /// Members of a club, oldest first.
    async fn list_by_club(&self, club_id: Uuid) -> AppResult<Vec<ClubMembership>>;
    /// Active members of a club.
    async fn count_active(&self, club_id: Uuid) -> AppResult<i64>;
    /// Set the status, and the end date when one is given.
    async fn set_status(
        &self,
        id: Uuid,
        status: MembershipStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<ClubMembership>;
    /// Record the outcome of a billing attempt.
    async fn record_billing(
        &self,
        id: Uuid,
        billing_status: BillingStatus,
        next_billing_date: Option<DateTime<Utc>>,
        last_payment_id: Option<Uuid>,
    ) -> AppResult<ClubMembership>;
}

/// Payments.
#[async_trait]
pub trait PaymentStore: Send + Sync + Debug {
    /// Record a payment.
    async fn create(&self, data: &NewPayment) -> AppResult<Payment>;
    /// Find a payment by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>>;
    /// A user's payments, newest first.
    async fn list_by_user(&self, user_id: Uuid, page: &PageRequest)
    -> AppResult<PageResponse<Payment>>;
    /// All payments, newest first.
    async fn list_all(&self, page: &PageRequest) -> AppResult<PageResponse<Payment>>;
    /// Set the payment status.
    async fn set_status(&self, id: Uuid, status: PaymentStatus) -> AppResult<Payment>;
}
