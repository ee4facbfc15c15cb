//! PostgreSQL implementations of the store traits.

pub mod allocation;
pub mod booking;
pub mod class;
pub mod club;
pub mod enrollment;
pub mod membership;
pub mod payment;
pub mod pista;
pub mod session;
pub mod user;

pub use allocation::AllocationRepository;
pub use booking::BookingRepository;
pub use class::ClassRepository;
pub use club::ClubRepository;
pub use enrollment::EnrollmentRepository;
pub use membership::MembershipRepository;
pub use payment::PaymentRepository;
pub use pista::PistaRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use courtside_core::AppError;
use courtside_core::error::codes;

/// The exclusion constraint over `pista_slots`.
pub(crate) const SLOT_CONSTRAINT: &str = "pista_slots_no_overlap";

/// Write-time overlap detected by the storage layer.
pub(crate) fn slot_taken() -> AppError {
    AppError::conflict("The time slot was taken by another request; please pick another slot")
        .with_code(codes::SLOT_TAKEN_CONCURRENTLY)
}

pub(crate) fn capacity_below_enrolled(enrolled: i64) -> AppError {
    AppError::validation(format!(
        "Capacity cannot be lower than the {enrolled} enrolled students"
    ))
}
