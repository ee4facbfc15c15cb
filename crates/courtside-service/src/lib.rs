//! # courtside-service
//!
//! Business logic service layer for Courtside. Each service orchestrates
//! the store traits, the availability engine, and auth primitives to
//! implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`ServiceRegistry`] wires the
//! full set from a [`StoreSet`](courtside_database::StoreSet).

pub mod availability;
pub mod booking;
pub mod class;
pub mod club;
pub mod context;
pub mod payment;
pub mod pista;
pub mod registry;
pub mod sweep;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use availability::{AvailabilityEngine, SchedulingRules};
pub use booking::BookingService;
pub use class::{ClassService, EnrollmentService};
pub use club::{ClubService, MembershipService, RenewalService};
pub use context::RequestContext;
pub use payment::{MockGateway, PaymentGateway, PaymentService};
pub use pista::PistaService;
pub use registry::ServiceRegistry;
pub use sweep::{SweepReport, SweepService};
pub use user::{StoreUserLookup, UserLookup, UserService};
