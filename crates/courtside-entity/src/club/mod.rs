//! Club and membership entities.

pub mod membership;
pub mod model;

pub use membership::{BillingStatus, ClubMembership, MembershipStatus};
pub use model::{Club, ClubPatch, ClubStatus, NewClub};
