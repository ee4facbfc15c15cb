//! Clubs, their memberships, and monthly renewal.

pub mod membership;
pub mod renewal;
pub mod service;

pub use membership::MembershipService;
pub use renewal::RenewalService;
pub use service::{ClubService, ClubSummary, CreateClubRequest};
