//! Availability checks and scheduling rules for pista allocations.

pub mod engine;
pub mod rules;

pub use engine::AvailabilityEngine;
pub use rules::SchedulingRules;
