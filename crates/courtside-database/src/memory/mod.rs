//! In-memory store using a Tokio mutex for single-node deployments and tests.
//!
//! One lock guards every table, so a check and the write that depends on it
//! (overlap, capacity, token hash) happen atomically, mirroring what the
//! PostgreSQL constraints and row locks guarantee.

mod allocation;
mod club;
mod payment;
mod pista;
mod session;
mod user;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use courtside_core::types::TimeRange;
use courtside_entity::allocation::{Allocation, AllocationRef};
use courtside_entity::booking::Booking;
use courtside_entity::class::{Class, Enrollment};
use courtside_entity::club::{Club, ClubMembership};
use courtside_entity::payment::Payment;
use courtside_entity::pista::Pista;
use courtside_entity::session::RefreshSession;
use courtside_entity::user::User;

/// Every table, keyed by primary key.
#[derive(Debug, Default)]
struct InnerState {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, RefreshSession>,
    pistas: HashMap<Uuid, Pista>,
    bookings: HashMap<Uuid, Booking>,
    classes: HashMap<Uuid, Class>,
    enrollments: HashMap<Uuid, Enrollment>,
    clubs: HashMap<Uuid, Club>,
    memberships: HashMap<Uuid, ClubMembership>,
    payments: HashMap<Uuid, Payment>,
}

impl InnerState {
    /// Slot-holding allocations on a pista overlapping `range`.
    fn overlapping(
        &self,
        pista_id: Uuid,
        range: &TimeRange,
        exclude: Option<AllocationRef>,
    ) -> Vec<Allocation> {
        let bookings = self
            .bookings
            .values()
            .filter(|b| b.pista_id == pista_id && b.holds_slot())
            .map(Allocation::from);
        let classes = self
            .classes
            .values()
            .filter(|c| c.pista_id == pista_id && c.status.holds_slot())
            .map(Allocation::from);

        let mut found: Vec<Allocation> = bookings
            .chain(classes)
            .filter(|a| Some(a.reference) != exclude)
            .filter(|a| range.overlaps_bounds(a.start_time, a.end_time))
            .collect();
        found.sort_by_key(|a| a.start_time);
        found
    }

    /// Write-time re-check standing in for the exclusion constraint.
    fn slot_is_free(&self, pista_id: Uuid, range: &TimeRange, own: Option<AllocationRef>) -> bool {
        self.overlapping(pista_id, range, own).is_empty()
    }
}

/// Process-local implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sort newest-first by a timestamp.
fn newest_first<T, F>(mut items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    items
}
