//! The bundle of stores handed to every service at construction.

use std::sync::Arc;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{
    AllocationRepository, BookingRepository, ClassRepository, ClubRepository,
    EnrollmentRepository, MembershipRepository, PaymentRepository, PistaRepository,
    SessionRepository, UserRepository,
};
use crate::store::{
    AllocationStore, BookingStore, ClassStore, ClubStore, EnrollmentStore, MembershipStore,
    PaymentStore, PistaStore, SessionStore, UserStore,
};

/// One handle per store trait.
///
/// Cheap to clone; every field is an `Arc`.
#[derive(Debug, Clone)]
pub struct StoreSet {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub pistas: Arc<dyn PistaStore>,
    pub allocations: Arc<dyn AllocationStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub classes: Arc<dyn ClassStore>,
    pub enrollments: Arc<dyn EnrollmentStore>,
    pub clubs: Arc<dyn ClubStore>,
    pub memberships: Arc<dyn MembershipStore>,
    pub payments: Arc<dyn PaymentStore>,
    /// The pool behind the PostgreSQL stores, if any.
    pub pool: Option<DatabasePool>,
}

impl StoreSet {
    /// Repositories backed by a PostgreSQL pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            sessions: Arc::new(SessionRepository::new(pg.clone())),
            pistas: Arc::new(PistaRepository::new(pg.clone())),
            allocations: Arc::new(AllocationRepository::new(pg.clone())),
            bookings: Arc::new(BookingRepository::new(pg.clone())),
            classes: Arc::new(ClassRepository::new(pg.clone())),
            enrollments: Arc::new(EnrollmentRepository::new(pg.clone())),
            clubs: Arc::new(ClubRepository::new(pg.clone())),
            memberships: Arc::new(MembershipRepository::new(pg.clone())),
            payments: Arc::new(PaymentRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Every store backed by one shared [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    /// Wrap an existing memory store, e.g. one a test seeded.
    pub fn from_memory(store: MemoryStore) -> Self {
        let shared = Arc::new(store);
        Self {
            users: shared.clone(),
            sessions: shared.clone(),
            pistas: shared.clone(),
            allocations: shared.clone(),
            bookings: shared.clone(),
            classes: shared.clone(),
            enrollments: shared.clone(),
            clubs: shared.clone(),
            memberships: shared.clone(),
            payments: shared,
            pool: None,
        }
    }

    /// Report storage health; the memory backend is always healthy.
    pub async fn health_check(&self) -> bool {
        match &self.pool {
            Some(pool) => pool.health_check().await.unwrap_or(false),
            None => true,
        }
    }
}
