//! The availability engine: does an interval on a pista collide with a
//! non-cancelled booking or class?

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use courtside_core::error::{AppError, codes};
use courtside_core::result::AppResult;
use courtside_core::types::TimeRange;
use courtside_database::store::{AllocationStore, PistaStore};
use courtside_entity::allocation::{Allocation, AllocationKind, AllocationRef};
use courtside_entity::pista::Pista;

/// Pre-insert overlap check across bookings and classes.
///
/// This is a fast path that produces a descriptive error. The store
/// re-validates at write time, so a slot taken between the check and the
/// insert still surfaces as `SLOT_TAKEN_CONCURRENTLY`.
#[derive(Debug, Clone)]
pub struct AvailabilityEngine {
    pistas: Arc<dyn PistaStore>,
    allocations: Arc<dyn AllocationStore>,
}

impl AvailabilityEngine {
    /// Creates a new engine.
    pub fn new(pistas: Arc<dyn PistaStore>, allocations: Arc<dyn AllocationStore>) -> Self {
        Self {
            pistas,
            allocations,
        }
    }

    /// Raw-bound entry point; `end <= start` is a validation error.
    pub async fn check_interval(
        &self,
        pista_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<AllocationRef>,
    ) -> AppResult<()> {
        let range = TimeRange::new(start, end)?;
        self.check_available(pista_id, &range, exclude).await
    }

    /// `Ok(())` when nothing but `exclude` holds any part of `range`.
    ///
    /// The error names the kind and ID of the earliest blocking allocation.
    pub async fn check_available(
        &self,
        pista_id: Uuid,
        range: &TimeRange,
        exclude: Option<AllocationRef>,
    ) -> AppResult<()> {
        self.require_pista(pista_id).await?;

        let blocking = self
            .allocations
            .find_overlapping(pista_id, range, exclude)
            .await?;
        match blocking.first() {
            None => Ok(()),
            Some(hit) => {
                debug!(
                    pista_id = %pista_id,
                    blocking_kind = %hit.reference.kind,
                    blocking_id = %hit.reference.id,
                    "Availability check failed"
                );
                Err(conflict(hit))
            }
        }
    }

    /// Find a pista or fail with not-found.
    pub async fn require_pista(&self, pista_id: Uuid) -> AppResult<Pista> {
        self.pistas
            .find_by_id(pista_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Pista {pista_id} not found")))
    }
}

fn conflict(hit: &Allocation) -> AppError {
    let code = match hit.reference.kind {
        AllocationKind::Booking => codes::BOOKING_CONFLICT,
        AllocationKind::Class => codes::CLASS_CONFLICT,
    };
    AppError::conflict(format!(
        "Pista is already taken by {} {} from {} to {}",
        hit.reference.kind,
        hit.reference.id,
        hit.start_time.to_rfc3339(),
        hit.end_time.to_rfc3339()
    ))
    .with_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use courtside_database::MemoryStore;
    use courtside_database::store::{BookingStore, ClassStore};
    use courtside_entity::booking::{BookingStatus, NewBooking};
    use courtside_entity::class::NewClass;
    use courtside_entity::pista::CreatePista;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2032, 6, 1, h, m, 0).unwrap()
    }

    async fn setup() -> (Arc<MemoryStore>, AvailabilityEngine, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let pista = PistaStore::create(
            store.as_ref(),
            &CreatePista {
                slug: "pista-1".into(),
                name: "Pista 1".into(),
                court_type: "padel".into(),
                surface: None,
                location_info: None,
                base_price_cents: 2000,
            },
        )
        .await
        .unwrap();
        let engine = AvailabilityEngine::new(store.clone(), store.clone());
        (store, engine, pista.id)
    }

    async fn book(store: &MemoryStore, pista_id: Uuid, s: DateTime<Utc>, e: DateTime<Utc>) -> Uuid {
        BookingStore::insert(
            store,
            &NewBooking {
                user_id: Uuid::now_v7(),
                pista_id,
                start_time: s,
                end_time: e,
                price_snapshot_cents: 2000,
                notes: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn inverted_interval_is_validation_not_conflict() {
        let (_, engine, pista_id) = setup().await;
        let err = engine
            .check_interval(pista_id, at(11, 0), at(10, 0), None)
            .await
            .unwrap_err();
        assert!(err.has_code(codes::INVALID_INTERVAL));
    }

    #[tokio::test]
    async fn reports_kind_of_blocker() {
        let (store, engine, pista_id) = setup().await;
        book(&store, pista_id, at(10, 0), at(11, 0)).await;
        ClassStore::insert(
            store.as_ref(),
            &NewClass {
                slug: "yoga".into(),
                pista_id,
                instructor_id: Uuid::now_v7(),
                title: "Yoga".into(),
                description: None,
                start_time: at(12, 0),
                end_time: at(13, 0),
                max_capacity: 10,
                price_cents: 500,
            },
        )
        .await
        .unwrap();

        let err = engine
            .check_interval(pista_id, at(10, 30), at(11, 30), None)
            .await
            .unwrap_err();
        assert!(err.has_code(codes::BOOKING_CONFLICT));

        let err = engine
            .check_interval(pista_id, at(11, 30), at(12, 30), None)
            .await
            .unwrap_err();
        assert!(err.has_code(codes::CLASS_CONFLICT));

        engine
            .check_interval(pista_id, at(11, 0), at(12, 0), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancellation_frees_slot_and_edit_excludes_self() {
        let (store, engine, pista_id) = setup().await;
        let id = book(&store, pista_id, at(10, 0), at(12, 0)).await;

        engine
            .check_interval(pista_id, at(11, 0), at(13, 0), Some(AllocationRef::booking(id)))
            .await
            .unwrap();

        BookingStore::set_status(store.as_ref(), id, BookingStatus::Cancelled)
            .await
            .unwrap();
        engine
            .check_interval(pista_id, at(10, 0), at(12, 0), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_pista_is_not_found() {
        let (_, engine, _) = setup().await;
        let err = engine
            .check_interval(Uuid::now_v7(), at(10, 0), at(11, 0), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, courtside_core::ErrorKind::NotFound);
    }

    /// A candidate is accepted iff it is disjoint from every live interval.
    #[tokio::test]
    async fn accepts_exactly_the_disjoint_candidates() {
        let (store, engine, pista_id) = setup().await;

        // Deterministic pseudo-random layout over a 14-hour day in 15-minute steps.
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = move |bound: u64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed % bound
        };
        let day = at(9, 0);
        let mut live: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();

        for _ in 0..200 {
            let start = day + Duration::minutes(15 * next(52) as i64);
            let end = start + Duration::minutes(15 * (1 + next(8)) as i64);
            let disjoint = live.iter().all(|(s, e)| !(start < *e && *s < end));

            let checked = engine.check_interval(pista_id, start, end, None).await;
            assert_eq!(checked.is_ok(), disjoint, "candidate {start}..{end}");

            if disjoint {
                let id = book(&store, pista_id, start, end).await;
                if next(4) == 0 {
                    BookingStore::set_status(store.as_ref(), id, BookingStatus::Cancelled)
                        .await
                        .unwrap();
                } else {
                    live.push((start, end));
                }
            }
        }
    }
}
