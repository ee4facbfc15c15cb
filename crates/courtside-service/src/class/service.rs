//! Class scheduling. A class occupies its pista exactly like a booking
//! does, so every write is checked by the availability engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use courtside_auth::rbac::{Capability, RbacEnforcer};
use courtside_core::error::{AppError, codes};
use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse, TimeRange};
use courtside_database::store::{ClassStore, EnrollmentStore};
use courtside_entity::allocation::AllocationRef;
use courtside_entity::class::{Class, ClassPatch, ClassStatus, NewClass};
use courtside_entity::slug::slugify;
use courtside_entity::user::UserRole;

use crate::availability::{AvailabilityEngine, SchedulingRules};
use crate::context::RequestContext;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClassRequest {
    pub pista_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_capacity: i32,
    pub price_cents: i64,
}

/// Full replacement of a class's editable fields. The pista is fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClassRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_capacity: i32,
    pub price_cents: i64,
}

/// A class together with its confirmed head count.
#[derive(Debug, Clone, Serialize)]
pub struct ClassDetail {
    #[serde(flatten)]
    pub class: Class,
    pub enrolled_count: i64,
}

#[derive(Debug, Clone)]
pub struct ClassService {
    classes: Arc<dyn ClassStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    engine: Arc<AvailabilityEngine>,
    rules: Arc<SchedulingRules>,
    rbac: Arc<RbacEnforcer>,
}

impl ClassService {
    pub fn new(
        classes: Arc<dyn ClassStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        engine: Arc<AvailabilityEngine>,
        rules: Arc<SchedulingRules>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            classes,
            enrollments,
            engine,
            rules,
            rbac,
        }
    }

    /// Schedule a class taught by the caller.
    pub async fn create(&self, ctx: &RequestContext, req: CreateClassRequest) -> AppResult<Class> {
        self.rbac.require(ctx.role, Capability::ManageClasses)?;
        let title = required_title(&req.title)?;
        let range = TimeRange::new(req.start_time, req.end_time)?;
        self.rules.check_class(&range, ctx.request_time)?;
        self.rules.check_capacity(req.max_capacity)?;
        check_price(req.price_cents)?;

        let pista = self.engine.require_pista(req.pista_id).await?;
        if !pista.is_active {
            return Err(AppError::validation("Pista is not available for classes"));
        }
        self.engine.check_available(pista.id, &range, None).await?;

        let class = self
            .classes
            .insert(&NewClass {
                slug: slugify(title),
                pista_id: pista.id,
                instructor_id: ctx.user_id,
                title: title.to_string(),
                description: req.description,
                start_time: range.start(),
                end_time: range.end(),
                max_capacity: req.max_capacity,
                price_cents: req.price_cents,
            })
            .await?;

        info!(
            class_id = %class.id,
            pista_id = %pista.id,
            instructor_id = %ctx.user_id,
            capacity = class.max_capacity,
            "Class scheduled"
        );
        Ok(class)
    }

    /// Class with its current confirmed enrollment count.
    pub async fn get(&self, id: Uuid) -> AppResult<ClassDetail> {
        let class = self.find(id).await?;
        let enrolled_count = self.enrollments.count_confirmed(id).await?;
        Ok(ClassDetail {
            class,
            enrolled_count,
        })
    }

    /// Classes starting from now on.
    pub async fn list_upcoming(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Class>> {
        self.classes.list_upcoming(ctx.request_time, page).await
    }

    /// Replace a class's editable fields. Capacity may not drop below the
    /// number of confirmed enrollments.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateClassRequest,
    ) -> AppResult<Class> {
        let class = self.find_managed(ctx, id).await?;
        if class.status.is_terminal() {
            return Err(invalid_state(class.status));
        }

        let title = required_title(&req.title)?;
        let range = TimeRange::new(req.start_time, req.end_time)?;
        self.rules.check_class(&range, ctx.request_time)?;
        self.rules.check_capacity(req.max_capacity)?;
        check_price(req.price_cents)?;

        self.engine
            .check_available(class.pista_id, &range, Some(AllocationRef::class(id)))
            .await?;

        let updated = self
            .classes
            .update(
                id,
                &ClassPatch {
                    title: title.to_string(),
                    description: req.description,
                    start_time: range.start(),
                    end_time: range.end(),
                    max_capacity: req.max_capacity,
                    price_cents: req.price_cents,
                },
            )
            .await?;
        info!(class_id = %id, actor = %ctx.user_id, "Class updated");
        Ok(updated)
    }

    /// Cancel a class and free its slot.
    pub async fn cancel(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Class> {
        let class = self.find_managed(ctx, id).await?;
        if class.status.is_terminal() {
            return Err(invalid_state(class.status));
        }
        let cancelled = self.classes.set_status(id, ClassStatus::Cancelled).await?;
        info!(class_id = %id, actor = %ctx.user_id, "Class cancelled");
        Ok(cancelled)
    }

    /// Close enrollment and mark the class as running.
    pub async fn begin(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Class> {
        let class = self.find_managed(ctx, id).await?;
        if class.status != ClassStatus::Open {
            return Err(invalid_state(class.status));
        }
        self.classes.set_status(id, ClassStatus::InProgress).await
    }

    async fn find(&self, id: Uuid) -> AppResult<Class> {
        self.classes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Class {id} not found")))
    }

    /// Monitors may only touch their own classes; managers and admins any.
    async fn find_managed(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Class> {
        self.rbac.require(ctx.role, Capability::ManageClasses)?;
        let class = self.find(id).await?;
        let supervisor = matches!(ctx.role, UserRole::Admin | UserRole::Manager);
        if class.instructor_id != ctx.user_id && !supervisor {
            return Err(AppError::authorization(
                "Only the instructor can change this class",
            ));
        }
        Ok(class)
    }
}

fn required_title(title: &str) -> AppResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Class title is required"));
    }
    Ok(title)
}

fn check_price(cents: i64) -> AppResult<()> {
    if cents < 0 {
        return Err(AppError::validation("Price cannot be negative"));
    }
    Ok(())
}

fn invalid_state(status: ClassStatus) -> AppError {
    AppError::conflict(format!("Class is {status:?}")).with_code(codes::INVALID_STATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::booking::{BookingService, CreateBookingRequest};
    use crate::testing::{Fixture, tomorrow_at};

    fn service(f: &Fixture) -> ClassService {
        ClassService::new(
            f.stores.classes.clone(),
            f.stores.enrollments.clone(),
            f.engine.clone(),
            f.rules.clone(),
            f.rbac.clone(),
        )
    }

    fn request(pista_id: Uuid, start: u32, end: u32, capacity: i32) -> CreateClassRequest {
        CreateClassRequest {
            pista_id,
            title: "Morning Drills".into(),
            description: None,
            start_time: tomorrow_at(start, 0),
            end_time: tomorrow_at(end, 0),
            max_capacity: capacity,
            price_cents: 1500,
        }
    }

    #[tokio::test]
    async fn class_and_booking_share_the_slot() {
        let f = Fixture::new();
        let classes = service(&f);
        let bookings = BookingService::new(
            f.stores.bookings.clone(),
            f.engine.clone(),
            f.rules.clone(),
            f.rbac.clone(),
        );
        let monitor = f.actor(UserRole::Monitor).await;
        let client = f.actor(UserRole::Client).await;
        let pista = f.pista(1000).await;

        let class = classes.create(&monitor, request(pista.id, 10, 11, 4)).await.unwrap();
        assert_eq!(class.instructor_id, monitor.user_id);
        assert!(class.slug.starts_with("morning-drills-"));

        let err = bookings
            .create(
                &client,
                CreateBookingRequest {
                    pista_id: pista.id,
                    start_time: tomorrow_at(10, 0),
                    end_time: tomorrow_at(11, 0),
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.has_code(codes::CLASS_CONFLICT));

        classes.cancel(&monitor, class.id).await.unwrap();
        bookings
            .create(
                &client,
                CreateBookingRequest {
                    pista_id: pista.id,
                    start_time: tomorrow_at(10, 0),
                    end_time: tomorrow_at(11, 0),
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn only_class_managers_schedule() {
        let f = Fixture::new();
        let classes = service(&f);
        let client = f.actor(UserRole::Client).await;
        let pista = f.pista(1000).await;

        let err = classes.create(&client, request(pista.id, 10, 11, 4)).await.unwrap_err();
        assert_eq!(err.kind, courtside_core::ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn capacity_cannot_drop_below_enrolled() {
        let f = Fixture::new();
        let classes = service(&f);
        let monitor = f.actor(UserRole::Monitor).await;
        let pista = f.pista(1000).await;
        let class = classes.create(&monitor, request(pista.id, 10, 11, 3)).await.unwrap();

        for _ in 0..2 {
            let student = f.actor(UserRole::Client).await;
            f.stores.enrollments.enroll(class.id, student.user_id).await.unwrap();
        }
        assert_eq!(classes.get(class.id).await.unwrap().enrolled_count, 2);

        let shrink = |capacity| UpdateClassRequest {
            title: "Morning Drills".into(),
            description: Some("moved".into()),
            start_time: tomorrow_at(10, 30),
            end_time: tomorrow_at(11, 30),
            max_capacity: capacity,
            price_cents: 1500,
        };
        assert!(classes.update(&monitor, class.id, shrink(1)).await.is_err());
        let updated = classes.update(&monitor, class.id, shrink(2)).await.unwrap();
        assert_eq!(updated.max_capacity, 2);
        assert_eq!(updated.start_time, tomorrow_at(10, 30));
    }

    #[tokio::test]
    async fn other_monitor_cannot_touch_class() {
        let f = Fixture::new();
        let classes = service(&f);
        let owner = f.actor(UserRole::Monitor).await;
        let other = f.actor(UserRole::Monitor).await;
        let manager = f.actor(UserRole::Manager).await;
        let pista = f.pista(1000).await;
        let class = classes.create(&owner, request(pista.id, 12, 13, 5)).await.unwrap();

        assert!(classes.cancel(&other, class.id).await.is_err());
        let started = classes.begin(&manager, class.id).await.unwrap();
        assert_eq!(started.status, ClassStatus::InProgress);
        let again = classes.begin(&owner, class.id).await.unwrap_err();
        assert!(again.has_code(codes::INVALID_STATE));
    }
}
