//! Enrollment in classes, guarded by the store's atomic capacity check.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use courtside_auth::rbac::{Capability, RbacEnforcer};
use courtside_core::error::AppError;
use courtside_core::result::AppResult;
use courtside_database::store::{ClassStore, EnrollmentStore};
use courtside_entity::class::Enrollment;
use courtside_entity::user::UserRef;

use crate::context::RequestContext;
use crate::user::UserLookup;

#[derive(Debug, Clone)]
pub struct EnrollmentService {
    enrollments: Arc<dyn EnrollmentStore>,
    classes: Arc<dyn ClassStore>,
    users: Arc<dyn UserLookup>,
    rbac: Arc<RbacEnforcer>,
}

impl EnrollmentService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentStore>,
        classes: Arc<dyn ClassStore>,
        users: Arc<dyn UserLookup>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            enrollments,
            classes,
            users,
            rbac,
        }
    }

    /// Enroll `user_slug` (or the caller when `None`) in a class.
    ///
    /// A duplicate enrollment is reported as `ALREADY_ENROLLED` even when the
    /// class is also full.
    pub async fn enroll(
        &self,
        ctx: &RequestContext,
        class_id: Uuid,
        user_slug: Option<&str>,
    ) -> AppResult<Enrollment> {
        self.require_class(class_id).await?;
        let target = self.resolve(ctx, user_slug).await?;
        self.authorize(ctx, &target)?;

        match self.enrollments.enroll(class_id, target.id).await {
            Ok(enrollment) => {
                info!(
                    class_id = %class_id,
                    user_id = %target.id,
                    actor = %ctx.user_id,
                    "Enrolled in class"
                );
                Ok(enrollment)
            }
            Err(e) => {
                warn!(class_id = %class_id, user_id = %target.id, code = ?e.code, "Enrollment rejected");
                Err(e)
            }
        }
    }

    /// Give up a seat. Absent enrollments are a not-found error.
    pub async fn unenroll(
        &self,
        ctx: &RequestContext,
        class_id: Uuid,
        user_slug: Option<&str>,
    ) -> AppResult<()> {
        self.require_class(class_id).await?;
        let target = self.resolve(ctx, user_slug).await?;
        self.authorize(ctx, &target)?;

        if !self.enrollments.unenroll(class_id, target.id).await? {
            return Err(AppError::not_found("Enrollment not found"));
        }
        info!(class_id = %class_id, user_id = %target.id, "Unenrolled from class");
        Ok(())
    }

    /// Confirmed students of a class.
    pub async fn list_for_class(
        &self,
        ctx: &RequestContext,
        class_id: Uuid,
    ) -> AppResult<Vec<Enrollment>> {
        self.rbac.require(ctx.role, Capability::ManageClasses)?;
        self.require_class(class_id).await?;
        self.enrollments.list_by_class(class_id).await
    }

    /// An enrollment the caller may see: their own, or any for class staff.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Enrollment> {
        let enrollment = self
            .enrollments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Enrollment {id} not found")))?;
        if enrollment.user_id != ctx.user_id {
            self.rbac.require(ctx.role, Capability::ManageClasses)?;
        }
        Ok(enrollment)
    }

    async fn require_class(&self, class_id: Uuid) -> AppResult<()> {
        self.classes
            .find_by_id(class_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Class {class_id} not found")))
    }

    async fn resolve(&self, ctx: &RequestContext, user_slug: Option<&str>) -> AppResult<UserRef> {
        match user_slug {
            None => Ok(UserRef {
                id: ctx.user_id,
                role: ctx.role,
            }),
            Some(slug) => self
                .users
                .find_by_slug(slug)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User {slug} not found"))),
        }
    }

    fn authorize(&self, ctx: &RequestContext, target: &UserRef) -> AppResult<()> {
        if target.id == ctx.user_id {
            self.rbac.require(ctx.role, Capability::EnrollClasses)
        } else {
            self.rbac.require(ctx.role, Capability::ManageClasses)
        }
    }
}
