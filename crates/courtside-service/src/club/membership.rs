//! Club membership lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use tracing::info;
use uuid::Uuid;

use courtside_auth::rbac::{Capability, RbacEnforcer};
use courtside_core::error::{AppError, codes};
use courtside_core::result::AppResult;
use courtside_database::store::{ClubStore, MembershipStore};
use courtside_entity::club::{Club, ClubMembership, MembershipStatus};
use courtside_entity::user::UserRole;

use crate::context::RequestContext;
use crate::user::UserLookup;

#[derive(Debug, Clone)]
pub struct MembershipService {
    memberships: Arc<dyn MembershipStore>,
    clubs: Arc<dyn ClubStore>,
    users: Arc<dyn UserLookup>,
    rbac: Arc<RbacEnforcer>,
}

impl MembershipService {
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        clubs: Arc<dyn ClubStore>,
        users: Arc<dyn UserLookup>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            memberships,
            clubs,
            users,
            rbac,
        }
    }

    /// Add a member. With no slug the caller joins; otherwise club staff add
    /// `user_slug`. Only users who may join clubs can become members.
    pub async fn add(
        &self,
        ctx: &RequestContext,
        club_id: Uuid,
        user_slug: Option<&str>,
    ) -> AppResult<ClubMembership> {
        let target = match user_slug {
            None => {
                self.rbac.require(ctx.role, Capability::JoinClubs)?;
                self.find_club(club_id).await?;
                ctx.user_id
            }
            Some(slug) => {
                self.find_managed_club(ctx, club_id).await?;
                let user = self
                    .users
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("User {slug} not found")))?;
                if !self.rbac.allows(user.role, Capability::JoinClubs) {
                    return Err(AppError::validation("Only clients can join clubs"));
                }
                user.id
            }
        };

        let next_billing = one_month_after(ctx.request_time)?;
        let membership = self.memberships.add(club_id, target, next_billing).await?;
        info!(
            membership_id = %membership.id,
            club_id = %club_id,
            user_id = %target,
            actor = %ctx.user_id,
            "Member added"
        );
        Ok(membership)
    }

    /// Memberships of a club, for its managers.
    pub async fn list_members(
        &self,
        ctx: &RequestContext,
        club_id: Uuid,
    ) -> AppResult<Vec<ClubMembership>> {
        self.find_managed_club(ctx, club_id).await?;
        self.memberships.list_by_club(club_id).await
    }

    pub async fn suspend(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ClubMembership> {
        let membership = self.find_managed(ctx, id).await?;
        if membership.status != MembershipStatus::Active {
            return Err(invalid_state(membership.status));
        }
        self.transition(ctx, id, MembershipStatus::Suspended, None).await
    }

    /// Reactivate a suspended or cancelled membership if the club has room.
    /// Expired memberships stay expired.
    pub async fn activate(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ClubMembership> {
        let membership = self.find_managed(ctx, id).await?;
        match membership.status {
            MembershipStatus::Active | MembershipStatus::Expired => {
                return Err(invalid_state(membership.status));
            }
            MembershipStatus::Suspended | MembershipStatus::Cancelled => {}
        }

        let club = self.find_club(membership.club_id).await?;
        let active = self.memberships.count_active(club.id).await?;
        if active >= i64::from(club.max_members) {
            return Err(AppError::conflict("Club is full").with_code(codes::CLUB_FULL));
        }
        self.transition(ctx, id, MembershipStatus::Active, None).await
    }

    /// Cancel a membership. The member may cancel their own.
    pub async fn cancel(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ClubMembership> {
        let membership = self.find(id).await?;
        if membership.user_id != ctx.user_id {
            self.find_managed_club(ctx, membership.club_id).await?;
        }
        if membership.status == MembershipStatus::Cancelled {
            return Err(AppError::conflict("Membership is already cancelled")
                .with_code(codes::INVALID_STATE));
        }
        self.transition(ctx, id, MembershipStatus::Cancelled, Some(ctx.request_time))
            .await
    }

    /// Move the next billing date of an active membership.
    pub async fn update_next_billing(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        next_billing_date: DateTime<Utc>,
    ) -> AppResult<ClubMembership> {
        let membership = self.find_managed(ctx, id).await?;
        if membership.status != MembershipStatus::Active {
            return Err(invalid_state(membership.status));
        }
        self.memberships
            .record_billing(id, membership.billing_status, Some(next_billing_date), None)
            .await
    }

    /// A membership visible to the caller: their own, or any in a club they
    /// manage.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ClubMembership> {
        let membership = self.find(id).await?;
        if membership.user_id != ctx.user_id {
            self.find_managed_club(ctx, membership.club_id).await?;
        }
        Ok(membership)
    }

    async fn transition(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: MembershipStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<ClubMembership> {
        let updated = self.memberships.set_status(id, status, end_date).await?;
        info!(membership_id = %id, status = ?status, actor = %ctx.user_id, "Membership status changed");
        Ok(updated)
    }

    async fn find(&self, id: Uuid) -> AppResult<ClubMembership> {
        self.memberships
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Membership {id} not found")))
    }

    async fn find_managed(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ClubMembership> {
        let membership = self.find(id).await?;
        self.find_managed_club(ctx, membership.club_id).await?;
        Ok(membership)
    }

    async fn find_club(&self, id: Uuid) -> AppResult<Club> {
        self.clubs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Club {id} not found")))
    }

    async fn find_managed_club(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Club> {
        self.rbac.require(ctx.role, Capability::ManageClubs)?;
        let club = self.find_club(id).await?;
        if ctx.role == UserRole::Club && club.owner_id != ctx.user_id {
            return Err(AppError::authorization("Only the club owner can manage members"));
        }
        Ok(club)
    }
}

/// Same day next month, clamped to the month's last day.
pub(crate) fn one_month_after(from: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    from.checked_add_months(Months::new(1))
        .ok_or_else(|| AppError::internal("Billing date out of range"))
}

fn invalid_state(status: MembershipStatus) -> AppError {
    AppError::conflict(format!("Membership is {status:?}")).with_code(codes::INVALID_STATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use courtside_core::ErrorKind;
    use courtside_entity::club::NewClub;

    use crate::testing::Fixture;
    use crate::user::StoreUserLookup;

    fn service(f: &Fixture) -> MembershipService {
        MembershipService::new(
            f.stores.memberships.clone(),
            f.stores.clubs.clone(),
            Arc::new(StoreUserLookup::new(f.stores.users.clone())),
            f.rbac.clone(),
        )
    }

    async fn club(f: &Fixture, owner: &RequestContext, max: i32) -> Club {
        f.stores
            .clubs
            .create(&NewClub {
                slug: format!("club-{}", Uuid::new_v4().simple()),
                owner_id: owner.user_id,
                name: "Drop Shot".into(),
                description: None,
                max_members: max,
                monthly_fee_cents: 2500,
            })
            .await
            .unwrap()
    }

    async fn slug_of(f: &Fixture, ctx: &RequestContext) -> String {
        f.stores.users.find_by_id(ctx.user_id).await.unwrap().unwrap().slug
    }

    #[test]
    fn billing_date_clamps_to_month_end() {
        let jan31 = Utc.with_ymd_and_hms(2031, 1, 31, 12, 0, 0).unwrap();
        let next = one_month_after(jan31).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2031, 2, 28, 12, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn join_rules() {
        let f = Fixture::new();
        let svc = service(&f);
        let owner = f.actor(UserRole::Club).await;
        let club = club(&f, &owner, 1).await;
        let ana = f.actor(UserRole::Client).await;
        let bo = f.actor(UserRole::Client).await;

        let m = svc.add(&ana, club.id, None).await.unwrap();
        assert_eq!(m.status, MembershipStatus::Active);
        assert_eq!(
            m.next_billing_date,
            Some(one_month_after(ana.request_time).unwrap())
        );

        let dup = svc.add(&ana, club.id, None).await.unwrap_err();
        assert!(dup.has_code(codes::ALREADY_MEMBER));
        let full = svc.add(&bo, club.id, None).await.unwrap_err();
        assert!(full.has_code(codes::CLUB_FULL));

        let monitor = f.actor(UserRole::Monitor).await;
        let slug = slug_of(&f, &monitor).await;
        let not_client = svc.add(&owner, club.id, Some(&slug)).await.unwrap_err();
        assert_eq!(not_client.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn lifecycle_transitions() {
        let f = Fixture::new();
        let svc = service(&f);
        let owner = f.actor(UserRole::Club).await;
        let club = club(&f, &owner, 5).await;
        let member = f.actor(UserRole::Client).await;
        let slug = slug_of(&f, &member).await;

        let m = svc.add(&owner, club.id, Some(&slug)).await.unwrap();
        assert_eq!(m.user_id, member.user_id);

        let suspended = svc.suspend(&owner, m.id).await.unwrap();
        assert_eq!(suspended.status, MembershipStatus::Suspended);
        let moved = svc
            .update_next_billing(&owner, m.id, Utc::now())
            .await
            .unwrap_err();
        assert!(moved.has_code(codes::INVALID_STATE));

        svc.activate(&owner, m.id).await.unwrap();
        let cancelled = svc.cancel(&member, m.id).await.unwrap();
        assert_eq!(cancelled.status, MembershipStatus::Cancelled);
        assert!(cancelled.end_date.is_some());
        let again = svc.cancel(&member, m.id).await.unwrap_err();
        assert!(again.has_code(codes::INVALID_STATE));

        f.stores
            .memberships
            .set_status(m.id, MembershipStatus::Expired, None)
            .await
            .unwrap();
        let expired = svc.activate(&owner, m.id).await.unwrap_err();
        assert!(expired.has_code(codes::INVALID_STATE));
    }

    #[tokio::test]
    async fn other_club_owner_is_rejected() {
        let f = Fixture::new();
        let svc = service(&f);
        let owner = f.actor(UserRole::Club).await;
        let rival = f.actor(UserRole::Club).await;
        let club = club(&f, &owner, 5).await;
        let member = f.actor(UserRole::Client).await;
        let m = svc.add(&member, club.id, None).await.unwrap();

        let err = svc.suspend(&rival, m.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(svc.list_members(&owner, club.id).await.unwrap().len(), 1);
        assert_eq!(svc.get(&member, m.id).await.unwrap().id, m.id);
    }
}
