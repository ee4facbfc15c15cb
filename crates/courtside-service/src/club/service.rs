//! Club CRUD.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use courtside_auth::rbac::{Capability, RbacEnforcer};
use courtside_core::error::AppError;
use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse};
use courtside_database::store::{ClubStore, MembershipStore};
use courtside_entity::club::{Club, ClubPatch, NewClub};
use courtside_entity::slug::slugify;
use courtside_entity::user::UserRole;

use crate::context::RequestContext;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClubRequest {
    pub name: String,
    pub description: Option<String>,
    pub max_members: i32,
    pub monthly_fee_cents: i64,
}

/// A club with its active member count.
#[derive(Debug, Clone, Serialize)]
pub struct ClubSummary {
    #[serde(flatten)]
    pub club: Club,
    pub member_count: i64,
}

#[derive(Debug, Clone)]
pub struct ClubService {
    clubs: Arc<dyn ClubStore>,
    memberships: Arc<dyn MembershipStore>,
    rbac: Arc<RbacEnforcer>,
}

impl ClubService {
    pub fn new(
        clubs: Arc<dyn ClubStore>,
        memberships: Arc<dyn MembershipStore>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            clubs,
            memberships,
            rbac,
        }
    }

    /// Found a club owned by the caller.
    pub async fn create(&self, ctx: &RequestContext, req: CreateClubRequest) -> AppResult<Club> {
        self.rbac.require(ctx.role, Capability::ManageClubs)?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Club name is required"));
        }
        check_limits(Some(req.max_members), Some(req.monthly_fee_cents))?;

        let club = self
            .clubs
            .create(&NewClub {
                slug: slugify(name),
                owner_id: ctx.user_id,
                name: name.to_string(),
                description: req.description,
                max_members: req.max_members,
                monthly_fee_cents: req.monthly_fee_cents,
            })
            .await?;
        info!(club_id = %club.id, owner_id = %ctx.user_id, "Club created");
        Ok(club)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<ClubSummary> {
        let club = self.find(id).await?;
        self.summarize(club).await
    }

    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<ClubSummary>> {
        let clubs = self.clubs.list(page).await?;
        let items = try_join_all(clubs.items.into_iter().map(|club| self.summarize(club))).await?;
        Ok(PageResponse::new(
            items,
            clubs.page,
            clubs.page_size,
            clubs.total_items,
        ))
    }

    /// Partial update. `max_members` cannot drop below the active count.
    pub async fn update(&self, ctx: &RequestContext, id: Uuid, patch: ClubPatch) -> AppResult<Club> {
        let club = self.find_managed(ctx, id).await?;
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Club name cannot be empty"));
        }
        check_limits(patch.max_members, patch.monthly_fee_cents)?;
        if let Some(max) = patch.max_members {
            let active = self.memberships.count_active(club.id).await?;
            if i64::from(max) < active {
                return Err(AppError::validation(format!(
                    "Club already has {active} active members"
                )));
            }
        }

        let updated = self.clubs.update(id, &patch).await?;
        info!(club_id = %id, actor = %ctx.user_id, "Club updated");
        Ok(updated)
    }

    /// Delete a club that never had members.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        self.find_managed(ctx, id).await?;
        self.clubs.delete(id).await?;
        info!(club_id = %id, actor = %ctx.user_id, "Club deleted");
        Ok(())
    }

    /// Fetch a club the caller may administer. Club-role users only manage
    /// the clubs they own.
    pub async fn find_managed(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Club> {
        self.rbac.require(ctx.role, Capability::ManageClubs)?;
        let club = self.find(id).await?;
        if ctx.role == UserRole::Club && club.owner_id != ctx.user_id {
            return Err(AppError::authorization("Only the club owner can manage this club"));
        }
        Ok(club)
    }

    async fn find(&self, id: Uuid) -> AppResult<Club> {
        self.clubs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Club {id} not found")))
    }

    async fn summarize(&self, club: Club) -> AppResult<ClubSummary> {
        let member_count = self.memberships.count_active(club.id).await?;
        Ok(ClubSummary { club, member_count })
    }
}

fn check_limits(max_members: Option<i32>, fee_cents: Option<i64>) -> AppResult<()> {
    if max_members.is_some_and(|m| m < 1) {
        return Err(AppError::validation("A club needs room for at least one member"));
    }
    if fee_cents.is_some_and(|f| f < 0) {
        return Err(AppError::validation("Monthly fee cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courtside_core::ErrorKind;
    use courtside_core::error::codes;

    use crate::testing::Fixture;

    fn service(f: &Fixture) -> ClubService {
        ClubService::new(f.stores.clubs.clone(), f.stores.memberships.clone(), f.rbac.clone())
    }

    fn request(name: &str, max: i32) -> CreateClubRequest {
        CreateClubRequest {
            name: name.into(),
            description: None,
            max_members: max,
            monthly_fee_cents: 3000,
        }
    }

    #[tokio::test]
    async fn create_validates_and_slugs() {
        let f = Fixture::new();
        let svc = service(&f);
        let owner = f.actor(UserRole::Club).await;

        let club = svc.create(&owner, request("  Smash Brothers ", 10)).await.unwrap();
        assert!(club.slug.starts_with("smash-brothers-"));
        assert_eq!(club.owner_id, owner.user_id);

        assert!(svc.create(&owner, request("", 10)).await.is_err());
        assert!(svc.create(&owner, request("Empty", 0)).await.is_err());

        let client = f.actor(UserRole::Client).await;
        let denied = svc.create(&client, request("Nope", 5)).await.unwrap_err();
        assert_eq!(denied.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn owner_scoping_for_club_role() {
        let f = Fixture::new();
        let svc = service(&f);
        let owner = f.actor(UserRole::Club).await;
        let rival = f.actor(UserRole::Club).await;
        let manager = f.actor(UserRole::Manager).await;
        let club = svc.create(&owner, request("Net Gains", 10)).await.unwrap();

        let patch = ClubPatch {
            monthly_fee_cents: Some(4500),
            ..ClubPatch::default()
        };
        assert!(svc.update(&rival, club.id, patch.clone()).await.is_err());
        let updated = svc.update(&manager, club.id, patch).await.unwrap();
        assert_eq!(updated.monthly_fee_cents, 4500);
    }

    #[tokio::test]
    async fn delete_blocked_by_members_and_counts_reported() {
        let f = Fixture::new();
        let svc = service(&f);
        let owner = f.actor(UserRole::Club).await;
        let member = f.actor(UserRole::Client).await;
        let club = svc.create(&owner, request("Deuce", 10)).await.unwrap();

        f.stores
            .memberships
            .add(club.id, member.user_id, Utc::now())
            .await
            .unwrap();
        assert_eq!(svc.get(club.id).await.unwrap().member_count, 1);
        let listed = svc.list(&PageRequest::default()).await.unwrap();
        assert_eq!(listed.items[0].member_count, 1);

        let err = svc.delete(&owner, club.id).await.unwrap_err();
        assert!(err.has_code(codes::CLUB_HAS_MEMBERS));

        let shrink = ClubPatch {
            max_members: Some(0),
            ..ClubPatch::default()
        };
        assert!(svc.update(&owner, club.id, shrink).await.is_err());
    }
}
