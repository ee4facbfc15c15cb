use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use courtside_core::error::{AppError, codes};
use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse};
use courtside_entity::club::{
    BillingStatus, Club, ClubMembership, ClubPatch, ClubStatus, MembershipStatus, NewClub,
};

use super::MemoryStore;
use crate::store::{ClubStore, MembershipStore};

#[async_trait]
impl ClubStore for MemoryStore {
    async fn create(&self, data: &NewClub) -> AppResult<Club> {
        let mut state = self.state.lock().await;
        if state.clubs.values().any(|c| c.slug == data.slug) {
            return Err(AppError::conflict("Club slug already exists").with_code(codes::SLUG_TAKEN));
        }

        let now = Utc::now();
        let club = Club {
            id: Uuid::now_v7(),
            slug: data.slug.clone(),
            owner_id: data.owner_id,
            name: data.name.clone(),
            description: data.description.clone(),
            max_members: data.max_members,
            monthly_fee_cents: data.monthly_fee_cents,
            status: ClubStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state.clubs.insert(club.id, club.clone());
        Ok(club)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Club>> {
        Ok(self.state.lock().await.clubs.get(&id).cloned())
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Club>> {
        let state = self.state.lock().await;
        let mut clubs: Vec<Club> = state.clubs.values().cloned().collect();
        clubs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(PageResponse::from_slice(clubs, page))
    }

    async fn update(&self, id: Uuid, patch: &ClubPatch) -> AppResult<Club> {
        let mut state = self.state.lock().await;
        let club = state
            .clubs
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Club {id} not found")))?;
        club.apply(patch);
        club.updated_at = Utc::now();
        Ok(club.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.clubs.contains_key(&id) {
            return Err(AppError::not_found(format!("Club {id} not found")));
        }
        if state.memberships.values().any(|m| m.club_id == id) {
            return Err(
                AppError::conflict("Club still has members").with_code(codes::CLUB_HAS_MEMBERS)
            );
        }
        state.clubs.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn add(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        next_billing_date: DateTime<Utc>,
    ) -> AppResult<ClubMembership> {
        let mut state = self.state.lock().await;
        let club = state
            .clubs
            .get(&club_id)
            .ok_or_else(|| AppError::not_found(format!("Club {club_id} not found")))?;
        if club.status == ClubStatus::Inactive {
            return Err(AppError::conflict("Club is not accepting members")
                .with_code(codes::INVALID_STATE));
        }
        let club_full = club.status == ClubStatus::Full;
        let max_members = i64::from(club.max_members);

        if state
            .memberships
            .values()
            .any(|m| m.club_id == club_id && m.user_id == user_id)
        {
            return Err(AppError::conflict("User is already a member of this club")
                .with_code(codes::ALREADY_MEMBER));
        }

        let active = state
            .memberships
            .values()
            .filter(|m| m.club_id == club_id && m.status == MembershipStatus::Active)
            .count() as i64;
        if club_full || active >= max_members {
            return Err(AppError::conflict("Club is full").with_code(codes::CLUB_FULL));
        }

        let now = Utc::now();
        let membership = ClubMembership {
            id: Uuid::now_v7(),
            club_id,
            user_id,
            status: MembershipStatus::Active,
            start_date: now,
            end_date: None,
            next_billing_date: Some(next_billing_date),
            billing_status: BillingStatus::UpToDate,
            last_payment_id: None,
            created_at: now,
            updated_at: now,
        };
        state.memberships.insert(membership.id, membership.clone());
        Ok(membership)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ClubMembership>> {
        Ok(self.state.lock().await.memberships.get(&id).cloned())
    }

    async fn list_by_club(&self, club_id: Uuid) -> AppResult<Vec<ClubMembership>> {
        let state = self.state.lock().await;
        let mut members: Vec<ClubMembership> = state
            .memberships
            .values()
            .filter(|m| m.club_id == club_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.start_date);
        Ok(members)
    }

    async fn count_active(&self, club_id: Uuid) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .memberships
            .values()
            .filter(|m| m.club_id == club_id && m.status == MembershipStatus::Active)
            .count() as i64)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: MembershipStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<ClubMembership> {
        let mut state = self.state.lock().await;
        let membership = state
            .memberships
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Membership {id} not found")))?;
        membership.status = status;
        if end_date.is_some() {
            membership.end_date = end_date;
        }
        membership.updated_at = Utc::now();
        Ok(membership.clone())
    }

    async fn record_billing(
        &self,
        id: Uuid,
        billing_status: BillingStatus,
        next_billing_date: Option<DateTime<Utc>>,
        last_payment_id: Option<Uuid>,
    ) -> AppResult<ClubMembership> {
        let mut state = self.state.lock().await;
        let membership = state
            .memberships
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Membership {id} not found")))?;
        membership.billing_status = billing_status;
        if next_billing_date.is_some() {
            membership.next_billing_date = next_billing_date;
        }
        if last_payment_id.is_some() {
            membership.last_payment_id = last_payment_id;
        }
        membership.updated_at = Utc::now();
        Ok(membership.clone())
    }
}
