use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse};
use courtside_entity::session::{CreateSession, RefreshSession, RevokeReason};

use super::{MemoryStore, newest_first};
use crate::store::SessionStore;

fn revoke_in_place(session: &mut RefreshSession, reason: RevokeReason, at: DateTime<Utc>) {
    session.revoked = true;
    session.revoked_reason = Some(reason);
    session.revoked_at = Some(at);
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, data: &CreateSession) -> AppResult<RefreshSession> {
        let now = Utc::now();
        let session = RefreshSession {
            id: Uuid::now_v7(),
            user_id: data.user_id,
            family_id: data.family_id,
            device_id: data.device_id.clone(),
            current_token_hash: data.token_hash.clone(),
            session_version: data.session_version,
            expires_at: data.expires_at,
            revoked: false,
            revoked_reason: None,
            revoked_at: None,
            ip_address: data.ip_address.clone(),
            user_agent: data.user_agent.clone(),
            created_at: now,
            last_used_at: now,
        };
        self.state
            .lock()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_family(&self, family_id: Uuid) -> AppResult<Option<RefreshSession>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .find(|s| s.family_id == family_id)
            .cloned())
    }

    async fn find_active_by_device(
        &self,
        user_id: Uuid,
        device_id: &str,
    ) -> AppResult<Option<RefreshSession>> {
        let state = self.state.lock().await;
        let matching = state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.device_id == device_id && !s.revoked)
            .cloned()
            .collect();
        Ok(newest_first(matching, |s| s.created_at).into_iter().next())
    }

    async fn list_active_by_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<RefreshSession>> {
        let state = self.state.lock().await;
        let active = state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active_at(now))
            .cloned()
            .collect();
        Ok(newest_first(active, |s| s.created_at))
    }

    async fn list_active(
        &self,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RefreshSession>> {
        let state = self.state.lock().await;
        let active = state
            .sessions
            .values()
            .filter(|s| s.is_active_at(now))
            .cloned()
            .collect();
        Ok(PageResponse::from_slice(
            newest_first(active, |s| s.created_at),
            page,
        ))
    }

    async fn rotate(
        &self,
        family_id: Uuid,
        old_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let Some(session) = state
            .sessions
            .values_mut()
            .find(|s| s.family_id == family_id)
        else {
            return Ok(false);
        };
        if session.revoked || session.current_token_hash != old_hash {
            return Ok(false);
        }
        session.current_token_hash = new_hash.to_string();
        session.expires_at = expires_at;
        session.last_used_at = Utc::now();
        Ok(true)
    }

    async fn revoke(&self, family_id: Uuid, reason: RevokeReason) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        match state
            .sessions
            .values_mut()
            .find(|s| s.family_id == family_id && !s.revoked)
        {
            Some(session) => {
                revoke_in_place(session, reason, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, reason: RevokeReason) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut count = 0;
        for session in state
            .sessions
            .values_mut()
            .filter(|s| s.user_id == user_id && !s.revoked)
        {
            revoke_in_place(session, reason, now);
            count += 1;
        }
        Ok(count)
    }

    async fn revoke_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut count = 0;
        for session in state
            .sessions
            .values_mut()
            .filter(|s| !s.revoked && s.expires_at <= now)
        {
            revoke_in_place(session, RevokeReason::ExpiredCleanup, now);
            count += 1;
        }
        Ok(count)
    }

    async fn purge(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| {
            let revoked_long_ago = s.revoked && s.revoked_at.is_some_and(|at| at < cutoff);
            !(revoked_long_ago || s.expires_at < cutoff)
        });
        Ok((before - state.sessions.len()) as u64)
    }
}
