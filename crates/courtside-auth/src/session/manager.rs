//! Session lifecycle manager: login, refresh rotation and logout.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use courtside_core::error::AppError;
use courtside_core::result::AppResult;
use courtside_database::store::{SessionStore, UserStore};
use courtside_entity::session::{CreateSession, RefreshSession, RevokeReason};
use courtside_entity::user::User;

use crate::jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;

use super::alert::{SecurityAlert, SecurityAlertSink};
use super::error::SessionError;
use super::hash::hash_token;

/// Request metadata recorded on a session.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    /// Client-supplied device identifier; generated when absent.
    pub device_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub user: User,
    pub device_id: String,
    pub access: IssuedToken,
    /// Absent for roles that may not hold refresh tokens.
    pub refresh: Option<IssuedToken>,
}

/// Result of a successful rotation.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub user: User,
    pub device_id: String,
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Manages the complete session lifecycle.
#[derive(Debug, Clone)]
pub struct SessionManager {
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: PasswordHasher,
    alerts: Arc<dyn SecurityAlertSink>,
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        alerts: Arc<dyn SecurityAlertSink>,
    ) -> Self {
        Self {
            encoder,
            decoder,
            users,
            sessions,
            hasher: PasswordHasher::new(),
            alerts,
        }
    }

    /// Performs the login flow:
    ///
    /// 1. Find the user by email and verify the password
    /// 2. Reject inactive accounts
    /// 3. Issue an access token
    /// 4. If the role may refresh, revoke any session already bound to the
    ///    device and open a new family
    /// 5. Record `last_login_at`
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        meta: ClientMeta,
    ) -> AppResult<LoginOutcome> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::authentication("Invalid email or password"));
        }
        if !user.is_active {
            warn!(user_id = %user.id, "Login rejected: account inactive");
            return Err(AppError::authentication("Account is disabled"));
        }

        let device_id = meta
            .device_id
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let access = self.encoder.issue_access(&user, &device_id)?;

        let refresh = if self.encoder.policy().refresh_ttl(user.role).is_some() {
            if let Some(previous) = self
                .sessions
                .find_active_by_device(user.id, &device_id)
                .await?
            {
                self.sessions
                    .revoke(previous.family_id, RevokeReason::Logout)
                    .await?;
            }

            let family_id = Uuid::now_v7();
            let refresh = self.encoder.issue_refresh(&user, &device_id, family_id)?;
            self.sessions
                .create(&CreateSession {
                    user_id: user.id,
                    family_id,
                    device_id: device_id.clone(),
                    token_hash: hash_token(&refresh.token),
                    session_version: user.session_version,
                    expires_at: refresh.expires_at,
                    ip_address: meta.ip_address,
                    user_agent: meta.user_agent,
                })
                .await?;
            Some(refresh)
        } else {
            None
        };

        self.users.touch_last_login(user.id, Utc::now()).await?;
        info!(
            user_id = %user.id,
            role = %user.role,
            device_id = %device_id,
            refresh = refresh.is_some(),
            "Login successful"
        );

        Ok(LoginOutcome {
            user,
            device_id,
            access,
            refresh,
        })
    }

    /// Rotate a refresh token. Checks run in a fixed order and stop at the
    /// first failure:
    ///
    /// 1. JWT signature and expiry
    /// 2. Family lookup
    /// 3. Revocation
    /// 4. Hash match (mismatch revokes with `reuse_detection` and alerts)
    /// 5. Session version (mismatch revokes with `global_logout`)
    /// 6. Issue a new pair and compare-and-swap the stored hash; losing the
    ///    swap is handled as reuse
    pub async fn refresh(
        &self,
        raw_token: &str,
        ip_address: Option<String>,
    ) -> Result<RefreshOutcome, SessionError> {
        let claims = self.decoder.decode_refresh(raw_token)?;
        let family_id = claims.fam.ok_or(SessionError::Invalid)?;

        let session = self
            .sessions
            .find_by_family(family_id)
            .await?
            .ok_or(SessionError::FamilyNotFound)?;

        if session.revoked {
            return Err(SessionError::Revoked(
                session.revoked_reason.unwrap_or(RevokeReason::Logout),
            ));
        }

        let presented = hash_token(raw_token);
        if presented != session.current_token_hash {
            self.flag_reuse(&session, ip_address).await?;
            return Err(SessionError::Reused);
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(SessionError::UserInactive)?;
        if session.session_version != user.session_version {
            self.sessions
                .revoke(family_id, RevokeReason::GlobalLogout)
                .await?;
            warn!(
                user_id = %user.id,
                family_id = %family_id,
                "Refresh rejected: session version is stale"
            );
            return Err(SessionError::VersionMismatch);
        }
        if !user.is_active {
            return Err(SessionError::UserInactive);
        }

        let access = self.encoder.issue_access(&user, &session.device_id)?;
        let refresh = self
            .encoder
            .issue_refresh(&user, &session.device_id, family_id)?;

        let swapped = self
            .sessions
            .rotate(
                family_id,
                &presented,
                &hash_token(&refresh.token),
                refresh.expires_at,
            )
            .await?;
        if !swapped {
            self.flag_reuse(&session, ip_address).await?;
            return Err(SessionError::Reused);
        }

        info!(user_id = %user.id, family_id = %family_id, "Refresh token rotated");
        Ok(RefreshOutcome {
            user,
            device_id: session.device_id,
            access,
            refresh,
        })
    }

    /// Revoke the active session on one device. Idempotent.
    pub async fn logout(&self, user_id: Uuid, device_id: &str) -> AppResult<bool> {
        let Some(session) = self.sessions.find_active_by_device(user_id, device_id).await? else {
            return Ok(false);
        };
        let revoked = self
            .sessions
            .revoke(session.family_id, RevokeReason::Logout)
            .await?;
        info!(user_id = %user_id, device_id = %device_id, "Logged out device");
        Ok(revoked)
    }

    /// Bump the session version and revoke every session of the user.
    ///
    /// Outstanding access tokens fail validation from here on.
    pub async fn logout_all_devices(&self, user_id: Uuid) -> AppResult<u64> {
        let version = self.users.bump_session_version(user_id).await?;
        let revoked = self
            .sessions
            .revoke_all_for_user(user_id, RevokeReason::GlobalLogout)
            .await?;
        info!(
            user_id = %user_id,
            session_version = version,
            revoked,
            "Logged out all devices"
        );
        Ok(revoked)
    }

    /// Decode an access token and validate it against the live user.
    pub async fn authenticate(&self, token: &str) -> Result<(Claims, User), SessionError> {
        let claims = self.decoder.decode_access(token)?;
        let user = self.validate_access(&claims).await?;
        Ok((claims, user))
    }

    /// The user must exist, be active, and still be on the token's version.
    pub async fn validate_access(&self, claims: &Claims) -> Result<User, SessionError> {
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(SessionError::UserInactive)?;
        if !user.is_active {
            return Err(SessionError::UserInactive);
        }
        if user.session_version != claims.ver {
            return Err(SessionError::VersionMismatch);
        }
        Ok(user)
    }

    /// The caller's non-revoked, unexpired sessions.
    pub async fn active_sessions(&self, user_id: Uuid) -> AppResult<Vec<RefreshSession>> {
        self.sessions.list_active_by_user(user_id, Utc::now()).await
    }

    async fn flag_reuse(
        &self,
        session: &RefreshSession,
        ip_address: Option<String>,
    ) -> Result<(), SessionError> {
        self.sessions
            .revoke(session.family_id, RevokeReason::ReuseDetection)
            .await?;
        self.alerts.token_reuse(&SecurityAlert {
            user_id: session.user_id,
            family_id: session.family_id,
            device_id: session.device_id.clone(),
            ip_address,
            detected_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use courtside_core::config::AuthConfig;
    use courtside_database::MemoryStore;
    use courtside_entity::user::{CreateUser, UserRole};

    #[derive(Debug, Default)]
    struct RecordingSink(Mutex<Vec<SecurityAlert>>);

    impl SecurityAlertSink for RecordingSink {
        fn token_reuse(&self, alert: &SecurityAlert) {
            self.0.lock().unwrap().push(alert.clone());
        }
    }

    struct Harness {
        manager: SessionManager,
        store: Arc<MemoryStore>,
        alerts: Arc<RecordingSink>,
        encoder: Arc<JwtEncoder>,
    }

    fn harness() -> Harness {
        let config = AuthConfig {
            jwt_secret: "session-test-secret-0123456789".into(),
            ..AuthConfig::default()
        };
        let store = Arc::new(MemoryStore::new());
        let alerts = Arc::new(RecordingSink::default());
        let encoder = Arc::new(JwtEncoder::new(&config));
        let manager = SessionManager::new(
            encoder.clone(),
            Arc::new(JwtDecoder::new(&config)),
            store.clone(),
            store.clone(),
            alerts.clone(),
        );
        Harness {
            manager,
            store,
            alerts,
            encoder,
        }
    }

    async fn user(h: &Harness, email: &str, role: UserRole) -> User {
        let hash = PasswordHasher::new().hash_password("password123").unwrap();
        UserStore::create(
            h.store.as_ref(),
            &CreateUser {
                slug: format!("{role}-{}", Uuid::new_v4()),
                email: email.into(),
                password_hash: hash,
                full_name: "Test User".into(),
                phone: None,
                role,
            },
        )
        .await
        .unwrap()
    }

    fn device(id: &str) -> ClientMeta {
        ClientMeta {
            device_id: Some(id.into()),
            ..ClientMeta::default()
        }
    }

    #[tokio::test]
    async fn admin_gets_no_refresh_token() {
        let h = harness();
        user(&h, "admin@club.test", UserRole::Admin).await;
        user(&h, "ana@club.test", UserRole::Client).await;

        let admin = h
            .manager
            .login("admin@club.test", "password123", ClientMeta::default())
            .await
            .unwrap();
        assert!(admin.refresh.is_none());
        assert!(!admin.device_id.is_empty());

        let client = h
            .manager
            .login("ANA@club.test", "password123", device("phone"))
            .await
            .unwrap();
        assert!(client.refresh.is_some());
        assert!(client.user.last_login_at.is_none());
        let stored = UserStore::find_by_id(h.store.as_ref(), client.user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_inactive_are_rejected() {
        let h = harness();
        let u = user(&h, "ana@club.test", UserRole::Client).await;

        assert!(
            h.manager
                .login("ana@club.test", "nope", ClientMeta::default())
                .await
                .is_err()
        );

        h.store.set_active(u.id, false).await.unwrap();
        let err = h
            .manager
            .login("ana@club.test", "password123", ClientMeta::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, courtside_core::ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn rotation_invalidates_prior_token() {
        let h = harness();
        user(&h, "ana@club.test", UserRole::Client).await;
        let login = h
            .manager
            .login("ana@club.test", "password123", device("laptop"))
            .await
            .unwrap();
        let t1 = login.refresh.unwrap().token;

        let rotated = h.manager.refresh(&t1, None).await.unwrap();
        let t2 = rotated.refresh.token;
        assert_ne!(t1, t2);
        assert_eq!(rotated.device_id, "laptop");

        let replay = h.manager.refresh(&t1, None).await.unwrap_err();
        assert!(matches!(replay, SessionError::Reused));
        assert_eq!(h.alerts.0.lock().unwrap().len(), 1);

        let after = h.manager.refresh(&t2, None).await.unwrap_err();
        assert!(matches!(
            after,
            SessionError::Revoked(RevokeReason::ReuseDetection)
        ));
    }

    #[tokio::test]
    async fn global_logout_invalidates_everything() {
        let h = harness();
        user(&h, "ana@club.test", UserRole::Client).await;
        let a = h
            .manager
            .login("ana@club.test", "password123", device("a"))
            .await
            .unwrap();
        let b = h
            .manager
            .login("ana@club.test", "password123", device("b"))
            .await
            .unwrap();
        let (claims, _) = h.manager.authenticate(&a.access.token).await.unwrap();

        let revoked = h.manager.logout_all_devices(a.user.id).await.unwrap();
        assert_eq!(revoked, 2);

        for outcome in [a, b] {
            let err = h
                .manager
                .refresh(&outcome.refresh.unwrap().token, None)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                SessionError::Revoked(RevokeReason::GlobalLogout)
            ));
        }
        assert!(matches!(
            h.manager.validate_access(&claims).await,
            Err(SessionError::VersionMismatch)
        ));
    }

    #[tokio::test]
    async fn stale_version_revokes_on_refresh() {
        let h = harness();
        let u = user(&h, "ana@club.test", UserRole::Monitor).await;
        let login = h
            .manager
            .login("ana@club.test", "password123", device("tablet"))
            .await
            .unwrap();
        h.store.bump_session_version(u.id).await.unwrap();

        let err = h
            .manager
            .refresh(&login.refresh.unwrap().token, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::VersionMismatch));

        let session = h
            .store
            .find_active_by_device(u.id, "tablet")
            .await
            .unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn unknown_family_is_reported() {
        let h = harness();
        let u = user(&h, "ana@club.test", UserRole::Client).await;
        let forged = h
            .encoder
            .issue_refresh(&u, "ghost", Uuid::now_v7())
            .unwrap();
        let err = h.manager.refresh(&forged.token, None).await.unwrap_err();
        assert!(matches!(err, SessionError::FamilyNotFound));
    }

    #[tokio::test]
    async fn login_on_same_device_replaces_session_and_logout_is_idempotent() {
        let h = harness();
        let u = user(&h, "ana@club.test", UserRole::Client).await;
        let first = h
            .manager
            .login("ana@club.test", "password123", device("phone"))
            .await
            .unwrap();
        h.manager
            .login("ana@club.test", "password123", device("phone"))
            .await
            .unwrap();

        let err = h
            .manager
            .refresh(&first.refresh.unwrap().token, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Revoked(RevokeReason::Logout)));
        assert_eq!(h.manager.active_sessions(u.id).await.unwrap().len(), 1);

        assert!(h.manager.logout(u.id, "phone").await.unwrap());
        assert!(!h.manager.logout(u.id, "phone").await.unwrap());
        assert!(h.manager.active_sessions(u.id).await.unwrap().is_empty());
    }

    #[test]
    fn session_errors_map_to_generic_401() {
        let err: AppError = SessionError::Reused.into();
        assert_eq!(err.kind, courtside_core::ErrorKind::Authentication);
        assert_eq!(err.message, "Session invalid, please re-authenticate");
    }
}
