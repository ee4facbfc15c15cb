//! JWT token creation with per-role lifetimes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

use courtside_core::config::AuthConfig;
use courtside_core::error::AppError;
use courtside_entity::user::User;

use super::claims::{Claims, TokenType};
use super::policy::TokenPolicy;

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Per-role lifetimes.
    policy: TokenPolicy,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("policy", &self.policy)
            .finish()
    }
}

/// A signed token and when it stops being valid.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    /// The encoded JWT.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            policy: TokenPolicy::new(config),
        }
    }

    /// The lifetime policy this encoder applies.
    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Issue a stateless access token for `user` on `device_id`.
    pub fn issue_access(&self, user: &User, device_id: &str) -> Result<IssuedToken, AppError> {
        let ttl = self.policy.access_ttl(user.role);
        self.sign(user, device_id, None, ttl, TokenType::Access)
    }

    /// Issue a refresh token in `family_id`.
    ///
    /// Fails if the user's role may not hold refresh tokens.
    pub fn issue_refresh(
        &self,
        user: &User,
        device_id: &str,
        family_id: Uuid,
    ) -> Result<IssuedToken, AppError> {
        let ttl = self.policy.refresh_ttl(user.role).ok_or_else(|| {
            AppError::internal(format!("Role '{}' may not hold refresh tokens", user.role))
        })?;
        self.sign(user, device_id, Some(family_id), ttl, TokenType::Refresh)
    }

    /// Sign arbitrary claims. Exposed for tests that need crafted tokens.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    fn sign(
        &self,
        user: &User,
        device_id: &str,
        family_id: Option<Uuid>,
        ttl: Duration,
        token_type: TokenType,
    ) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + ttl;
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            ver: user.session_version,
            dev: device_id.to_string(),
            fam: family_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        };
        let token = self.encode_claims(&claims)?;
        Ok(IssuedToken { token, expires_at })
    }
}
