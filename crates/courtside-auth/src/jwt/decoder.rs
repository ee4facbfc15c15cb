//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use courtside_core::config::AuthConfig;

use super::claims::{Claims, TokenType};
use crate::session::SessionError;

/// Validates JWT signatures, expiry, and token type.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decode an access token.
    pub fn decode_access(&self, token: &str) -> Result<Claims, SessionError> {
        self.decode_typed(token, TokenType::Access)
    }

    /// Decode a refresh token; it must carry a family.
    pub fn decode_refresh(&self, token: &str) -> Result<Claims, SessionError> {
        let claims = self.decode_typed(token, TokenType::Refresh)?;
        if claims.fam.is_none() {
            return Err(SessionError::Invalid);
        }
        Ok(claims)
    }

    fn decode_typed(&self, token: &str, expected: TokenType) -> Result<Claims, SessionError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            }
        })?;

        if data.claims.token_type != expected {
            return Err(SessionError::Invalid);
        }
        Ok(data.claims)
    }
}
