//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication, token lifetime, and refresh-cookie configuration.
///
/// Lifetimes are split by role tier: the admin tier gets the shortest access
/// token and no refresh token at all, staff roles get a week of refresh, and
/// clients get the longest refresh window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes for the admin role.
    #[serde(default = "default_admin_access_ttl")]
    pub admin_access_ttl_minutes: i64,
    /// Access token TTL in minutes for every other role.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: i64,
    /// Whether admins receive refresh tokens.
    #[serde(default)]
    pub admin_refresh_enabled: bool,
    /// Refresh token TTL in days for staff roles (manager, monitor, club).
    #[serde(default = "default_staff_refresh_ttl")]
    pub staff_refresh_ttl_days: i64,
    /// Refresh token TTL in days for clients.
    #[serde(default = "default_client_refresh_ttl")]
    pub client_refresh_ttl_days: i64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Refresh cookie settings.
    #[serde(default)]
    pub cookie: RefreshCookieConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            admin_access_ttl_minutes: default_admin_access_ttl(),
            access_ttl_minutes: default_access_ttl(),
            admin_refresh_enabled: false,
            staff_refresh_ttl_days: default_staff_refresh_ttl(),
            client_refresh_ttl_days: default_client_refresh_ttl(),
            password_min_length: default_password_min(),
            cookie: RefreshCookieConfig::default(),
        }
    }
}

/// The HTTP-only cookie carrying the refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshCookieConfig {
    /// Cookie name.
    #[serde(default = "default_cookie_name")]
    pub name: String,
    /// Cookie path; scoped to the auth routes.
    #[serde(default = "default_cookie_path")]
    pub path: String,
    /// Set the `Secure` attribute.
    #[serde(default = "default_true")]
    pub secure: bool,
    /// Cookie max-age in days.
    #[serde(default = "default_cookie_max_age")]
    pub max_age_days: i64,
}

impl Default for RefreshCookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            path: default_cookie_path(),
            secure: true,
            max_age_days: default_cookie_max_age(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_admin_access_ttl() -> i64 {
    5
}

fn default_access_ttl() -> i64 {
    15
}

fn default_staff_refresh_ttl() -> i64 {
    7
}

fn default_client_refresh_ttl() -> i64 {
    30
}

fn default_password_min() -> usize {
    8
}

fn default_cookie_name() -> String {
    "refresh_token".to_string()
}

fn default_cookie_path() -> String {
    "/api/auth".to_string()
}

fn default_cookie_max_age() -> i64 {
    30
}

fn default_true() -> bool {
    true
}
