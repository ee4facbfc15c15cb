//! Per-role token lifetimes.

use chrono::Duration;

use courtside_core::config::AuthConfig;
use courtside_entity::user::UserRole;

/// How long each role's tokens live, and whether the role may hold a
/// refresh token at all.
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    admin_access: Duration,
    access: Duration,
    admin_refresh_enabled: bool,
    staff_refresh: Duration,
    client_refresh: Duration,
}

impl TokenPolicy {
    /// Build the policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            admin_access: Duration::minutes(config.admin_access_ttl_minutes),
            access: Duration::minutes(config.access_ttl_minutes),
            admin_refresh_enabled: config.admin_refresh_enabled,
            staff_refresh: Duration::days(config.staff_refresh_ttl_days),
            client_refresh: Duration::days(config.client_refresh_ttl_days),
        }
    }

    /// Access-token lifetime for a role.
    pub fn access_ttl(&self, role: UserRole) -> Duration {
        match role {
            UserRole::Admin => self.admin_access,
            _ => self.access,
        }
    }

    /// Refresh-token lifetime for a role, or `None` if the role gets none.
    pub fn refresh_ttl(&self, role: UserRole) -> Option<Duration> {
        match role {
            UserRole::Admin if self.admin_refresh_enabled => Some(self.staff_refresh),
            UserRole::Admin => None,
            UserRole::Manager | UserRole::Monitor | UserRole::Club => Some(self.staff_refresh),
            UserRole::Client => Some(self.client_refresh),
        }
    }
}
