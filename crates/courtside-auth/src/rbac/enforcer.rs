//! RBAC enforcement: checks whether a role holds a capability.

use courtside_core::error::AppError;
use courtside_entity::user::UserRole;

use super::policies::{Capability, RbacPolicies};

/// Enforces role-based access control at the request boundary.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// `Ok(())` if the role holds the capability, else an authorization error.
    pub fn require(&self, role: UserRole, capability: Capability) -> Result<(), AppError> {
        if self.policies.has_capability(role, capability) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' does not have capability '{capability:?}'"
            )))
        }
    }

    /// Boolean form of [`RbacEnforcer::require`].
    pub fn allows(&self, role: UserRole, capability: Capability) -> bool {
        self.policies.has_capability(role, capability)
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}
