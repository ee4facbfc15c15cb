//! Role-to-capability mapping.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use courtside_entity::user::UserRole;

/// Something a role is allowed to do beyond acting on its own resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create, edit, and deactivate pistas.
    ManagePistas,
    /// Schedule, edit, and cancel classes; view enrollments.
    ManageClasses,
    /// Create, edit, and delete clubs; manage their members.
    ManageClubs,
    /// List all payments and issue refunds.
    ManagePayments,
    /// Change roles and activate/deactivate accounts.
    ManageUsers,
    /// View and revoke any user's sessions.
    ManageSessions,
    /// See every booking, confirm and delete them.
    ManageBookings,
    /// Book pistas for oneself.
    BookPistas,
    /// Enroll in classes.
    EnrollClasses,
    /// Be added to clubs as a member.
    JoinClubs,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 10] = [
        Self::ManagePistas,
        Self::ManageClasses,
        Self::ManageClubs,
        Self::ManagePayments,
        Self::ManageUsers,
        Self::ManageSessions,
        Self::ManageBookings,
        Self::BookPistas,
        Self::EnrollClasses,
        Self::JoinClubs,
    ];
}

/// The mapping from each role to its capabilities.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<Capability>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        use Capability::*;

        let mut policies = HashMap::new();
        policies.insert(
            UserRole::Admin,
            Capability::ALL
                .into_iter()
                .filter(|c| !matches!(c, JoinClubs))
                .collect(),
        );
        policies.insert(
            UserRole::Manager,
            HashSet::from([
                ManagePistas,
                ManageClasses,
                ManageClubs,
                ManagePayments,
                ManageBookings,
                BookPistas,
            ]),
        );
        policies.insert(
            UserRole::Monitor,
            HashSet::from([ManageClasses, BookPistas]),
        );
        policies.insert(UserRole::Club, HashSet::from([ManageClubs, BookPistas]));
        policies.insert(
            UserRole::Client,
            HashSet::from([BookPistas, EnrollClasses, JoinClubs]),
        );

        Self { policies }
    }

    /// Capabilities of a role, sorted in declaration order.
    pub fn capabilities_for_role(&self, role: UserRole) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.has_capability(role, *c))
            .collect()
    }

    /// Checks whether the given role has the specified capability.
    pub fn has_capability(&self, role: UserRole, capability: Capability) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|caps| caps.contains(&capability))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
