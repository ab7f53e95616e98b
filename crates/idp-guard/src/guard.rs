//! The configured role guard.

use idp_core::{GuardConfig, TokenClaims, User};

use crate::error::{GuardError, GuardResult};
use crate::requirement::RoleRequirement;

/// Authorizes users against role requirements.
///
/// Holds the connection settings of the realm whose tokens it inspects and
/// the name of the administrator role.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    config: GuardConfig,
}

impl RoleGuard {
    /// Creates a guard.
    #[must_use]
    pub const fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Returns the guard settings.
    #[must_use]
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Returns the administrator role name.
    #[must_use]
    pub fn admin_role(&self) -> &str {
        &self.config.admin_role
    }

    /// Requirement for a single role.
    #[must_use]
    pub fn require_role(&self, role: impl Into<String>) -> RoleRequirement {
        RoleRequirement::role(role)
    }

    /// Requirement for at least one of `roles`; empty means nobody passes.
    #[must_use]
    pub fn require_any_role<I, S>(&self, roles: I) -> RoleRequirement
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RoleRequirement::any_of(roles)
    }

    /// Requirement for the configured administrator role.
    #[must_use]
    pub fn require_admin(&self) -> RoleRequirement {
        RoleRequirement::role(self.config.admin_role.clone())
    }

    /// Checks `user` against `requirement`, handing the user back on success.
    pub fn authorize<'u>(
        &self,
        user: &'u User,
        requirement: &RoleRequirement,
    ) -> GuardResult<&'u User> {
        if requirement.is_satisfied_by_user(user) {
            Ok(user)
        } else {
            tracing::debug!(
                username = %user.username,
                realm = %self.config.provider.realm,
                requirement = %requirement,
                "role requirement not met"
            );
            Err(GuardError::Forbidden {
                username: user.username.clone(),
                requirement: requirement.to_string(),
            })
        }
    }

    /// Maps verified token claims to a user, reading client roles of the
    /// configured client.
    #[must_use]
    pub fn user_from_claims(&self, claims: &TokenClaims) -> User {
        User::from_claims(claims, &self.config.provider.client_id)
    }
}
