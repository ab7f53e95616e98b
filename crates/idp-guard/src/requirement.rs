//! Role requirements.
//!
//! A requirement is plain data evaluated by [`RoleRequirement::is_satisfied_by`]
//! against a role set. Role names are compared exactly (case-sensitive).
//! Empty role sets never grant access.

use std::fmt;

use idp_core::User;

/// What a user's roles must contain to be granted access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequirement {
    /// The user must hold this role.
    Role(String),
    /// The user must hold at least one of these roles.
    AnyOf(Vec<String>),
    /// The user must hold every one of these roles.
    AllOf(Vec<String>),
    /// Nobody is granted access.
    Deny,
}

impl RoleRequirement {
    /// Requires a single role.
    #[must_use]
    pub fn role(role: impl Into<String>) -> Self {
        Self::Role(role.into())
    }

    /// Requires at least one of `roles`. An empty set yields [`Self::Deny`].
    #[must_use]
    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        match roles.len() {
            0 => Self::Deny,
            1 => Self::Role(roles.remove(0)),
            _ => Self::AnyOf(roles),
        }
    }

    /// Requires all of `roles`. An empty set yields [`Self::Deny`].
    #[must_use]
    pub fn all_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        match roles.len() {
            0 => Self::Deny,
            1 => Self::Role(roles.remove(0)),
            _ => Self::AllOf(roles),
        }
    }

    /// Evaluates the requirement against a role set.
    #[must_use]
    pub fn is_satisfied_by<'a, I>(&self, roles: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let held: Vec<&str> = roles.into_iter().collect();
        match self {
            Self::Role(role) => held.contains(&role.as_str()),
            Self::AnyOf(required) => required.iter().any(|r| held.contains(&r.as_str())),
            Self::AllOf(required) => {
                !required.is_empty() && required.iter().all(|r| held.contains(&r.as_str()))
            }
            Self::Deny => false,
        }
    }

    /// Evaluates the requirement against the union of a user's realm and client roles.
    #[must_use]
    pub fn is_satisfied_by_user(&self, user: &User) -> bool {
        self.is_satisfied_by(user.roles())
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role(role) => write!(f, "role '{role}'"),
            Self::AnyOf(roles) => write!(f, "one of roles [{}]", roles.join(", ")),
            Self::AllOf(roles) => write!(f, "all of roles [{}]", roles.join(", ")),
            Self::Deny => f.write_str("no role (access denied)"),
        }
    }
}
