//! User models.
//!
//! Two shapes exist side by side:
//! - [`User`] is the identity carried by a verified access token and is what
//!   the role guard inspects.
//! - [`AppUser`] is the application-facing view of a provider account, as
//!   returned by the admin operations.

use serde::{Deserialize, Serialize};

/// Identity resolved from a verified access token.
///
/// Immutable for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Subject identifier.
    pub id: String,
    /// Preferred username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Realm-level roles.
    #[serde(default)]
    pub realm_roles: Vec<String>,
    /// Roles granted on the configured client.
    #[serde(default)]
    pub client_roles: Vec<String>,
}

impl User {
    /// Returns the union of realm and client roles.
    ///
    /// Realm roles come first; a name present in both lists appears once.
    #[must_use]
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> =
            Vec::with_capacity(self.realm_roles.len() + self.client_roles.len());
        for role in self.realm_roles.iter().chain(&self.client_roles) {
            if !roles.contains(&role.as_str()) {
                roles.push(role);
            }
        }
        roles
    }

    /// Checks role membership. Comparison is exact and case-sensitive.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.realm_roles
            .iter()
            .chain(&self.client_roles)
            .any(|r| r == role)
    }
}

/// Application user as exposed by the admin operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUser {
    /// Provider identifier; absent before creation.
    #[serde(default)]
    pub id: Option<String>,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Whether the account is enabled.
    pub enabled: bool,
    /// Whether an OTP credential is configured.
    #[serde(default)]
    pub totp: bool,
    /// Realm role names.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AppUser {
    /// Creates an enabled user with no roles.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            email_verified: false,
            first_name: None,
            last_name: None,
            enabled: true,
            totp: false,
            roles: Vec::new(),
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets first and last name.
    #[must_use]
    pub fn with_name(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    /// Sets the role list.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Checks whether the user holds a realm role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Payload for creating a user: profile plus an initial password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUserDraft {
    /// Profile and requested roles.
    #[serde(flatten)]
    pub user: AppUser,
    /// Initial password; the user must change it at first login.
    pub password: String,
}

impl AppUserDraft {
    /// Creates a draft from a profile and password.
    #[must_use]
    pub fn new(user: AppUser, password: impl Into<String>) -> Self {
        Self {
            user,
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for AppUserDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppUserDraft")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Password reset payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUserPassword {
    /// New temporary password.
    pub password: String,
}

impl std::fmt::Debug for AppUserPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppUserPassword")
            .field("password", &"***")
            .finish()
    }
}

/// Makes `role` part of `roles`.
///
/// Duplicate names are dropped (first occurrence wins) and `role` is appended
/// when missing, so applying it twice yields the same list.
pub fn ensure_role(roles: &mut Vec<String>, role: &str) {
    let mut seen: Vec<String> = Vec::with_capacity(roles.len() + 1);
    for r in roles.drain(..) {
        if !seen.contains(&r) {
            seen.push(r);
        }
    }
    if !seen.iter().any(|r| r == role) {
        seen.push(role.to_string());
    }
    *roles = seen;
}
