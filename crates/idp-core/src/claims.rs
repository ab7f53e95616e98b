//! Access token claims relevant to identity.
//!
//! Only the subset of Keycloak access-token claims needed to build a [`User`]
//! is modelled. Tokens must already be verified by the caller; this module
//! performs no signature or expiry checks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Decoded access token claims.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - unique identifier for the user.
    pub sub: String,

    /// Preferred username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Given (first) name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Family (last) name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Realm access (realm-level roles).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_access: Option<RealmAccess>,

    /// Resource access (client-level roles), keyed by client id.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub resource_access: HashMap<String, ResourceAccess>,
}

/// Realm access claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmAccess {
    /// Realm roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Resource access claim for a single client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAccess {
    /// Client roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl TokenClaims {
    /// Creates claims for a subject.
    #[must_use]
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            ..Self::default()
        }
    }

    /// Sets the preferred username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.preferred_username = Some(username.into());
        self
    }

    /// Sets realm roles.
    #[must_use]
    pub fn with_realm_roles(mut self, roles: Vec<String>) -> Self {
        self.realm_access = Some(RealmAccess { roles });
        self
    }

    /// Sets the roles of one client.
    #[must_use]
    pub fn with_client_roles(mut self, client_id: impl Into<String>, roles: Vec<String>) -> Self {
        self.resource_access
            .insert(client_id.into(), ResourceAccess { roles });
        self
    }
}

impl User {
    /// Builds a user from verified token claims.
    ///
    /// Client roles are taken from the `resource_access` entry of `client_id`;
    /// entries of other clients are ignored.
    #[must_use]
    pub fn from_claims(claims: &TokenClaims, client_id: &str) -> Self {
        Self {
            id: claims.sub.clone(),
            username: claims.preferred_username.clone().unwrap_or_default(),
            email: claims.email.clone().unwrap_or_default(),
            first_name: claims.given_name.clone().unwrap_or_default(),
            last_name: claims.family_name.clone().unwrap_or_default(),
            realm_roles: claims
                .realm_access
                .as_ref()
                .map(|access| access.roles.clone())
                .unwrap_or_default(),
            client_roles: claims
                .resource_access
                .get(client_id)
                .map(|access| access.roles.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_keycloak_token_payload() {
        let json = r#"{
            "sub": "f1c2",
            "preferred_username": "jdoe",
            "email": "jdoe@example.com",
            "given_name": "John",
            "family_name": "Doe",
            "realm_access": {"roles": ["offline_access", "app-user"]},
            "resource_access": {
                "test-api": {"roles": ["editor"]},
                "account": {"roles": ["manage-account"]}
            },
            "exp": 1700000000
        }"#;
        let claims: TokenClaims = serde_json::from_str(json).unwrap();
        let user = User::from_claims(&claims, "test-api");

        assert_eq!(user.id, "f1c2");
        assert_eq!(user.username, "jdoe");
        assert_eq!(user.first_name, "John");
        assert_eq!(user.realm_roles, vec!["offline_access", "app-user"]);
        assert_eq!(user.client_roles, vec!["editor"]);
        assert!(!user.has_role("manage-account"));
    }

    #[test]
    fn missing_claims_map_to_empty_values() {
        let claims = TokenClaims::new("abc");
        let user = User::from_claims(&claims, "test-api");

        assert_eq!(user.username, "");
        assert!(user.realm_roles.is_empty());
        assert!(user.client_roles.is_empty());
    }

    #[test]
    fn builder_sets_roles() {
        let claims = TokenClaims::new("abc")
            .with_username("test")
            .with_realm_roles(vec!["admin".to_string()])
            .with_client_roles("test-api", vec!["editor".to_string()]);
        let user = User::from_claims(&claims, "test-api");

        assert_eq!(user.roles(), vec!["admin", "editor"]);
    }
}
