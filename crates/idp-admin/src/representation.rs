//! Provider-side user, role and credential records.
//!
//! These mirror Keycloak's admin representations, including their camelCase
//! JSON. An absent optional field means "leave unchanged" in an update.

use serde::{Deserialize, Serialize};

/// Required action forcing a password change at next login.
pub const UPDATE_PASSWORD: &str = "UPDATE_PASSWORD";

/// User as exchanged with the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    /// Unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// User's email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email has been verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    /// User's first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// User's last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Whether the user is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Whether OTP is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totp: Option<bool>,
    /// Required actions for the user.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_actions: Vec<String>,
    /// Credentials to set on creation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<CredentialRepresentation>,
}

/// Role as exchanged with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRepresentation {
    /// Unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Role name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether it's a composite role.
    #[serde(default)]
    pub composite: bool,
    /// Whether it's a client role.
    #[serde(default)]
    pub client_role: bool,
    /// Realm or client id owning the role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

impl RoleRepresentation {
    /// Creates a realm role representation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            composite: false,
            client_role: false,
            container_id: None,
        }
    }
}

/// Credential payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRepresentation {
    /// Credential type (e.g., "password").
    #[serde(rename = "type")]
    pub credential_type: String,
    /// Credential value.
    pub value: String,
    /// Whether the credential must be changed at next login.
    #[serde(default)]
    pub temporary: bool,
}

impl CredentialRepresentation {
    /// Creates a password credential.
    #[must_use]
    pub fn password(value: impl Into<String>, temporary: bool) -> Self {
        Self {
            credential_type: "password".to_string(),
            value: value.into(),
            temporary,
        }
    }
}

impl std::fmt::Debug for CredentialRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRepresentation")
            .field("credential_type", &self.credential_type)
            .field("value", &"***")
            .field("temporary", &self.temporary)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_omits_absent_fields() {
        let update = UserRepresentation {
            email: Some("new@example.com".to_string()),
            enabled: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "new@example.com", "enabled": false})
        );
    }

    #[test]
    fn reads_provider_user() {
        let json = r#"{
            "id": "5b2c",
            "createdTimestamp": 1700000000000,
            "username": "jdoe",
            "enabled": true,
            "totp": false,
            "emailVerified": true,
            "firstName": "John",
            "lastName": "Doe",
            "email": "jdoe@example.com",
            "requiredActions": []
        }"#;
        let user: UserRepresentation = serde_json::from_str(json).unwrap();
        assert_eq!(user.id.as_deref(), Some("5b2c"));
        assert_eq!(user.email_verified, Some(true));
        assert_eq!(user.first_name.as_deref(), Some("John"));
    }

    #[test]
    fn credential_wire_format() {
        let cred = CredentialRepresentation::password("s3cret", true);
        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "password", "value": "s3cret", "temporary": true})
        );
        assert!(!format!("{cred:?}").contains("s3cret"));
    }
}
