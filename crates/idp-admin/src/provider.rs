//! Admin client backed by the `keycloak` crate.
//!
//! Authenticates as the service account of the configured confidential
//! client, in the application realm. Token handling and the HTTP protocol
//! belong to [`KeycloakAdmin`]; this adapter maps calls and representations.

use async_trait::async_trait;
use idp_core::ProviderConfig;
use keycloak::types as kc;
use keycloak::{KeycloakAdmin, KeycloakError, KeycloakServiceAccountAdminTokenRetriever};

use crate::client::AdminClient;
use crate::error::{ProviderError, ProviderResult};
use crate::representation::{CredentialRepresentation, RoleRepresentation, UserRepresentation};

/// Page size used when listing role members.
const PAGE_SIZE: i32 = 100;
const PAGE_LEN: usize = 100;

/// Admin client talking to a Keycloak server.
pub struct KeycloakAdminClient {
    admin: KeycloakAdmin<KeycloakServiceAccountAdminTokenRetriever>,
    base_url: String,
    realm: String,
}

impl std::fmt::Debug for KeycloakAdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakAdminClient")
            .field("base_url", &self.base_url)
            .field("realm", &self.realm)
            .finish_non_exhaustive()
    }
}

impl KeycloakAdminClient {
    /// Creates a client from connection settings.
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        let token = KeycloakServiceAccountAdminTokenRetriever::create_with_custom_realm(
            &config.client_id,
            &config.client_secret,
            &config.realm,
            http.clone(),
        );

        Ok(Self {
            admin: KeycloakAdmin::new(&config.url, token, http),
            base_url: config.url.clone(),
            realm: config.realm.clone(),
        })
    }

    /// Gets the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gets the realm name.
    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }
}

/// Converts a client error, turning a 404 into `NotFound` for `resource`/`id`.
fn lookup_error(err: KeycloakError, resource: &'static str, id: &str) -> ProviderError {
    match ProviderError::from(err) {
        ProviderError::Api { status: 404, .. } => ProviderError::not_found(resource, id),
        other => other,
    }
}

fn non_empty<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    (!items.is_empty()).then(|| items.to_vec())
}

fn to_kc_user(user: &UserRepresentation) -> kc::UserRepresentation {
    let credentials: Vec<_> = user.credentials.iter().map(to_kc_credential).collect();
    kc::UserRepresentation {
        id: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        email_verified: user.email_verified,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        enabled: user.enabled,
        totp: user.totp,
        required_actions: non_empty(&user.required_actions),
        credentials: (!credentials.is_empty()).then_some(credentials),
        ..Default::default()
    }
}

fn from_kc_user(user: kc::UserRepresentation) -> UserRepresentation {
    UserRepresentation {
        id: user.id,
        username: user.username,
        email: user.email,
        email_verified: user.email_verified,
        first_name: user.first_name,
        last_name: user.last_name,
        enabled: user.enabled,
        totp: user.totp,
        required_actions: user.required_actions.unwrap_or_default(),
        credentials: Vec::new(),
    }
}

fn to_kc_role(role: &RoleRepresentation) -> kc::RoleRepresentation {
    kc::RoleRepresentation {
        id: role.id.clone(),
        name: Some(role.name.clone()),
        description: role.description.clone(),
        composite: Some(role.composite),
        client_role: Some(role.client_role),
        container_id: role.container_id.clone(),
        ..Default::default()
    }
}

fn from_kc_role(role: kc::RoleRepresentation) -> RoleRepresentation {
    RoleRepresentation {
        id: role.id,
        name: role.name.unwrap_or_default(),
        description: role.description,
        composite: role.composite.unwrap_or(false),
        client_role: role.client_role.unwrap_or(false),
        container_id: role.container_id,
    }
}

fn to_kc_credential(credential: &CredentialRepresentation) -> kc::CredentialRepresentation {
    kc::CredentialRepresentation {
        type_: Some(credential.credential_type.clone()),
        value: Some(credential.value.clone()),
        temporary: Some(credential.temporary),
        ..Default::default()
    }
}

#[async_trait]
impl AdminClient for KeycloakAdminClient {
    async fn get_realm_role_members(&self, role: &str) -> ProviderResult<Vec<UserRepresentation>> {
        let mut members = Vec::new();
        let mut first = 0;

        loop {
            let page = self
                .admin
                .realm_roles_with_role_name_users_get(
                    &self.realm,
                    role,
                    None,
                    Some(first),
                    Some(PAGE_SIZE),
                )
                .await
                .map_err(|e| lookup_error(e, "Role", role))?;
            let done = page.len() < PAGE_LEN;
            members.extend(page.into_iter().map(from_kc_user));
            if done {
                break;
            }
            first += PAGE_SIZE;
        }

        Ok(members)
    }

    async fn get_user_id(&self, username: &str) -> ProviderResult<Option<String>> {
        let users = self
            .admin
            .realm_users_get(
                &self.realm,
                None,
                None,
                None,
                None,
                Some(true),
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                Some(username.to_string()),
            )
            .await?;

        Ok(users
            .into_iter()
            .find(|u| {
                u.username
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(username))
            })
            .and_then(|u| u.id))
    }

    async fn get_user(&self, id: &str) -> ProviderResult<UserRepresentation> {
        let user = self
            .admin
            .realm_users_with_user_id_get(&self.realm, id, None)
            .await
            .map_err(|e| lookup_error(e, "User", id))?;
        Ok(from_kc_user(user))
    }

    async fn create_user(&self, payload: &UserRepresentation) -> ProviderResult<String> {
        let username = payload.username.as_deref().unwrap_or_default();
        self.admin
            .realm_users_post(&self.realm, to_kc_user(payload))
            .await?;

        // Usernames are unique within a realm.
        self.get_user_id(username).await?.ok_or_else(|| {
            ProviderError::InvalidResponse(format!("created user '{username}' not found"))
        })
    }

    async fn update_user(&self, id: &str, payload: &UserRepresentation) -> ProviderResult<()> {
        self.admin
            .realm_users_with_user_id_put(&self.realm, id, to_kc_user(payload))
            .await
            .map_err(|e| lookup_error(e, "User", id))?;
        Ok(())
    }

    async fn assign_realm_roles(
        &self,
        id: &str,
        roles: &[RoleRepresentation],
    ) -> ProviderResult<()> {
        self.admin
            .realm_users_with_user_id_role_mappings_realm_post(
                &self.realm,
                id,
                roles.iter().map(to_kc_role).collect(),
            )
            .await
            .map_err(|e| lookup_error(e, "User", id))?;
        Ok(())
    }

    async fn get_realm_role(&self, name: &str) -> ProviderResult<RoleRepresentation> {
        let role = self
            .admin
            .realm_roles_with_role_name_get(&self.realm, name)
            .await
            .map_err(|e| lookup_error(e, "Role", name))?;
        Ok(from_kc_role(role))
    }

    async fn get_realm_roles_of_user(&self, id: &str) -> ProviderResult<Vec<RoleRepresentation>> {
        let roles = self
            .admin
            .realm_users_with_user_id_role_mappings_realm_get(&self.realm, id)
            .await
            .map_err(|e| lookup_error(e, "User", id))?;
        Ok(roles.into_iter().map(from_kc_role).collect())
    }

    async fn set_user_password(
        &self,
        id: &str,
        password: &str,
        temporary: bool,
    ) -> ProviderResult<()> {
        let credential = CredentialRepresentation::password(password, temporary);
        self.admin
            .realm_users_with_user_id_reset_password_put(
                &self.realm,
                id,
                to_kc_credential(&credential),
            )
            .await
            .map_err(|e| lookup_error(e, "User", id))?;
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> ProviderResult<()> {
        self.admin
            .realm_users_with_user_id_delete(&self.realm, id)
            .await
            .map_err(|e| lookup_error(e, "User", id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_user_to_client_type() {
        let user = UserRepresentation {
            username: Some("jdoe".to_string()),
            enabled: Some(true),
            required_actions: vec!["UPDATE_PASSWORD".to_string()],
            credentials: vec![CredentialRepresentation::password("pw", true)],
            ..Default::default()
        };
        let mapped = to_kc_user(&user);

        assert_eq!(mapped.username.as_deref(), Some("jdoe"));
        assert_eq!(mapped.email, None);
        assert_eq!(
            mapped.required_actions,
            Some(vec!["UPDATE_PASSWORD".to_string()])
        );
        let credentials = mapped.credentials.unwrap_or_default();
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].type_.as_deref(), Some("password"));
        assert_eq!(credentials[0].temporary, Some(true));
    }

    #[test]
    fn empty_lists_are_omitted() {
        let mapped = to_kc_user(&UserRepresentation::default());
        assert!(mapped.required_actions.is_none());
        assert!(mapped.credentials.is_none());
    }

    #[test]
    fn role_without_flags_defaults_to_realm_role() {
        let role = from_kc_role(kc::RoleRepresentation {
            name: Some("editor".to_string()),
            ..Default::default()
        });
        assert_eq!(role, RoleRepresentation::new("editor"));
    }

    #[test]
    fn debug_hides_secret() {
        let client = KeycloakAdminClient::new(&ProviderConfig::new(
            "https://sso.example.org/",
            "app",
            "test-api",
            "top-secret",
        ))
        .unwrap();
        assert_eq!(client.base_url(), "https://sso.example.org");
        assert!(!format!("{client:?}").contains("top-secret"));
    }
}
