//! In-memory admin client.
//!
//! Keeps users, realm roles and role mappings in process memory and mimics
//! the provider's observable behavior: unknown ids are `NotFound`, duplicate
//! usernames are rejected with a 409, role mappings are a set. Intended for
//! tests and local development without a running identity provider.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::client::AdminClient;
use crate::error::{ProviderError, ProviderResult};
use crate::representation::{RoleRepresentation, UserRepresentation};

/// Stored password credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPassword {
    /// Password value.
    pub value: String,
    /// Whether it must be changed at next login.
    pub temporary: bool,
}

#[derive(Default)]
struct State {
    users: BTreeMap<String, UserRepresentation>,
    roles: BTreeMap<String, RoleRepresentation>,
    mappings: BTreeMap<String, Vec<String>>,
    passwords: BTreeMap<String, StoredPassword>,
}

/// Admin client backed by process memory.
#[derive(Default)]
pub struct InMemoryAdminClient {
    state: RwLock<State>,
    next_id: AtomicU64,
    unavailable: AtomicBool,
    reject_role_assignments: AtomicBool,
}

impl InMemoryAdminClient {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with the given realm roles defined.
    #[must_use]
    pub fn with_realm_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        for role in roles {
            client.add_realm_role(role);
        }
        client
    }

    /// Defines a realm role.
    pub fn add_realm_role(&self, name: impl Into<String>) {
        let name = name.into();
        let mut role = RoleRepresentation::new(name.clone());
        role.id = Some(format!("role-{name}"));
        self.state.write().roles.insert(name, role);
    }

    /// Returns the stored password of a user.
    #[must_use]
    pub fn password_of(&self, id: &str) -> Option<StoredPassword> {
        self.state.read().passwords.get(id).cloned()
    }

    /// Returns the number of stored users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.state.read().users.len()
    }

    /// Makes every subsequent call fail with a 503, or restores service.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes role assignment fail with a 500 while other calls still succeed.
    pub fn set_reject_role_assignments(&self, reject: bool) {
        self.reject_role_assignments.store(reject, Ordering::SeqCst);
    }

    fn check_available(&self) -> ProviderResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(ProviderError::Api {
                status: 503,
                message: "provider unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn generate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("00000000-0000-4000-8000-{n:012}")
    }
}

fn merge(target: &mut UserRepresentation, update: &UserRepresentation) {
    if let Some(ref v) = update.username {
        target.username = Some(v.clone());
    }
    if let Some(ref v) = update.email {
        target.email = Some(v.clone());
    }
    if let Some(v) = update.email_verified {
        target.email_verified = Some(v);
    }
    if let Some(ref v) = update.first_name {
        target.first_name = Some(v.clone());
    }
    if let Some(ref v) = update.last_name {
        target.last_name = Some(v.clone());
    }
    if let Some(v) = update.enabled {
        target.enabled = Some(v);
    }
    if let Some(v) = update.totp {
        target.totp = Some(v);
    }
    if !update.required_actions.is_empty() {
        target.required_actions = update.required_actions.clone();
    }
}

#[async_trait]
impl AdminClient for InMemoryAdminClient {
    async fn get_realm_role_members(&self, role: &str) -> ProviderResult<Vec<UserRepresentation>> {
        self.check_available()?;
        let state = self.state.read();
        if !state.roles.contains_key(role) {
            return Err(ProviderError::not_found("Role", role));
        }
        Ok(state
            .users
            .iter()
            .filter(|(id, _)| {
                state
                    .mappings
                    .get(id.as_str())
                    .is_some_and(|roles| roles.iter().any(|r| r == role))
            })
            .map(|(_, user)| user.clone())
            .collect())
    }

    async fn get_user_id(&self, username: &str) -> ProviderResult<Option<String>> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .users
            .values()
            .find(|u| {
                u.username
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(username))
            })
            .and_then(|u| u.id.clone()))
    }

    async fn get_user(&self, id: &str) -> ProviderResult<UserRepresentation> {
        self.check_available()?;
        self.state
            .read()
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::not_found("User", id))
    }

    async fn create_user(&self, payload: &UserRepresentation) -> ProviderResult<String> {
        self.check_available()?;
        let username = payload
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ProviderError::Api {
                status: 400,
                message: "username is required".to_string(),
            })?
            .to_lowercase();

        let mut state = self.state.write();
        let taken = state
            .users
            .values()
            .any(|u| u.username.as_deref() == Some(username.as_str()));
        if taken {
            return Err(ProviderError::Api {
                status: 409,
                message: "User exists with same username".to_string(),
            });
        }

        let id = self.generate_id();
        let mut user = UserRepresentation {
            id: Some(id.clone()),
            username: Some(username),
            enabled: Some(false),
            email_verified: Some(false),
            totp: Some(false),
            ..Default::default()
        };
        merge(
            &mut user,
            &UserRepresentation {
                username: None,
                ..payload.clone()
            },
        );

        if let Some(credential) = payload
            .credentials
            .iter()
            .find(|c| c.credential_type == "password")
        {
            state.passwords.insert(
                id.clone(),
                StoredPassword {
                    value: credential.value.clone(),
                    temporary: credential.temporary,
                },
            );
        }
        state.users.insert(id.clone(), user);
        Ok(id)
    }

    async fn update_user(&self, id: &str, payload: &UserRepresentation) -> ProviderResult<()> {
        self.check_available()?;
        let mut state = self.state.write();
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| ProviderError::not_found("User", id))?;
        merge(user, payload);
        Ok(())
    }

    async fn assign_realm_roles(
        &self,
        id: &str,
        roles: &[RoleRepresentation],
    ) -> ProviderResult<()> {
        self.check_available()?;
        if self.reject_role_assignments.load(Ordering::SeqCst) {
            return Err(ProviderError::Api {
                status: 500,
                message: "role mapping failed".to_string(),
            });
        }
        let mut state = self.state.write();
        if !state.users.contains_key(id) {
            return Err(ProviderError::not_found("User", id));
        }
        if let Some(missing) = roles.iter().find(|r| !state.roles.contains_key(&r.name)) {
            return Err(ProviderError::not_found("Role", missing.name.clone()));
        }

        let mapped = state.mappings.entry(id.to_string()).or_default();
        for role in roles {
            if !mapped.contains(&role.name) {
                mapped.push(role.name.clone());
            }
        }
        Ok(())
    }

    async fn get_realm_role(&self, name: &str) -> ProviderResult<RoleRepresentation> {
        self.check_available()?;
        self.state
            .read()
            .roles
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::not_found("Role", name))
    }

    async fn get_realm_roles_of_user(&self, id: &str) -> ProviderResult<Vec<RoleRepresentation>> {
        self.check_available()?;
        let state = self.state.read();
        if !state.users.contains_key(id) {
            return Err(ProviderError::not_found("User", id));
        }
        Ok(state
            .mappings
            .get(id)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|name| state.roles.get(name).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_user_password(
        &self,
        id: &str,
        password: &str,
        temporary: bool,
    ) -> ProviderResult<()> {
        self.check_available()?;
        let mut state = self.state.write();
        if !state.users.contains_key(id) {
            return Err(ProviderError::not_found("User", id));
        }
        state.passwords.insert(
            id.to_string(),
            StoredPassword {
                value: password.to_string(),
                temporary,
            },
        );
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> ProviderResult<()> {
        self.check_available()?;
        let mut state = self.state.write();
        if state.users.remove(id).is_none() {
            return Err(ProviderError::not_found("User", id));
        }
        state.mappings.remove(id);
        state.passwords.remove(id);
        Ok(())
    }
}
