//! Application user management.
//!
//! [`AdminService`] exposes the accounts holding the application's marker
//! role as [`AppUser`]s and proxies changes to the provider. Every
//! operation is a plain sequence of provider calls: no retries, no caching
//! and no compensation when a later call fails.

use std::sync::Arc;

use idp_core::{ensure_role, AdminConfig, AppUser, AppUserDraft};

use crate::client::AdminClient;
use crate::error::{AdminError, AdminResult, ProviderError};
use crate::provider::KeycloakAdminClient;
use crate::representation::{
    CredentialRepresentation, RoleRepresentation, UserRepresentation, UPDATE_PASSWORD,
};
use crate::resolve::resolve_user_id;

/// Manages the users of one application within a realm.
pub struct AdminService<C: AdminClient + ?Sized> {
    client: Arc<C>,
    app_user_role: String,
}

impl<C: AdminClient + ?Sized> Clone for AdminService<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            app_user_role: self.app_user_role.clone(),
        }
    }
}

impl AdminService<KeycloakAdminClient> {
    /// Creates a service talking to the configured Keycloak server.
    pub fn connect(config: &AdminConfig) -> AdminResult<Self> {
        let client = KeycloakAdminClient::new(&config.provider)?;
        tracing::info!(
            url = %config.provider.url,
            realm = %config.provider.realm,
            app_user_role = %config.app_user_role,
            "admin client configured"
        );
        Ok(Self::new(Arc::new(client), config.app_user_role.clone()))
    }
}

impl<C: AdminClient + ?Sized> AdminService<C> {
    /// Creates a service over an existing client.
    pub fn new(client: Arc<C>, app_user_role: impl Into<String>) -> Self {
        Self {
            client,
            app_user_role: app_user_role.into(),
        }
    }

    /// Returns the underlying admin client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the role marking application users.
    #[must_use]
    pub fn app_user_role(&self) -> &str {
        &self.app_user_role
    }

    /// Lists the users holding the application role, with their realm roles.
    pub async fn list_users(&self) -> AdminResult<Vec<AppUser>> {
        let members = self
            .client
            .get_realm_role_members(&self.app_user_role)
            .await
            .map_err(|e| AdminError::from_provider(e, "Role", &self.app_user_role))?;

        let mut users = Vec::with_capacity(members.len());
        for member in members {
            users.push(self.to_app_user(member).await?);
        }
        Ok(users)
    }

    /// Gets a user by id or username.
    ///
    /// ## Errors
    ///
    /// Returns `AdminError::NotFound` if neither a username nor an id matches.
    pub async fn get_user(&self, id_or_name: &str) -> AdminResult<AppUser> {
        let user_ref = resolve_user_id(self.client.as_ref(), id_or_name).await?;
        if user_ref.is_literal() {
            tracing::debug!(input = %id_or_name, "fetching user by literal id");
        }
        self.fetch_user(user_ref.id()).await.map_err(|e| match e {
            AdminError::NotFound {
                entity_type: "User",
                ..
            } => AdminError::not_found("User", id_or_name),
            other => other,
        })
    }

    /// Creates a user with a temporary password.
    ///
    /// The user must change the password at first login. The application
    /// role is always assigned, alongside any roles requested in the draft.
    ///
    /// ## Errors
    ///
    /// Returns `AdminError::NotFound` if a requested role doesn't exist; in
    /// that case no user is created.
    pub async fn create_user(&self, draft: AppUserDraft) -> AdminResult<AppUser> {
        let AppUserDraft { user, password } = draft;

        let mut role_names = user.roles;
        ensure_role(&mut role_names, &self.app_user_role);
        let roles = self.roles(&role_names).await?;

        let payload = UserRepresentation {
            username: Some(user.username),
            email: Some(user.email),
            email_verified: Some(user.email_verified),
            first_name: user.first_name,
            last_name: user.last_name,
            enabled: Some(user.enabled),
            required_actions: vec![UPDATE_PASSWORD.to_string()],
            credentials: vec![CredentialRepresentation::password(password, true)],
            ..Default::default()
        };
        let id = self.client.create_user(&payload).await?;
        tracing::info!(user_id = %id, username = ?payload.username, "user created");

        self.client.assign_realm_roles(&id, &roles).await?;
        tracing::info!(user_id = %id, roles = ?role_names, "realm roles assigned");

        self.fetch_mutated_user(&id).await
    }

    /// Updates the profile fields that are set, and adds roles if given.
    ///
    /// Empty strings count as absent; `enabled` is always applied. Role
    /// assignment only adds mappings, it never removes any.
    ///
    /// ## Errors
    ///
    /// Returns `AdminError::Validation` if `user.id` is missing and
    /// `AdminError::NotFound` if the user or a requested role doesn't exist.
    pub async fn update_user(&self, user: AppUser) -> AdminResult<AppUser> {
        let id = user
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AdminError::Validation("user id is required for update".to_string()))?;

        let payload = UserRepresentation {
            email: Some(user.email).filter(|v| !v.is_empty()),
            first_name: user.first_name.filter(|v| !v.is_empty()),
            last_name: user.last_name.filter(|v| !v.is_empty()),
            enabled: Some(user.enabled),
            ..Default::default()
        };
        self.client
            .update_user(&id, &payload)
            .await
            .map_err(|e| AdminError::from_provider(e, "User", &id))?;
        tracing::info!(user_id = %id, "user updated");

        if !user.roles.is_empty() {
            let mut role_names = user.roles;
            ensure_role(&mut role_names, &self.app_user_role);
            let roles = self.roles(&role_names).await?;
            self.client
                .assign_realm_roles(&id, &roles)
                .await
                .map_err(|e| AdminError::from_provider(e, "User", &id))?;
            tracing::info!(user_id = %id, roles = ?role_names, "realm roles assigned");
        }

        self.fetch_mutated_user(&id).await
    }

    /// Sets a temporary password, to be changed at next login.
    ///
    /// ## Errors
    ///
    /// Returns `AdminError::NotFound` if the user doesn't exist.
    pub async fn update_user_password(&self, id: &str, password: &str) -> AdminResult<()> {
        let user = self.get_user(id).await?;
        let user_id = user.id.as_deref().unwrap_or(id);

        self.client
            .set_user_password(user_id, password, true)
            .await
            .map_err(|e| AdminError::from_provider(e, "User", id))?;
        tracing::info!(user_id = %user_id, "temporary password set");
        Ok(())
    }

    /// Deletes a user by id or username and returns the deleted record.
    ///
    /// The returned record lists the application role, like the results of
    /// the other mutating operations.
    ///
    /// ## Errors
    ///
    /// Returns `AdminError::NotFound` if the user doesn't exist; nothing is
    /// deleted in that case.
    pub async fn delete_user(&self, id_or_name: &str) -> AdminResult<AppUser> {
        let mut user = self.get_user(id_or_name).await?;
        ensure_role(&mut user.roles, &self.app_user_role);
        let user_id = user.id.as_deref().unwrap_or(id_or_name);

        self.client
            .delete_user(user_id)
            .await
            .map_err(|e| AdminError::from_provider(e, "User", id_or_name))?;
        tracing::info!(user_id = %user_id, username = %user.username, "user deleted");
        Ok(user)
    }

    /// Looks up a realm role by name.
    ///
    /// ## Errors
    ///
    /// Returns `AdminError::NotFound` if the role doesn't exist.
    pub async fn role(&self, name: &str) -> AdminResult<RoleRepresentation> {
        self.client
            .get_realm_role(name)
            .await
            .map_err(|e| AdminError::from_provider(e, "Role", name))
    }

    async fn roles(&self, names: &[String]) -> AdminResult<Vec<RoleRepresentation>> {
        let mut roles = Vec::with_capacity(names.len());
        for name in names {
            roles.push(self.role(name).await?);
        }
        Ok(roles)
    }

    /// Fetches a user by provider id.
    async fn fetch_user(&self, id: &str) -> AdminResult<AppUser> {
        let user = self
            .client
            .get_user(id)
            .await
            .map_err(|e| AdminError::from_provider(e, "User", id))?;
        self.to_app_user(user).await
    }

    /// Fetches a user after a change; the application role is always reported.
    async fn fetch_mutated_user(&self, id: &str) -> AdminResult<AppUser> {
        let mut user = self.fetch_user(id).await?;
        ensure_role(&mut user.roles, &self.app_user_role);
        Ok(user)
    }

    /// Converts a provider user, loading its realm role names.
    async fn to_app_user(&self, user: UserRepresentation) -> AdminResult<AppUser> {
        let id = user.id.ok_or_else(|| {
            ProviderError::InvalidResponse("user representation without id".to_string())
        })?;
        let roles = self
            .client
            .get_realm_roles_of_user(&id)
            .await
            .map_err(|e| AdminError::from_provider(e, "User", &id))?;

        Ok(AppUser {
            id: Some(id),
            username: user.username.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
            email_verified: user.email_verified.unwrap_or(false),
            first_name: user.first_name,
            last_name: user.last_name,
            enabled: user.enabled.unwrap_or(false),
            totp: user.totp.unwrap_or(false),
            roles: roles.into_iter().map(|role| role.name).collect(),
        })
    }
}
