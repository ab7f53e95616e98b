//! Identity provider admin client trait.

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::representation::{RoleRepresentation, UserRepresentation};

/// Administrative operations consumed from the identity provider.
///
/// Implementations must be thread-safe. No retries are expected; failures
/// are reported as-is.
#[async_trait]
pub trait AdminClient: Send + Sync {
    /// Lists the users holding a realm role.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::NotFound` if the role doesn't exist.
    async fn get_realm_role_members(&self, role: &str) -> ProviderResult<Vec<UserRepresentation>>;

    /// Looks up the id of a user by username.
    async fn get_user_id(&self, username: &str) -> ProviderResult<Option<String>>;

    /// Gets a user by id.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::NotFound` if the user doesn't exist.
    async fn get_user(&self, id: &str) -> ProviderResult<UserRepresentation>;

    /// Creates a user and returns its id.
    async fn create_user(&self, payload: &UserRepresentation) -> ProviderResult<String>;

    /// Updates the fields present in `payload`.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::NotFound` if the user doesn't exist.
    async fn update_user(&self, id: &str, payload: &UserRepresentation) -> ProviderResult<()>;

    /// Adds realm role mappings to a user.
    async fn assign_realm_roles(
        &self,
        id: &str,
        roles: &[RoleRepresentation],
    ) -> ProviderResult<()>;

    /// Gets a realm role by name.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::NotFound` if the role doesn't exist.
    async fn get_realm_role(&self, name: &str) -> ProviderResult<RoleRepresentation>;

    /// Lists the realm roles mapped to a user.
    async fn get_realm_roles_of_user(&self, id: &str) -> ProviderResult<Vec<RoleRepresentation>>;

    /// Sets a user's password.
    async fn set_user_password(
        &self,
        id: &str,
        password: &str,
        temporary: bool,
    ) -> ProviderResult<()>;

    /// Deletes a user.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::NotFound` if the user doesn't exist.
    async fn delete_user(&self, id: &str) -> ProviderResult<()>;
}
