//! Resolution of user references.
//!
//! Callers may address a user by username or by provider id. Resolution
//! first looks the input up as a username; when no such username exists the
//! input is taken as a literal id. The literal fallback can hide a genuinely
//! unknown user until the id itself is used, so it is reported explicitly.

use crate::client::AdminClient;
use crate::error::ProviderResult;

/// Outcome of resolving a username-or-id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    /// The input matched a username; this is its id.
    Username {
        /// Provider id of the user.
        id: String,
    },
    /// No username matched; the input is used verbatim as an id.
    Literal(String),
}

impl UserRef {
    /// Returns the id to address the provider with.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Username { id } | Self::Literal(id) => id,
        }
    }

    /// Consumes the reference, returning the id.
    #[must_use]
    pub fn into_id(self) -> String {
        match self {
            Self::Username { id } | Self::Literal(id) => id,
        }
    }

    /// Returns true when the username lookup did not match.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// Resolves `id_or_name` to a provider id.
///
/// Provider errors other than "not found" are returned, not swallowed.
pub async fn resolve_user_id<C>(client: &C, id_or_name: &str) -> ProviderResult<UserRef>
where
    C: AdminClient + ?Sized,
{
    match client.get_user_id(id_or_name).await {
        Ok(Some(id)) => Ok(UserRef::Username { id }),
        Ok(None) => {
            tracing::debug!(input = %id_or_name, "no username match, using input as user id");
            Ok(UserRef::Literal(id_or_name.to_string()))
        }
        Err(err) if err.is_not_found() => {
            tracing::debug!(
                input = %id_or_name,
                error = %err,
                "username lookup not found, using input as user id"
            );
            Ok(UserRef::Literal(id_or_name.to_string()))
        }
        Err(err) => Err(err),
    }
}
