//! Admin proxy error types.
//!
//! [`ProviderError`] describes failures of the identity provider or its
//! transport and is passed through unchanged. [`AdminError`] adds the kinds
//! the proxy itself decides on.

use keycloak::KeycloakError;
use thiserror::Error;

/// Errors reported by an [`AdminClient`](crate::client::AdminClient).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The addressed resource does not exist on the provider.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Type of resource (e.g., "User", "Role").
        resource: &'static str,
        /// Identifier used in the request.
        id: String,
    },

    /// The provider answered with something unexpected.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Returns true if the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Api { status: 404, .. })
    }
}

impl From<KeycloakError> for ProviderError {
    fn from(err: KeycloakError) -> Self {
        match err {
            KeycloakError::ReqwestFailure(e) => Self::Http(e),
            KeycloakError::HttpFailure { status, text, .. } => Self::Api {
                status,
                message: text,
            },
            #[allow(unreachable_patterns)]
            other => Self::InvalidResponse(other.to_string()),
        }
    }
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors returned by the [`AdminService`](crate::service::AdminService).
#[derive(Debug, Error)]
pub enum AdminError {
    /// User or role does not resolve on the provider.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Type of entity (e.g., "User", "Role").
        entity_type: &'static str,
        /// Identifier or name that failed to resolve.
        id: String,
    },

    /// The request cannot be carried out as given.
    #[error("validation error: {0}")]
    Validation(String),

    /// Provider failure, passed through.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl AdminError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns true for [`AdminError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Converts a provider error, turning a missing resource into
    /// [`AdminError::NotFound`] for `id`.
    pub(crate) fn from_provider(err: ProviderError, entity_type: &'static str, id: &str) -> Self {
        if err.is_not_found() {
            Self::not_found(entity_type, id)
        } else {
            Self::Provider(err)
        }
    }
}

/// Result type for admin operations.
pub type AdminResult<T> = Result<T, AdminError>;
