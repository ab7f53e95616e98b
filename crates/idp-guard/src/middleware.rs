//! Axum integration.
//!
//! Token verification happens upstream: the host's authentication layer
//! inserts an [`AuthenticatedUser`] into the request extensions. The
//! [`require`] middleware then enforces a [`RoleRequirement`] on it.

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use idp_core::User;

use crate::error::GuardError;
use crate::guard::RoleGuard;
use crate::requirement::RoleRequirement;

/// The authenticated user of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    /// Returns the wrapped user.
    #[must_use]
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

/// Axum extractor for [`AuthenticatedUser`].
///
/// ```ignore
/// async fn handler(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
///     user.username
/// }
/// ```
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(GuardError::Unauthenticated)
    }
}

/// Creates a middleware function enforcing `requirement` through `guard`.
///
/// ```ignore
/// let router = Router::new()
///     .route("/users", get(list_users))
///     .layer(axum::middleware::from_fn(require(guard.clone(), guard.require_admin())));
/// ```
pub fn require(
    guard: RoleGuard,
    requirement: RoleRequirement,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |request: Request, next: Next| {
        let guard = guard.clone();
        let requirement = requirement.clone();
        Box::pin(async move {
            let Some(AuthenticatedUser(user)) =
                request.extensions().get::<AuthenticatedUser>().cloned()
            else {
                return GuardError::Unauthenticated.into_response();
            };

            match guard.authorize(&user, &requirement) {
                Ok(_) => next.run(request).await,
                Err(err) => err.into_response(),
            }
        })
    }
}
