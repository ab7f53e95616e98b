//! # idp-guard
//!
//! Role-based authorization for users resolved from verified tokens.
//!
//! ## Modules
//!
//! - [`requirement`] - Role requirements and their evaluation
//! - [`guard`] - The configured [`RoleGuard`]
//! - [`middleware`] - Axum middleware and extractor
//! - [`error`] - Authorization errors and HTTP responses
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::{middleware, routing::get, Router};
//! use idp_guard::{middleware::require, RoleGuard};
//!
//! let guard = RoleGuard::new(GuardConfig::from_env()?);
//!
//! let app = Router::new()
//!     .route("/admin/stats", get(stats))
//!     .layer(middleware::from_fn(require(guard.clone(), guard.require_admin())));
//! ```
//!
//! The host application is responsible for verifying the bearer token and
//! inserting an [`AuthenticatedUser`] into the request extensions before the
//! guard runs.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod guard;
pub mod middleware;
pub mod requirement;

pub use error::{GuardError, GuardResult};
pub use guard::RoleGuard;
pub use middleware::AuthenticatedUser;
pub use requirement::RoleRequirement;
