//! # idp-admin
//!
//! Management of an application's users through the identity provider's
//! admin API.
//!
//! An account is a user of the application when it holds the configured
//! app user realm role. [`AdminService`] lists, fetches, creates, updates
//! and deletes such accounts and sets temporary passwords, translating
//! between the provider's representations and [`idp_core::AppUser`].
//!
//! ## Modules
//!
//! - [`client`] - The [`AdminClient`] trait consumed by the service
//! - [`provider`] - Implementation over the `keycloak` admin client
//! - [`memory`] - In-process implementation for tests and local development
//! - [`representation`] - Provider wire representations
//! - [`resolve`] - Username-or-id resolution
//! - [`service`] - The [`AdminService`]
//! - [`error`] - Error types
//!
//! ## Quick Start
//!
//! ```ignore
//! use idp_admin::AdminService;
//! use idp_core::AdminConfig;
//!
//! let service = AdminService::connect(&AdminConfig::from_env()?)?;
//! for user in service.list_users().await? {
//!     println!("{} {:?}", user.username, user.roles);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod memory;
pub mod provider;
pub mod representation;
pub mod resolve;
pub mod service;

pub use client::AdminClient;
pub use error::{AdminError, AdminResult, ProviderError, ProviderResult};
pub use memory::{InMemoryAdminClient, StoredPassword};
pub use representation::{CredentialRepresentation, RoleRepresentation, UserRepresentation};
pub use resolve::{resolve_user_id, UserRef};
pub use provider::KeycloakAdminClient;
pub use service::AdminService;
