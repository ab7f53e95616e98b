//! # idp-core
//!
//! Shared types for integrating an application with a Keycloak realm.
//!
//! This crate provides:
//! - The token-derived [`User`] and the application-facing [`AppUser`] shapes
//! - Mapping from decoded access-token claims to a [`User`]
//! - Connection settings for the identity provider
//!
//! Nothing here talks to the network; see `idp-guard` and `idp-admin`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod claims;
pub mod config;
pub mod error;
pub mod user;

pub use claims::TokenClaims;
pub use config::{AdminConfig, GuardConfig, ProviderConfig};
pub use error::{ConfigError, ConfigResult};
pub use user::{ensure_role, AppUser, AppUserDraft, AppUserPassword, User};
