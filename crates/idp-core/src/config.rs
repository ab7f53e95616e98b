//! Identity provider connection settings.
//!
//! Settings are loaded from environment variables, optionally seeded from a
//! `.env` file. All structs also deserialize so a host application can embed
//! them in its own configuration file.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default name of the administrator role.
const DEFAULT_ADMIN_ROLE: &str = "admin";

/// Connection parameters for the identity provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider (e.g., `https://sso.example.org`).
    pub url: String,
    /// Realm name.
    pub realm: String,
    /// Confidential client id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Creates a configuration with the default timeout.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        realm: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            realm: realm.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Reads `IDP_URL`, `IDP_REALM`, `IDP_CLIENT_ID`, `IDP_CLIENT_SECRET`
    /// and the optional `IDP_TIMEOUT_SECS`.
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            required(&lookup, "IDP_URL")?,
            required(&lookup, "IDP_REALM")?,
            required(&lookup, "IDP_CLIENT_ID")?,
            required(&lookup, "IDP_CLIENT_SECRET")?,
        );
        if let Some(raw) = optional(&lookup, "IDP_TIMEOUT_SECS") {
            config.timeout_secs = raw.parse().map_err(|e| ConfigError::Invalid {
                key: "IDP_TIMEOUT_SECS",
                message: format!("{e}"),
            })?;
        }
        Ok(config)
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the role guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Connection parameters.
    #[serde(flatten)]
    pub provider: ProviderConfig,
    /// Role granting administrator access.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

fn default_admin_role() -> String {
    DEFAULT_ADMIN_ROLE.to_string()
}

impl GuardConfig {
    /// Creates guard settings.
    #[must_use]
    pub fn new(provider: ProviderConfig, admin_role: impl Into<String>) -> Self {
        Self {
            provider,
            admin_role: admin_role.into(),
        }
    }

    /// Loads settings from the environment; `IDP_ADMIN_ROLE` defaults to `admin`.
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = ProviderConfig::from_lookup(&lookup)?;
        let admin_role = optional(&lookup, "IDP_ADMIN_ROLE").unwrap_or_else(default_admin_role);
        Ok(Self::new(provider, admin_role))
    }
}

/// Settings for the admin proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Connection parameters.
    #[serde(flatten)]
    pub provider: ProviderConfig,
    /// Realm role marking an account as a user of this application.
    pub app_user_role: String,
}

impl AdminConfig {
    /// Creates admin settings.
    #[must_use]
    pub fn new(provider: ProviderConfig, app_user_role: impl Into<String>) -> Self {
        Self {
            provider,
            app_user_role: app_user_role.into(),
        }
    }

    /// Loads settings from the environment; `IDP_APP_USER_ROLE` is required.
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = ProviderConfig::from_lookup(&lookup)?;
        let app_user_role = required(&lookup, "IDP_APP_USER_ROLE")?;
        Ok(Self::new(provider, app_user_role))
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> ConfigResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 4] = [
        ("IDP_URL", "https://sso.example.org/"),
        ("IDP_REALM", "SOMEAPP"),
        ("IDP_CLIENT_ID", "test-api"),
        ("IDP_CLIENT_SECRET", "xxxx-xxxx"),
    ];

    #[test]
    fn provider_from_lookup() {
        let config = ProviderConfig::from_lookup(env(&BASE)).unwrap();
        assert_eq!(config.url, "https://sso.example.org");
        assert_eq!(config.realm, "SOMEAPP");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = ProviderConfig::from_lookup(env(&BASE[..3])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("IDP_CLIENT_SECRET")));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut pairs = BASE.to_vec();
        pairs[1] = ("IDP_REALM", "  ");
        let err = ProviderConfig::from_lookup(env(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("IDP_REALM")));
    }

    #[test]
    fn invalid_timeout_is_reported() {
        let mut pairs = BASE.to_vec();
        pairs.push(("IDP_TIMEOUT_SECS", "soon"));
        let err = ProviderConfig::from_lookup(env(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "IDP_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn guard_admin_role_defaults() {
        let config = GuardConfig::from_lookup(env(&BASE)).unwrap();
        assert_eq!(config.admin_role, "admin");
    }

    #[test]
    fn admin_requires_app_user_role() {
        let err = AdminConfig::from_lookup(env(&BASE)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("IDP_APP_USER_ROLE")));

        let mut pairs = BASE.to_vec();
        pairs.push(("IDP_APP_USER_ROLE", "app-user"));
        let config = AdminConfig::from_lookup(env(&pairs)).unwrap();
        assert_eq!(config.app_user_role, "app-user");
    }

    #[test]
    fn debug_hides_secret() {
        let config = ProviderConfig::from_lookup(env(&BASE)).unwrap();
        assert!(!format!("{config:?}").contains("xxxx-xxxx"));
    }

    #[test]
    fn deserializes_flattened() {
        let json = r#"{
            "url": "https://sso.example.org",
            "realm": "SOMEAPP",
            "client_id": "test-api",
            "client_secret": "s",
            "app_user_role": "app-user"
        }"#;
        let config: AdminConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.app_user_role, "app-user");
    }
}
