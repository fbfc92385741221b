//! Configuration for the AppRole secret fetcher
//!

use core::time::Duration;

use std::collections::HashMap;
use std::env;

use tracing::warn;
use url::Url;

use crate::error::VaultClientError;

/// Default address at which Vault is expected to be running,
/// used if unspecified by configuration
pub const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";

/// Default mount point of the AppRole auth method
pub const DEFAULT_APPROLE_MOUNT: &str = "approle";

/// AppRole fetcher configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Url of the Vault server, can be set in environment with VAULT_ADDR.
    /// Defaults to 'http://127.0.0.1:8200'
    pub endpoint: Url,
    /// Name of the AppRole whose role-id and secret-id are requested,
    /// can be set in environment with VAULT_ROLE_NAME. Required
    pub role_name: String,
    /// Mount point of the AppRole auth method, can be set in environment with VAULT_APPROLE_MOUNT.
    /// Defaults to "approle"
    pub auth_mount: String,
    /// certificate files - path to CA certificate file(s). Setting this enables TLS
    /// The value `certs` and the environment variable `VAULT_CERTS`
    /// are parsed as a comma-separated string of file paths to generate this list.
    pub certs: Vec<String>,
    /// Request timeout applied to every call made to Vault, in seconds when read from
    /// VAULT_TIMEOUT or `timeout`. No timeout unless set.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Create a configuration for `role_name` against the Vault server at `endpoint`
    pub fn new(endpoint: Url, role_name: impl Into<String>) -> Self {
        Self {
            endpoint,
            role_name: role_name.into(),
            auth_mount: DEFAULT_APPROLE_MOUNT.to_string(),
            certs: Vec::new(),
            timeout: None,
        }
    }

    /// initialize from config values, environment, and defaults
    pub fn from_values(values: &HashMap<String, String>) -> Result<Config, VaultClientError> {
        Self::from_sources(values, |key| env::var(key).ok())
    }

    fn from_sources(
        values: &HashMap<String, String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Config, VaultClientError> {
        let lookup = |var: &str, key: &str| {
            env(var)
                .or_else(|| values.get(key).cloned())
                .or_else(|| values.get(&key.to_uppercase()).cloned())
        };

        let addr = lookup("VAULT_ADDR", "addr").unwrap_or_else(|| DEFAULT_VAULT_ADDR.to_string());
        let endpoint = addr.parse::<Url>().map_err(|err| {
            VaultClientError::Config(format!("could not parse Vault address [{addr}]: {err}"))
        })?;
        let role_name = lookup("VAULT_ROLE_NAME", "role_name")
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                VaultClientError::Config("missing setting for 'role_name' or VAULT_ROLE_NAME".into())
            })?;
        let auth_mount = lookup("VAULT_APPROLE_MOUNT", "approle_mount")
            .map(|mount| mount.trim_matches('/').to_string())
            .filter(|mount| !mount.is_empty())
            .unwrap_or_else(|| DEFAULT_APPROLE_MOUNT.to_string());
        let certs = lookup("VAULT_CERTS", "certs")
            .map(|certs| {
                certs
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let timeout = lookup("VAULT_TIMEOUT", "timeout").and_then(|val| match val.parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                warn!(value = %val, "could not parse VAULT_TIMEOUT as u64, ignoring it");
                None
            }
        });

        Ok(Config {
            endpoint,
            role_name,
            auth_mount,
            certs,
            timeout,
        })
    }

    /// Base URL of the control API for the configured role,
    /// `{endpoint}/v1/auth/{auth_mount}/role/{role_name}`
    pub(crate) fn role_url(&self) -> String {
        format!(
            "{}/v1/auth/{}/role/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            self.auth_mount,
            self.role_name
        )
    }
}
