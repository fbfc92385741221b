//! Fetch secrets from Hashicorp Vault on behalf of a caller token, using AppRole authentication.
//!
//! Every fetch performs the whole handshake from scratch:
//!
//! 1. read the role-id of the configured role with the caller's token
//! 2. mint a fresh secret-id for that role with the caller's token
//! 3. log in with the role-id/secret-id pair
//! 4. read the requested secret from a KV v2 engine with the resulting session
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use wasmcloud_vault_client::{AppRoleSecretFetcher, Config, SecretFetcher as _};
//!
//! # async fn run() -> Result<(), wasmcloud_vault_client::VaultClientError> {
//! let config = Config::from_values(&HashMap::from([("role_name".into(), "web".into())]))?;
//! let fetcher = AppRoleSecretFetcher::new(config)?;
//! let secret = fetcher.get("caller-token", "kv", "app/db").await?;
//! println!("{:?}", secret.get("username"));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

pub mod approle;
pub mod backend;
pub mod config;
pub mod control;
pub mod error;
mod fetcher;

pub use approle::{AppRoleCredential, RoleId, SecretId, SessionCredential};
pub use backend::{SecretBackend, SecretConnection, VaultBackend, VaultConnection};
pub use config::Config;
pub use control::{ControlApi, HttpControlApi};
pub use error::VaultClientError;
pub use fetcher::AppRoleSecretFetcher;

/// Data of a secret, as stored in the KV engine. The shape is defined by whoever wrote it.
pub type Secret = HashMap<String, serde_json::Value>;

/// Retrieves secrets on behalf of a caller
#[async_trait]
pub trait SecretFetcher: Send + Sync {
    /// Fetch the data of `secret_name` from the KV v2 engine mounted at `engine_name`,
    /// authorizing with `token`.
    ///
    /// No partial data is ever returned: any failing step fails the whole call.
    async fn get(
        &self,
        token: &str,
        engine_name: &str,
        secret_name: &str,
    ) -> Result<Secret, VaultClientError>;
}
