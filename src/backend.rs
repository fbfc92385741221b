//! Hashicorp vault login and KV v2 reads
//!

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{debug, info, instrument};
use vaultrs::client::{Client as _, VaultClient, VaultClientSettings};
use vaultrs::error::ClientError;

use crate::approle::{AppRoleCredential, SessionCredential};
use crate::config::Config;
use crate::error::VaultClientError;
use crate::Secret;

/// Vault HTTP api version. As of Vault 1.9.x (Feb 2022), all http api calls use version 1
const API_VERSION: u8 = 1;

/// Factory for connections to the secret store
pub trait SecretBackend: Send + Sync {
    type Connection: SecretConnection;

    /// Create a new, unauthenticated connection. Does not contact the server.
    fn connect(&self) -> Result<Self::Connection, VaultClientError>;
}

/// A single connection used for one login and the reads authorized by it
#[async_trait]
pub trait SecretConnection: Send {
    /// Exchange an AppRole credential for a session.
    ///
    /// `Ok(None)` means the server answered without any session.
    async fn login(
        &mut self,
        credential: &AppRoleCredential,
    ) -> Result<Option<SessionCredential>, VaultClientError>;

    /// Read the latest version of `secret` from the KV v2 engine mounted at `engine`
    async fn read_kv2(
        &mut self,
        session: &SessionCredential,
        engine: &str,
        secret: &str,
    ) -> Result<Secret, VaultClientError>;
}

/// [`SecretBackend`] talking to Vault through [`vaultrs`]
#[derive(Clone, Debug)]
pub struct VaultBackend {
    config: Config,
}

impl VaultBackend {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl SecretBackend for VaultBackend {
    type Connection = VaultConnection;

    fn connect(&self) -> Result<VaultConnection, VaultClientError> {
        let client = VaultClient::new(VaultClientSettings {
            token: String::new(),
            address: self.config.endpoint.clone(),
            ca_certs: self.config.certs.clone(),
            verify: true,
            version: API_VERSION,
            wrapping: false,
            timeout: self.config.timeout,
            namespace: None,
            identity: None,
        })
        .map_err(VaultClientError::BuildClient)?;
        Ok(VaultConnection {
            client,
            auth_mount: self.config.auth_mount.clone(),
        })
    }
}

/// Vault client connection information.
pub struct VaultConnection {
    client: VaultClient,
    auth_mount: String,
}

#[async_trait]
impl SecretConnection for VaultConnection {
    #[instrument(level = "debug", skip_all, fields(role_id = %credential.role_id()))]
    async fn login(
        &mut self,
        credential: &AppRoleCredential,
    ) -> Result<Option<SessionCredential>, VaultClientError> {
        let auth = match vaultrs::auth::approle::login(
            &self.client,
            &self.auth_mount,
            credential.role_id().as_str(),
            credential.secret_id().expose(),
        )
        .await
        {
            Ok(auth) if auth.client_token.is_empty() => return Ok(None),
            Ok(auth) => auth,
            Err(ClientError::ResponseEmptyError) => return Ok(None),
            Err(err) => return Err(VaultClientError::Login(err)),
        };
        info!(
            accessor = %auth.accessor,
            lease_duration = auth.lease_duration,
            "logged in with AppRole"
        );
        Ok(Some(SessionCredential {
            token: SecretString::from(auth.client_token),
            accessor: auth.accessor,
            policies: auth.policies,
            lease_duration: auth.lease_duration,
            renewable: auth.renewable,
        }))
    }

    #[instrument(level = "debug", skip(self, session))]
    async fn read_kv2(
        &mut self,
        session: &SessionCredential,
        engine: &str,
        secret: &str,
    ) -> Result<Secret, VaultClientError> {
        self.client.set_token(session.expose_token());
        let data = vaultrs::kv2::read(&self.client, engine, secret)
            .await
            .map_err(|source| VaultClientError::ReadSecret {
                engine: engine.to_string(),
                secret: secret.to_string(),
                source,
            })?;
        debug!("read secret");
        Ok(data)
    }
}
