use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

use crate::approle::AppRoleCredential;
use crate::backend::{SecretBackend, SecretConnection, VaultBackend};
use crate::config::Config;
use crate::control::{ControlApi, HttpControlApi};
use crate::error::VaultClientError;
use crate::{Secret, SecretFetcher};

/// [`SecretFetcher`] authenticating every call through AppRole.
///
/// Each [`get`](SecretFetcher::get) resolves the role-id, mints a new secret-id, logs in and
/// reads the secret with the resulting session. Nothing is cached between calls. Calls on one
/// instance are serialized, so the requests of two calls never interleave.
pub struct AppRoleSecretFetcher<C = HttpControlApi, B = VaultBackend> {
    clients: Mutex<Clients<C, B>>,
}

struct Clients<C, B> {
    control: C,
    backend: B,
}

impl AppRoleSecretFetcher {
    /// Creates a fetcher talking to the Vault server described by `config`.
    ///
    /// Note that this constructor does not attempt to connect to the vault server.
    pub fn new(config: Config) -> Result<Self, VaultClientError> {
        let control = HttpControlApi::new(&config)?;
        Ok(Self::with_clients(control, VaultBackend::new(config)))
    }
}

impl<C, B> AppRoleSecretFetcher<C, B>
where
    C: ControlApi,
    B: SecretBackend,
{
    /// Creates a fetcher from an existing control API client and secret backend
    pub fn with_clients(control: C, backend: B) -> Self {
        Self {
            clients: Mutex::new(Clients { control, backend }),
        }
    }
}

impl<C, B> Clients<C, B>
where
    C: ControlApi,
    B: SecretBackend,
{
    async fn fetch(
        &self,
        token: &str,
        engine_name: &str,
        secret_name: &str,
    ) -> Result<Secret, VaultClientError> {
        let mut connection = self.backend.connect()?;

        let role_id = self.control.role_id(token).await?;
        let secret_id = self.control.secret_id(token).await?;
        let credential = AppRoleCredential::new(role_id, secret_id)?;

        let session = connection
            .login(&credential)
            .await?
            .ok_or(VaultClientError::MissingSession)?;
        drop(credential);
        debug!("AppRole login succeeded, reading secret");

        connection.read_kv2(&session, engine_name, secret_name).await
    }
}

#[async_trait]
impl<C, B> SecretFetcher for AppRoleSecretFetcher<C, B>
where
    C: ControlApi,
    B: SecretBackend,
{
    #[instrument(level = "debug", skip(self, token))]
    async fn get(
        &self,
        token: &str,
        engine_name: &str,
        secret_name: &str,
    ) -> Result<Secret, VaultClientError> {
        let clients = self.clients.lock().await;
        clients
            .fetch(token, engine_name, secret_name)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to fetch secret from vault");
                err
            })
    }
}
