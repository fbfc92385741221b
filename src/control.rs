//! Vault control API calls used to bootstrap AppRole authentication
//!
//! Both calls are authorized with the caller's token and target the configured role:
//!
//! - `GET  {endpoint}/v1/auth/{mount}/role/{role}/role-id`
//! - `POST {endpoint}/v1/auth/{mount}/role/{role}/secret-id`

use async_trait::async_trait;
use reqwest::{Certificate, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::approle::{RoleId, SecretId};
use crate::config::Config;
use crate::error::VaultClientError;

/// Header carrying the caller's token on control API requests
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

/// Default User-Agent header value for control API requests.
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Source of the role-id/secret-id pair used for AppRole login
#[async_trait]
pub trait ControlApi: Send + Sync {
    /// Fetch the role-id of the configured role
    async fn role_id(&self, token: &str) -> Result<RoleId, VaultClientError>;

    /// Mint a new secret-id for the configured role
    async fn secret_id(&self, token: &str) -> Result<SecretId, VaultClientError>;
}

#[derive(Debug, Deserialize)]
struct RoleContainer {
    data: RoleData,
}

#[derive(Debug, Deserialize)]
struct RoleData {
    #[serde(alias = "role_id")]
    id: String,
}

#[derive(Deserialize)]
struct SecretContainer {
    data: SecretData,
}

#[derive(Deserialize)]
struct SecretData {
    #[serde(alias = "secret_id")]
    id: String,
}

/// [`ControlApi`] backed by a pooled [`reqwest::Client`]
#[derive(Clone, Debug)]
pub struct HttpControlApi {
    client: Client,
    role_url: String,
}

impl HttpControlApi {
    /// Build an HTTP client honoring the configured CA certificates and timeout.
    ///
    /// No request is made here.
    pub fn new(config: &Config) -> Result<Self, VaultClientError> {
        let mut builder = Client::builder().user_agent(DEFAULT_USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        for path in &config.certs {
            let pem = std::fs::read(path).map_err(|source| VaultClientError::ReadCertificate {
                path: path.clone(),
                source,
            })?;
            let cert =
                Certificate::from_pem(&pem).map_err(|source| VaultClientError::ParseCertificate {
                    path: path.clone(),
                    source,
                })?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder.build().map_err(VaultClientError::HttpClient)?;
        Ok(Self {
            client,
            role_url: config.role_url(),
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: String,
        token: &str,
    ) -> Result<T, VaultClientError> {
        let response = request
            .header(VAULT_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|source| VaultClientError::ControlApiRequest {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(VaultClientError::ControlApiStatus { url, status });
        }
        response
            .json()
            .await
            .map_err(|source| VaultClientError::ControlApiResponse { url, source })
    }
}

#[async_trait]
impl ControlApi for HttpControlApi {
    #[instrument(level = "debug", skip_all)]
    async fn role_id(&self, token: &str) -> Result<RoleId, VaultClientError> {
        let url = format!("{}/role-id", self.role_url);
        debug!(%url, "fetching role-id");
        let container: RoleContainer = self.send(self.client.get(&url), url, token).await?;
        Ok(RoleId::new(container.data.id))
    }

    #[instrument(level = "debug", skip_all)]
    async fn secret_id(&self, token: &str) -> Result<SecretId, VaultClientError> {
        let url = format!("{}/secret-id", self.role_url);
        debug!(%url, "minting secret-id");
        let container: SecretContainer = self.send(self.client.post(&url), url, token).await?;
        Ok(SecretId::from_string(container.data.id))
    }
}
