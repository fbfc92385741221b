use reqwest::StatusCode;
use vaultrs::error::ClientError;

/// Errors that can be returned while fetching a secret through AppRole authentication
#[derive(Debug, thiserror::Error)]
pub enum VaultClientError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to build vault client")]
    BuildClient(#[source] ClientError),
    #[error("failed to build http client")]
    HttpClient(#[source] reqwest::Error),
    #[error("failed to read CA certificate [{path}]")]
    ReadCertificate {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse CA certificate [{path}]")]
    ParseCertificate {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to send request to [{url}]")]
    ControlApiRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to [{url}] returned status {status}")]
    ControlApiStatus { url: String, status: StatusCode },
    #[error("failed to decode response from [{url}]")]
    ControlApiResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unable to initialize AppRole auth method: {0}")]
    InvalidCredential(String),
    #[error("unable to login to AppRole auth method")]
    Login(#[source] ClientError),
    #[error("no auth info was returned after login")]
    MissingSession,
    #[error("unable to read secret [{secret}] from engine [{engine}]")]
    ReadSecret {
        engine: String,
        secret: String,
        #[source]
        source: ClientError,
    },
}
