//! AppRole identifiers and credentials
//!
//! A [`RoleId`] names the role that authenticates, a [`SecretId`] proves possession of it. Both
//! are exchanged for a [`SessionCredential`] at login and dropped afterwards.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::VaultClientError;

/// Identifier of an AppRole, as returned by the `role-id` endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-use secret paired with a [`RoleId`].
///
/// The value is never printed by `Debug`.
#[derive(Debug)]
pub enum SecretId {
    /// Secret-id minted by the control API and passed along as-is
    FromString(SecretString),
}

impl SecretId {
    pub fn from_string(id: impl Into<String>) -> Self {
        Self::FromString(SecretString::from(id.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        match self {
            Self::FromString(secret) => secret.expose_secret(),
        }
    }
}

/// Role-id and secret-id pair presented to the AppRole login endpoint
#[derive(Debug)]
pub struct AppRoleCredential {
    role_id: RoleId,
    secret_id: SecretId,
}

impl AppRoleCredential {
    /// Pair a role-id with a secret-id, rejecting empty values
    pub fn new(role_id: RoleId, secret_id: SecretId) -> Result<Self, VaultClientError> {
        if role_id.as_str().is_empty() {
            return Err(VaultClientError::InvalidCredential(
                "no role ID provided".into(),
            ));
        }
        if secret_id.expose().is_empty() {
            return Err(VaultClientError::InvalidCredential(
                "no secret ID provided".into(),
            ));
        }
        Ok(Self { role_id, secret_id })
    }

    pub fn role_id(&self) -> &RoleId {
        &self.role_id
    }

    pub fn secret_id(&self) -> &SecretId {
        &self.secret_id
    }
}

/// Session obtained from a successful AppRole login
#[derive(Debug)]
pub struct SessionCredential {
    /// Client token used to authorize subsequent requests
    pub token: SecretString,
    pub accessor: String,
    pub policies: Vec<String>,
    /// Lease duration of the token in seconds
    pub lease_duration: u64,
    pub renewable: bool,
}

impl SessionCredential {
    pub(crate) fn expose_token(&self) -> &str {
        self.token.expose_secret()
    }
}
