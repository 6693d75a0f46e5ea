//! Platform credentials
//!
//! Credentials are gathered upstream (environment, service principal file or
//! an interactive prompt). This module only holds them and turns them into a
//! session; it never talks to a cloud endpoint.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::asset::Resolved;
use crate::installconfig::AZURE_PLATFORM_NAME;
use crate::{Error, Result};

/// Default location of the Azure service principal file, relative to `$HOME`
pub const AZURE_SERVICE_PRINCIPAL_PATH: &str = ".azure/osServicePrincipal.json";

/// Credentials resolved for the target platform
#[derive(Clone, Debug, Default)]
pub struct PlatformCreds {
    /// Azure service principal, when installing on Azure
    pub azure: Option<AzureCredentials>,
}

impl PlatformCreds {
    /// Credentials holding only an Azure service principal
    pub fn azure(credentials: AzureCredentials) -> Self {
        Self {
            azure: Some(credentials),
        }
    }

    /// Build an Azure session from the resolved credentials
    pub fn azure_session(&self) -> Result<AzureSession> {
        let credentials = self.azure.as_ref().ok_or_else(|| {
            Error::credential(AZURE_PLATFORM_NAME, "no Azure credentials were resolved")
        })?;
        AzureSession::new(credentials.clone())
    }
}

impl Resolved for PlatformCreds {
    const NAME: &'static str = "Platform Credentials";
}

/// Azure service principal
#[derive(Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AzureCredentials {
    /// Subscription the cluster is billed to
    #[serde(default)]
    pub subscription_id: String,
    /// Service principal application ID
    #[serde(default)]
    pub client_id: String,
    /// Service principal password
    #[serde(default)]
    pub client_secret: String,
    /// Azure AD tenant
    #[serde(default)]
    pub tenant_id: String,
}

impl AzureCredentials {
    /// Load credentials from environment variables
    pub fn from_env() -> Option<Self> {
        Some(Self {
            subscription_id: std::env::var("AZURE_SUBSCRIPTION_ID").ok()?,
            client_id: std::env::var("AZURE_CLIENT_ID").ok()?,
            client_secret: std::env::var("AZURE_CLIENT_SECRET").ok()?,
            tenant_id: std::env::var("AZURE_TENANT_ID").ok()?,
        })
    }

    /// Parse a service principal JSON document
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            Error::credential(AZURE_PLATFORM_NAME, format!("invalid service principal: {e}"))
        })
    }

    /// Read a service principal file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::credential(
                AZURE_PLATFORM_NAME,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_json(&content)
    }

    /// Default service principal file under the user's home directory
    pub fn default_file() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(AZURE_SERVICE_PRINCIPAL_PATH))
    }
}

impl std::fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Don't expose the client secret in debug output
        f.debug_struct("AzureCredentials")
            .field("subscription_id", &self.subscription_id)
            .field("client_id", &self.client_id)
            .field("tenant_id", &self.tenant_id)
            .finish_non_exhaustive()
    }
}

/// An Azure session built from complete credentials
#[derive(Clone, Debug)]
pub struct AzureSession {
    /// Credentials the session was built from
    pub credentials: AzureCredentials,
}

impl AzureSession {
    /// Build a session, rejecting incomplete credentials
    pub fn new(credentials: AzureCredentials) -> Result<Self> {
        let missing: Vec<&str> = [
            ("subscriptionId", &credentials.subscription_id),
            ("clientId", &credentials.client_id),
            ("clientSecret", &credentials.client_secret),
            ("tenantId", &credentials.tenant_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(Error::credential(
                AZURE_PLATFORM_NAME,
                format!("missing {}", missing.join(", ")),
            ));
        }

        Ok(Self { credentials })
    }
}
