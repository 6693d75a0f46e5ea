//! Resolved installer inputs
//!
//! These are the values produced by upstream nodes of the asset graph: the
//! user's install config, the platform credentials, the generated cluster
//! identifier and the credentials check that gates everything cloud-facing.

mod azure;
mod check;
mod cluster_id;
mod credentials;

pub use azure::{AzureCloudEnvironment, AzurePlatform};
pub use check::PlatformCredsCheck;
pub use cluster_id::ClusterId;
pub use credentials::{AzureCredentials, AzureSession, PlatformCreds};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::asset::Resolved;
use crate::{Error, Result};

/// Platform name for Microsoft Azure
pub const AZURE_PLATFORM_NAME: &str = "azure";
/// Platform name for Amazon Web Services
pub const AWS_PLATFORM_NAME: &str = "aws";
/// Platform name for Google Cloud Platform
pub const GCP_PLATFORM_NAME: &str = "gcp";
/// Platform name for OpenStack
pub const OPENSTACK_PLATFORM_NAME: &str = "openstack";
/// Platform name for user provisioned infrastructure without a cloud
pub const NONE_PLATFORM_NAME: &str = "none";

/// The user's install config.
///
/// Validation happens upstream; this type only carries the parsed document.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    /// Object metadata; the name is the cluster name
    pub metadata: InstallConfigMetadata,
    /// Base DNS domain of the cluster
    #[serde(default)]
    pub base_domain: String,
    /// Target platform and its settings
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub platform: Platform,
}

/// Metadata block of the install config
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct InstallConfigMetadata {
    /// Cluster name
    pub name: String,
}

impl InstallConfig {
    /// Parse an install config from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::serialization_for_kind("InstallConfig", e.to_string()))
    }

    /// Read and parse an install config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Cluster name from the metadata
    pub fn cluster_name(&self) -> &str {
        &self.metadata.name
    }

    /// Azure settings, if the install targets Azure
    pub fn azure(&self) -> Option<&AzurePlatform> {
        match &self.platform {
            Platform::Azure(azure) => Some(azure),
            _ => None,
        }
    }
}

impl Resolved for InstallConfig {
    const NAME: &'static str = "Install Config";
}

/// Target platform, keyed by platform name in the install config
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Platform {
    /// Microsoft Azure
    Azure(AzurePlatform),
    /// Amazon Web Services
    Aws(RegionalPlatform),
    /// Google Cloud Platform
    Gcp(GcpPlatform),
    /// OpenStack
    #[serde(rename = "openstack")]
    OpenStack(OpenStackPlatform),
    /// No cloud integration
    None(NonePlatform),
}

impl Platform {
    /// Platform name as used in the install config
    pub fn name(&self) -> &'static str {
        match self {
            Self::Azure(_) => AZURE_PLATFORM_NAME,
            Self::Aws(_) => AWS_PLATFORM_NAME,
            Self::Gcp(_) => GCP_PLATFORM_NAME,
            Self::OpenStack(_) => OPENSTACK_PLATFORM_NAME,
            Self::None(_) => NONE_PLATFORM_NAME,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for platforms that only need a region here
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegionalPlatform {
    /// Region the cluster is deployed to
    pub region: String,
}

/// Google Cloud settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GcpPlatform {
    /// Project the cluster is deployed to
    #[serde(rename = "projectID")]
    pub project_id: String,
    /// Region the cluster is deployed to
    pub region: String,
}

/// OpenStack settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenStackPlatform {
    /// Name of the cloud entry in clouds.yaml
    pub cloud: String,
}

/// Settings for the `none` platform
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct NonePlatform {}
