//! Azure install config settings

use serde::{Deserialize, Serialize};

/// Azure settings from the install config.
///
/// Empty strings mean "not set"; the installer derives a default from the
/// infra ID in that case.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AzurePlatform {
    /// Azure region (location) of the cluster
    pub region: String,

    /// Azure cloud environment
    #[serde(default)]
    pub cloud_name: AzureCloudEnvironment,

    /// Resource group holding the base domain's DNS zone
    #[serde(default)]
    pub base_domain_resource_group_name: String,

    /// Resource group of an existing virtual network
    #[serde(default)]
    pub network_resource_group_name: String,

    /// Name of an existing virtual network
    #[serde(default)]
    pub virtual_network: String,

    /// Existing subnet for control plane machines
    #[serde(default)]
    pub control_plane_subnet: String,

    /// Existing subnet for compute machines
    #[serde(default)]
    pub compute_subnet: String,

    /// Install as an Azure Red Hat OpenShift managed cluster
    #[serde(default)]
    pub aro: bool,
}

impl AzurePlatform {
    /// Resource group created for the cluster's own resources
    pub fn cluster_resource_group_name(&self, infra_id: &str) -> String {
        format!("{infra_id}-rg")
    }

    /// Returns true if the cluster joins a user-provided virtual network
    pub fn uses_existing_vnet(&self) -> bool {
        !self.virtual_network.is_empty()
    }
}

/// Azure cloud environments
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum AzureCloudEnvironment {
    /// Azure public cloud
    #[default]
    #[serde(rename = "AzurePublicCloud")]
    PublicCloud,
    /// Azure US government cloud
    #[serde(rename = "AzureUSGovernmentCloud")]
    UsGovernmentCloud,
    /// Azure China cloud
    #[serde(rename = "AzureChinaCloud")]
    ChinaCloud,
    /// Azure German cloud
    #[serde(rename = "AzureGermanCloud")]
    GermanCloud,
    /// Azure Stack Hub
    #[serde(rename = "AzureStackCloud")]
    StackCloud,
}

impl AzureCloudEnvironment {
    /// Environment name as understood by the in-cluster cloud provider
    pub fn name(&self) -> &'static str {
        match self {
            Self::PublicCloud => "AzurePublicCloud",
            Self::UsGovernmentCloud => "AzureUSGovernmentCloud",
            Self::ChinaCloud => "AzureChinaCloud",
            Self::GermanCloud => "AzureGermanCloud",
            Self::StackCloud => "AzureStackCloud",
        }
    }
}

impl std::fmt::Display for AzureCloudEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
