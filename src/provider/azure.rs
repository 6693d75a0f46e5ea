//! Azure cloud provider configuration
//!
//! Renders the `azure.json` document consumed by the Azure cloud provider
//! running in the cluster. Network resource names honor the user's overrides
//! from the install config and otherwise follow the installer's naming
//! convention around the infra ID.

use serde::Serialize;
use tracing::debug;

use super::{BuildInput, CloudConfig, CloudConfigBuilder};
use crate::installconfig::{AzureCloudEnvironment, AZURE_PLATFORM_NAME};
use crate::{Error, Result};

/// Load balancer SKU used by every installer-provisioned cluster
const LOAD_BALANCER_SKU: &str = "standard";

/// Seconds between cloud provider API retries
const CLOUD_PROVIDER_BACKOFF_DURATION: u32 = 6;

/// Inputs of the Azure cloud provider configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AzureCloudProviderConfig {
    /// Azure cloud environment
    pub cloud_name: AzureCloudEnvironment,
    /// Resource group holding the cluster's resources
    pub resource_group_name: String,
    /// Azure region
    pub group_location: String,
    /// Prefix of installer-created resources (the infra ID)
    pub resource_prefix: String,
    /// Subscription the cluster lives in
    pub subscription_id: String,
    /// Azure AD tenant
    pub tenant_id: String,
    /// Resource group of the virtual network
    pub network_resource_group_name: String,
    /// Network security group protecting the nodes
    pub network_security_group_name: String,
    /// Virtual network of the nodes
    pub virtual_network_name: String,
    /// Subnet of the compute nodes
    pub subnet_name: String,
    /// ARO managed cluster
    pub aro: bool,
}

/// On-disk shape of `azure.json`; field order is the legacy consumer's
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AzureJson<'a> {
    cloud: &'a str,
    tenant_id: &'a str,
    aad_client_id: &'a str,
    aad_client_secret: &'a str,
    aad_client_cert_path: &'a str,
    aad_client_cert_password: &'a str,
    use_managed_identity_extension: bool,
    #[serde(rename = "userAssignedIdentityID")]
    user_assigned_identity_id: &'a str,
    subscription_id: &'a str,
    resource_group: &'a str,
    location: &'a str,
    vnet_name: &'a str,
    vnet_resource_group: &'a str,
    subnet_name: &'a str,
    security_group_name: &'a str,
    route_table_name: String,
    primary_availability_set_name: &'a str,
    vm_type: &'a str,
    primary_scale_set_name: &'a str,
    cloud_provider_backoff: bool,
    cloud_provider_backoff_retries: u32,
    cloud_provider_backoff_duration: u32,
    cloud_provider_rate_limit: bool,
    cloud_provider_rate_limit_bucket: u32,
    use_instance_metadata: bool,
    load_balancer_sku: &'a str,
    #[serde(rename = "excludeMasterFromStandardLB")]
    exclude_master_from_standard_lb: bool,
    maximum_load_balancer_rule_count: u32,
}

impl AzureCloudProviderConfig {
    /// Serialize to the tab-indented `azure.json` document.
    ///
    /// Client credentials are left empty: the cloud provider either uses the
    /// node's managed identity or, for ARO, merges them from a secret.
    pub fn to_json(&self) -> Result<String> {
        let config = AzureJson {
            cloud: self.cloud_name.name(),
            tenant_id: &self.tenant_id,
            aad_client_id: "",
            aad_client_secret: "",
            aad_client_cert_path: "",
            aad_client_cert_password: "",
            use_managed_identity_extension: !self.aro,
            user_assigned_identity_id: "",
            subscription_id: &self.subscription_id,
            resource_group: &self.resource_group_name,
            location: &self.group_location,
            vnet_name: &self.virtual_network_name,
            vnet_resource_group: &self.network_resource_group_name,
            subnet_name: &self.subnet_name,
            security_group_name: &self.network_security_group_name,
            route_table_name: format!("{}-node-routetable", self.resource_prefix),
            primary_availability_set_name: "",
            vm_type: "",
            primary_scale_set_name: "",
            cloud_provider_backoff: true,
            cloud_provider_backoff_retries: 0,
            cloud_provider_backoff_duration: CLOUD_PROVIDER_BACKOFF_DURATION,
            cloud_provider_rate_limit: false,
            cloud_provider_rate_limit_bucket: 0,
            use_instance_metadata: true,
            load_balancer_sku: LOAD_BALANCER_SKU,
            exclude_master_from_standard_lb: false,
            maximum_load_balancer_rule_count: 0,
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        config
            .serialize(&mut serializer)
            .map_err(|e| Error::serialization_for_kind("azure.json", e.to_string()))?;
        buf.push(b'\n');

        String::from_utf8(buf)
            .map_err(|e| Error::serialization_for_kind("azure.json", e.to_string()))
    }
}

/// Network security group created for the cluster
pub fn network_security_group_name(infra_id: &str) -> String {
    format!("{infra_id}-nsg")
}

/// Virtual network created when the user brings none
pub fn virtual_network_name(infra_id: &str) -> String {
    format!("{infra_id}-vnet")
}

/// Compute subnet created when the user brings none
pub fn compute_subnet_name(infra_id: &str) -> String {
    format!("{infra_id}-worker-subnet")
}

/// Use the override when set, the derived name otherwise
fn override_or(value: &str, derived: impl FnOnce() -> String) -> String {
    if value.is_empty() {
        derived()
    } else {
        value.to_string()
    }
}

/// [`CloudConfigBuilder`] for Azure
#[derive(Clone, Copy, Debug, Default)]
pub struct AzureConfigBuilder;

impl CloudConfigBuilder for AzureConfigBuilder {
    fn platform(&self) -> &'static str {
        AZURE_PLATFORM_NAME
    }

    fn build(&self, input: &BuildInput<'_>) -> Result<CloudConfig> {
        let azure = input
            .install_config
            .azure()
            .ok_or_else(|| Error::invalid_platform(input.install_config.platform.name()))?;
        let session = input.creds.azure_session()?;
        let infra_id = input.cluster_id.infra_id.as_str();

        let resource_group = azure.cluster_resource_group_name(infra_id);
        let config = AzureCloudProviderConfig {
            cloud_name: azure.cloud_name,
            resource_group_name: resource_group.clone(),
            group_location: azure.region.clone(),
            resource_prefix: infra_id.to_string(),
            subscription_id: session.credentials.subscription_id.clone(),
            tenant_id: session.credentials.tenant_id.clone(),
            network_resource_group_name: override_or(&azure.network_resource_group_name, || {
                resource_group
            }),
            network_security_group_name: network_security_group_name(infra_id),
            virtual_network_name: override_or(&azure.virtual_network, || {
                virtual_network_name(infra_id)
            }),
            subnet_name: override_or(&azure.compute_subnet, || compute_subnet_name(infra_id)),
            aro: azure.aro,
        };

        debug!(
            infra_id,
            vnet = %config.virtual_network_name,
            subnet = %config.subnet_name,
            network_resource_group = %config.network_resource_group_name,
            existing_vnet = azure.uses_existing_vnet(),
            aro = config.aro,
            "Resolved Azure cloud provider config"
        );

        let data = config.to_json().map_err(Error::provider_config)?;
        Ok(CloudConfig {
            data,
            managed: azure.aro,
        })
    }
}
