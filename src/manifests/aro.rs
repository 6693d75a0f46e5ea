//! ARO cloud provider secret bootstrap
//!
//! On ARO the Azure cloud provider reads its client credentials from a secret
//! in `kube-system` and merges them over `azure.json`. These manifests create
//! that secret plus the role and binding that let the cloud provider's service
//! account read it.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::api::rbac::v1::{PolicyRule, Role, RoleBinding, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use serde::{Deserialize, Serialize};

use crate::installconfig::{PlatformCreds, AZURE_PLATFORM_NAME};
use crate::yaml::{to_yaml11_record_bytes, to_yaml_bytes};
use crate::{Error, Result};

/// Namespace of the Azure cloud provider
pub const ARO_NAMESPACE: &str = "kube-system";
/// Role allowed to read the cloud provider secret
pub const ARO_ROLE_NAME: &str = "aro-cloud-provider-secret-reader";
/// Binding of the role to the cloud provider service account
pub const ARO_ROLE_BINDING_NAME: &str = "aro-cloud-provider-secret-read";
/// Secret and service account name of the Azure cloud provider
pub const ARO_SECRET_NAME: &str = "azure-cloud-provider";
/// Secret data key holding the nested credentials document
pub const ARO_SECRET_DATA_KEY: &str = "cloud-config";

const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

/// Credentials document the cloud provider merges over its config.
///
/// Stored YAML-encoded inside the secret's data. The field names are the
/// ones the cloud provider's config merge understands.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AroCloudConfig {
    /// Service principal application ID
    #[serde(rename = "aadClientId")]
    pub aad_client_id: String,
    /// Service principal password
    #[serde(rename = "aadClientSecret")]
    pub aad_client_secret: String,
}

/// Role granting `get` on the cloud provider secret
pub fn role(_creds: &PlatformCreds) -> Result<Vec<u8>> {
    let role = Role {
        metadata: ObjectMeta {
            name: Some(ARO_ROLE_NAME.to_string()),
            namespace: Some(ARO_NAMESPACE.to_string()),
            ..Default::default()
        },
        rules: Some(vec![PolicyRule {
            verbs: vec!["get".to_string()],
            api_groups: Some(vec![String::new()]),
            resources: Some(vec!["secrets".to_string()]),
            resource_names: Some(vec![ARO_SECRET_NAME.to_string()]),
            ..Default::default()
        }]),
    };
    to_yaml_bytes("Role", &role)
}

/// Binds the secret reader role to the cloud provider service account
pub fn role_binding(_creds: &PlatformCreds) -> Result<Vec<u8>> {
    let binding = RoleBinding {
        metadata: ObjectMeta {
            name: Some(ARO_ROLE_BINDING_NAME.to_string()),
            namespace: Some(ARO_NAMESPACE.to_string()),
            ..Default::default()
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_string(),
            name: ARO_SECRET_NAME.to_string(),
            namespace: Some(ARO_NAMESPACE.to_string()),
            ..Default::default()
        }]),
        role_ref: RoleRef {
            api_group: RBAC_API_GROUP.to_string(),
            kind: "Role".to_string(),
            name: ARO_ROLE_NAME.to_string(),
        },
    };
    to_yaml_bytes("RoleBinding", &binding)
}

/// Secret carrying the service principal for the cloud provider.
///
/// The credentials are serialized on their own first and the resulting bytes
/// become the value of [`ARO_SECRET_DATA_KEY`]; the consumer expects that
/// nesting and must not be given flat keys. It parses the nested document as
/// YAML 1.1, so boolean-looking values are quoted.
pub fn secret(creds: &PlatformCreds) -> Result<Vec<u8>> {
    let azure = creds.azure.as_ref().ok_or_else(|| {
        Error::credential(AZURE_PLATFORM_NAME, "no Azure credentials were resolved")
    })?;

    let cloud_config = to_yaml11_record_bytes(
        "AroCloudConfig",
        &AroCloudConfig {
            aad_client_id: azure.client_id.clone(),
            aad_client_secret: azure.client_secret.clone(),
        },
    )?;

    let secret = Secret {
        metadata: ObjectMeta {
            name: Some(ARO_SECRET_NAME.to_string()),
            namespace: Some(ARO_NAMESPACE.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            ARO_SECRET_DATA_KEY.to_string(),
            ByteString(cloud_config),
        )])),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    };
    to_yaml_bytes("Secret", &secret)
}
