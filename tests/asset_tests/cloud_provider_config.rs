//! Cloud provider config generation stories
//!
//! Each test is a scenario an installer run hits: a plain Azure cluster, an
//! ARO cluster, a user bringing their own network, and a platform nobody
//! builds a cloud config for.

use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use serde_json::Value;

use cloud_provider_assets::asset::{Asset, WritableAsset};
use cloud_provider_assets::installconfig::{InstallConfig, PlatformCreds};
use cloud_provider_assets::manifests::aro::AroCloudConfig;
use cloud_provider_assets::manifests::CloudProviderConfig;
use cloud_provider_assets::Error;

use super::fixtures::{azure_credentials, azure_install_config, resolve, CLIENT_ID, CLIENT_SECRET};

fn generate(
    install_config: InstallConfig,
    creds: PlatformCreds,
) -> (CloudProviderConfig, Result<(), Error>) {
    let mut asset = CloudProviderConfig::new();
    let parents = resolve(&asset.dependencies(), install_config, creds, "abc123");
    let result = asset.generate(&parents);
    (asset, result)
}

fn cloud_config(asset: &CloudProviderConfig) -> Value {
    let config_map: ConfigMap =
        serde_yaml::from_slice(&asset.files()[0].data).expect("config map should parse");
    let data = config_map.data.expect("config map should have data");
    serde_json::from_str(&data["config"]).expect("config should be JSON")
}

/// Story: a standard Azure install gets exactly one manifest
#[test]
fn story_azure_cluster_gets_single_config_map() {
    let (asset, result) = generate(azure_install_config(""), azure_credentials());
    result.expect("generation should succeed");

    assert_eq!(asset.files().len(), 1);
    let value: serde_yaml::Value = serde_yaml::from_slice(&asset.files()[0].data).unwrap();
    assert_eq!(value["kind"].as_str(), Some("ConfigMap"));
    assert_eq!(value["apiVersion"].as_str(), Some("v1"));

    let config = cloud_config(&asset);
    assert_eq!(config["vnetName"], "abc123-vnet");
    assert_eq!(config["subnetName"], "abc123-worker-subnet");
    assert_eq!(config["securityGroupName"], "abc123-nsg");
    assert_eq!(config["location"], "eastus");
}

/// Story: an ARO install adds the secret bootstrap manifests after the config map
#[test]
fn story_aro_cluster_gets_secret_bootstrap_manifests() {
    let (asset, result) = generate(azure_install_config("    aro: true"), azure_credentials());
    result.expect("generation should succeed");

    let names: Vec<String> = asset
        .files()
        .iter()
        .map(|f| f.filename.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "cloud-provider-config.yaml",
            "aro-cloud-provider-secret-reader-role.yaml",
            "aro-cloud-provider-secret-reader-rolebinding.yaml",
            "aro-cloud-provider-secret.yaml",
        ]
    );
    assert_eq!(cloud_config(&asset)["useManagedIdentityExtension"], false);
}

/// Story: the cloud provider reads the same service principal the installer used
#[test]
fn story_aro_secret_carries_installer_service_principal() {
    let (asset, result) = generate(azure_install_config("    aro: true"), azure_credentials());
    result.expect("generation should succeed");

    let secret: Secret = serde_yaml::from_slice(&asset.files()[3].data).unwrap();
    assert_eq!(secret.metadata.namespace.as_deref(), Some("kube-system"));
    let data = secret.data.expect("secret should have data");
    assert_eq!(data.keys().collect::<Vec<_>>(), vec!["cloud-config"]);

    let nested: AroCloudConfig = serde_yaml::from_slice(&data["cloud-config"].0).unwrap();
    assert_eq!(nested.aad_client_id, CLIENT_ID);
    assert_eq!(nested.aad_client_secret, CLIENT_SECRET);
}

/// Story: a user installing into an existing network keeps their names
#[test]
fn story_existing_network_names_are_preserved() {
    let extra = concat!(
        "    networkResourceGroupName: shared-net\n",
        "    virtualNetwork: corp-vnet\n",
        "    computeSubnet: corp-workers",
    );
    let (asset, result) = generate(azure_install_config(extra), azure_credentials());
    result.expect("generation should succeed");

    let config = cloud_config(&asset);
    assert_eq!(config["vnetResourceGroup"], "shared-net");
    assert_eq!(config["vnetName"], "corp-vnet");
    assert_eq!(config["subnetName"], "corp-workers");
    assert_eq!(config["resourceGroup"], "abc123-rg");
}

/// Story: platforms without a cloud config builder fail and write nothing
#[test]
fn story_unsupported_platform_writes_nothing() {
    let install_config = InstallConfig::from_yaml(
        "metadata:\n  name: c\nplatform:\n  gcp:\n    projectID: p\n    region: us-east1\n",
    )
    .unwrap();
    let (asset, result) = generate(install_config, PlatformCreds::default());

    let err = result.expect_err("gcp has no builder");
    assert_eq!(err.to_string(), "invalid platform: gcp");
    assert!(asset.files().is_empty());
}

/// Story: rerunning the installer with the same inputs yields identical bytes
#[test]
fn story_output_is_byte_stable_across_runs() {
    let (first, r1) = generate(azure_install_config("    aro: true"), azure_credentials());
    let (second, r2) = generate(azure_install_config("    aro: true"), azure_credentials());
    r1.unwrap();
    r2.unwrap();
    assert_eq!(first.files(), second.files());
}
