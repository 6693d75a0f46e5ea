//! Shared test fixtures

use cloud_provider_assets::asset::{Dependency, DependencyKind, Parents};
use cloud_provider_assets::installconfig::{
    AzureCredentials, ClusterId, InstallConfig, PlatformCreds, PlatformCredsCheck,
};

pub const CLIENT_ID: &str = "11111111-2222-3333-4444-555555555555";
pub const CLIENT_SECRET: &str = "p@ss: with \"quotes\" and\nnewline";

/// Install config for an Azure cluster
pub fn azure_install_config(extra: &str) -> InstallConfig {
    let yaml = format!(
        r#"
metadata:
  name: prod-east
baseDomain: example.com
platform:
  azure:
    region: eastus
    baseDomainResourceGroupName: dns
{extra}
"#
    );
    InstallConfig::from_yaml(&yaml).expect("fixture should parse")
}

pub fn azure_credentials() -> PlatformCreds {
    PlatformCreds::azure(AzureCredentials {
        subscription_id: "sub-0001".to_string(),
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        tenant_id: "tenant-0001".to_string(),
    })
}

/// Resolve `deps` the way a graph engine would: value dependencies from the
/// given inputs, ordering-only ones by running them first.
pub fn resolve(
    deps: &[Dependency],
    install_config: InstallConfig,
    creds: PlatformCreds,
    infra_id: &str,
) -> Parents {
    let mut parents = Parents::new()
        .with(install_config)
        .with(creds)
        .with(ClusterId::new(infra_id));

    for dep in deps {
        if dep.kind() == DependencyKind::OrderingOnly && dep.is::<PlatformCredsCheck>() {
            let install_config = parents.get::<InstallConfig>().expect("resolved above");
            let creds = parents.get::<PlatformCreds>().expect("resolved above");
            PlatformCredsCheck::check(install_config, creds).expect("credentials check");
            parents.insert(PlatformCredsCheck);
        }
    }
    parents
}
