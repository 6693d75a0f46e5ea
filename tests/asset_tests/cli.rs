//! `render` command tests

use std::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_cloud-provider-assets");

const INSTALL_CONFIG: &str = r#"
metadata:
  name: cli-test
platform:
  azure:
    region: westus2
    aro: true
"#;

const SERVICE_PRINCIPAL: &str =
    r#"{"subscriptionId":"sub","clientId":"client","clientSecret":"secret","tenantId":"tenant"}"#;

#[test]
fn test_render_writes_manifests_under_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let install_config = dir.path().join("install-config.yaml");
    let principal = dir.path().join("osServicePrincipal.json");
    std::fs::write(&install_config, INSTALL_CONFIG).unwrap();
    std::fs::write(&principal, SERVICE_PRINCIPAL).unwrap();
    let out = dir.path().join("out");

    let status = Command::new(BIN)
        .arg("render")
        .arg("--install-config")
        .arg(&install_config)
        .arg("--azure-credentials")
        .arg(&principal)
        .arg("--infra-id")
        .arg("cli-test-x7k2p")
        .arg("--output-dir")
        .arg(&out)
        .env_remove("INSTALL_CONFIG")
        .status()
        .unwrap();
    assert!(status.success());

    let manifests = out.join("manifests");
    for name in [
        "cloud-provider-config.yaml",
        "aro-cloud-provider-secret-reader-role.yaml",
        "aro-cloud-provider-secret-reader-rolebinding.yaml",
        "aro-cloud-provider-secret.yaml",
    ] {
        assert!(manifests.join(name).is_file(), "{name} should be written");
    }

    let config = std::fs::read_to_string(manifests.join("cloud-provider-config.yaml")).unwrap();
    assert!(config.contains("cli-test-x7k2p-vnet"));
}

#[test]
fn test_render_fails_without_credentials_file() {
    let dir = tempfile::tempdir().unwrap();
    let install_config = dir.path().join("install-config.yaml");
    std::fs::write(&install_config, INSTALL_CONFIG).unwrap();

    let output = Command::new(BIN)
        .arg("render")
        .arg("--install-config")
        .arg(&install_config)
        .arg("--azure-credentials")
        .arg(dir.path().join("missing.json"))
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not get azure session"));
    assert!(!dir.path().join("manifests").exists());
}
