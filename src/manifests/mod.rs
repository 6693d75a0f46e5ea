//! Cloud provider config manifests
//!
//! [`CloudProviderConfig`] is the asset that writes the
//! `openshift-config/cloud-provider-config` config map holding the platform's
//! cloud provider configuration. ARO clusters additionally get the secret
//! bootstrap manifests from [`aro`].
//!
//! # Output
//!
//! | # | File | Present |
//! |---|------|---------|
//! | 1 | `cloud-provider-config.yaml` | always |
//! | 2 | `aro-cloud-provider-secret-reader-role.yaml` | ARO only |
//! | 3 | `aro-cloud-provider-secret-reader-rolebinding.yaml` | ARO only |
//! | 4 | `aro-cloud-provider-secret.yaml` | ARO only |

pub mod aro;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::{debug, info};

use crate::asset::{Asset, AssetFile, Dependency, FileFetcher, Parents, WritableAsset};
use crate::installconfig::{ClusterId, InstallConfig, PlatformCreds, PlatformCredsCheck};
use crate::provider::{BuildInput, BuilderRegistry};
use crate::yaml::to_yaml_bytes;
use crate::{Error, Result};

/// Directory manifests are written to, relative to the install directory
pub const MANIFEST_DIR: &str = "manifests";

/// Namespace of the cloud provider config map
pub const CLOUD_PROVIDER_CONFIG_NAMESPACE: &str = "openshift-config";
/// Name of the cloud provider config map
pub const CLOUD_PROVIDER_CONFIG_NAME: &str = "cloud-provider-config";
/// The only data key of the cloud provider config map
pub const CLOUD_PROVIDER_CONFIG_DATA_KEY: &str = "config";

/// Output paths of the cloud provider config manifests
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestPaths {
    /// Cloud provider config map
    pub cloud_provider_config: PathBuf,
    /// ARO secret reader role
    pub aro_role: PathBuf,
    /// ARO secret reader role binding
    pub aro_role_binding: PathBuf,
    /// ARO cloud provider secret
    pub aro_secret: PathBuf,
}

impl ManifestPaths {
    /// Paths under the given manifest directory
    pub fn new(manifest_dir: impl AsRef<Path>) -> Self {
        let dir = manifest_dir.as_ref();
        Self {
            cloud_provider_config: dir.join("cloud-provider-config.yaml"),
            aro_role: dir.join("aro-cloud-provider-secret-reader-role.yaml"),
            aro_role_binding: dir.join("aro-cloud-provider-secret-reader-rolebinding.yaml"),
            aro_secret: dir.join("aro-cloud-provider-secret.yaml"),
        }
    }
}

impl Default for ManifestPaths {
    fn default() -> Self {
        Self::new(MANIFEST_DIR)
    }
}

/// Output of a successful generation, set all at once
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedManifests {
    /// The cloud provider config map
    pub config_map: ConfigMap,
    /// Rendered files, config map first
    pub files: Vec<AssetFile>,
}

/// Renders the cloud provider config manifests
#[derive(Debug)]
pub struct CloudProviderConfig {
    registry: BuilderRegistry,
    paths: ManifestPaths,
    generated: Option<GeneratedManifests>,
}

/// Renders one ARO manifest from the platform credentials
type ManifestFn = fn(&PlatformCreds) -> Result<Vec<u8>>;

impl CloudProviderConfig {
    /// Create the asset with every built-in platform and the default paths
    pub fn new() -> Self {
        Self::with_registry(BuilderRegistry::default(), ManifestPaths::default())
    }

    /// Create the asset with a custom builder registry and output paths
    pub fn with_registry(registry: BuilderRegistry, paths: ManifestPaths) -> Self {
        Self {
            registry,
            paths,
            generated: None,
        }
    }

    /// The config map from the last successful generation
    pub fn config_map(&self) -> Option<&ConfigMap> {
        self.generated.as_ref().map(|g| &g.config_map)
    }

    fn render(
        &self,
        creds: &PlatformCreds,
        install_config: &InstallConfig,
        cluster_id: &ClusterId,
    ) -> Result<GeneratedManifests> {
        let mut config_map = ConfigMap {
            metadata: ObjectMeta {
                namespace: Some(CLOUD_PROVIDER_CONFIG_NAMESPACE.to_string()),
                name: Some(CLOUD_PROVIDER_CONFIG_NAME.to_string()),
                ..Default::default()
            },
            data: Some(BTreeMap::new()),
            ..Default::default()
        };

        let platform = install_config.platform.name();
        let builder = self.registry.get(platform)?;
        let cloud_config = builder.build(&BuildInput {
            install_config,
            creds,
            cluster_id,
        })?;
        config_map
            .data
            .get_or_insert_with(BTreeMap::new)
            .insert(CLOUD_PROVIDER_CONFIG_DATA_KEY.to_string(), cloud_config.data);

        let data = to_yaml_bytes("ConfigMap", &config_map)
            .map_err(|e| Error::manifest(self.name(), e))?;
        let mut files = vec![AssetFile::new(&self.paths.cloud_provider_config, data)];

        if cloud_config.managed {
            let aro_manifests: [(&Path, ManifestFn); 3] = [
                (self.paths.aro_role.as_path(), aro::role),
                (self.paths.aro_role_binding.as_path(), aro::role_binding),
                (self.paths.aro_secret.as_path(), aro::secret),
            ];
            for (filename, render) in aro_manifests {
                let data = render(creds).map_err(|e| Error::manifest(self.name(), e))?;
                debug!(file = %filename.display(), "Rendered ARO manifest");
                files.push(AssetFile::new(filename, data));
            }
        }

        Ok(GeneratedManifests { config_map, files })
    }
}

impl Default for CloudProviderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Asset for CloudProviderConfig {
    fn name(&self) -> &str {
        "Cloud Provider Config"
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::value::<PlatformCreds>(),
            Dependency::value::<InstallConfig>(),
            Dependency::value::<ClusterId>(),
            // Only has to run first so credentials are checked (or prompted
            // for) before anything cloud-facing renders
            Dependency::ordering_only::<PlatformCredsCheck>(),
        ]
    }

    fn generate(&mut self, parents: &Parents) -> Result<()> {
        self.generated = None;

        let creds = parents.get::<PlatformCreds>()?;
        let install_config = parents.get::<InstallConfig>()?;
        let cluster_id = parents.get::<ClusterId>()?;

        let generated = self.render(creds, install_config, cluster_id)?;
        info!(
            asset = self.name(),
            platform = %install_config.platform,
            infra_id = %cluster_id.infra_id,
            files = generated.files.len(),
            "Generated cloud provider config"
        );
        self.generated = Some(generated);
        Ok(())
    }
}

impl WritableAsset for CloudProviderConfig {
    fn files(&self) -> &[AssetFile] {
        self.generated
            .as_ref()
            .map(|g| g.files.as_slice())
            .unwrap_or(&[])
    }

    /// Never reloads: the config depends on live credentials, so it is
    /// always regenerated.
    fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool> {
        Ok(false)
    }
}
