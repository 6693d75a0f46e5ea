//! Cloud provider config builders
//!
//! Each supported platform implements [`CloudConfigBuilder`] to turn the
//! resolved installer inputs into the configuration blob the in-cluster cloud
//! provider reads. Builders are looked up by platform name through a
//! [`BuilderRegistry`]; a platform without an entry is not supported.
//!
//! # Supported Platforms
//!
//! - [`AzureConfigBuilder`] - Azure, including ARO managed clusters
//!
//! # Example
//!
//! ```text
//! let registry = BuilderRegistry::default();
//! let builder = registry.get(install_config.platform.name())?;
//! let config = builder.build(&BuildInput { install_config, creds, cluster_id })?;
//! ```

mod azure;

pub use azure::{AzureCloudProviderConfig, AzureConfigBuilder};

use std::collections::BTreeMap;

use crate::installconfig::{ClusterId, InstallConfig, PlatformCreds};
use crate::{Error, Result};

/// Resolved inputs handed to a builder for one generation
#[derive(Clone, Copy, Debug)]
pub struct BuildInput<'a> {
    /// The user's install config
    pub install_config: &'a InstallConfig,
    /// Credentials for the target platform
    pub creds: &'a PlatformCreds,
    /// Generated cluster identifiers
    pub cluster_id: &'a ClusterId,
}

/// Output of a builder
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloudConfig {
    /// Serialized configuration stored in the cloud provider config map
    pub data: String,
    /// The cluster runs in the platform's managed-service mode and needs the
    /// extra secret bootstrap manifests
    pub managed: bool,
}

/// Builds the cloud provider configuration for one platform
pub trait CloudConfigBuilder: Send + Sync {
    /// Platform name this builder handles
    fn platform(&self) -> &'static str;

    /// Build the configuration blob from the resolved inputs
    fn build(&self, input: &BuildInput<'_>) -> Result<CloudConfig>;
}

/// Builders keyed by platform name
pub struct BuilderRegistry {
    builders: BTreeMap<&'static str, Box<dyn CloudConfigBuilder>>,
}

impl BuilderRegistry {
    /// Create a registry with no builders
    pub fn empty() -> Self {
        Self {
            builders: BTreeMap::new(),
        }
    }

    /// Register a builder, replacing any builder for the same platform
    pub fn register(&mut self, builder: Box<dyn CloudConfigBuilder>) {
        self.builders.insert(builder.platform(), builder);
    }

    /// Builder-style [`BuilderRegistry::register`]
    pub fn with(mut self, builder: Box<dyn CloudConfigBuilder>) -> Self {
        self.register(builder);
        self
    }

    /// Look up the builder for a platform
    pub fn get(&self, platform: &str) -> Result<&dyn CloudConfigBuilder> {
        self.builders
            .get(platform)
            .map(|b| &**b)
            .ok_or_else(|| Error::invalid_platform(platform))
    }

    /// Names of all supported platforms, sorted
    pub fn platforms(&self) -> Vec<&'static str> {
        self.builders.keys().copied().collect()
    }
}

impl Default for BuilderRegistry {
    /// Registry with every builder shipped in this crate
    fn default() -> Self {
        Self::empty().with(Box::new(AzureConfigBuilder))
    }
}

impl std::fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}
