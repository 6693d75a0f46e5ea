//! Platform credentials check

use tracing::debug;

use crate::asset::{Asset, Dependency, Parents, Resolved};
use crate::installconfig::{InstallConfig, Platform, PlatformCreds};
use crate::Result;

/// Verifies that usable credentials exist for the target platform.
///
/// Cloud-facing assets depend on this node purely for ordering: once it has
/// run, any credential problem has already been reported to the operator.
#[derive(Clone, Debug, Default)]
pub struct PlatformCredsCheck;

impl PlatformCredsCheck {
    /// Check the credentials required by the install config's platform
    pub fn check(install_config: &InstallConfig, creds: &PlatformCreds) -> Result<()> {
        match &install_config.platform {
            Platform::Azure(_) => {
                creds.azure_session()?;
            }
            other => {
                debug!(platform = %other, "No credentials check for platform");
            }
        }
        Ok(())
    }
}

impl Resolved for PlatformCredsCheck {
    const NAME: &'static str = "Platform Credentials Check";
}

impl Asset for PlatformCredsCheck {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::value::<PlatformCreds>(),
            Dependency::value::<InstallConfig>(),
        ]
    }

    fn generate(&mut self, parents: &Parents) -> Result<()> {
        let creds = parents.get::<PlatformCreds>()?;
        let install_config = parents.get::<InstallConfig>()?;
        Self::check(install_config, creds)
    }
}
