//! Error types for cloud provider asset generation

use thiserror::Error;

/// Main error type for asset generation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The install config targets a platform with no registered config builder
    #[error("invalid platform: {0}")]
    InvalidPlatform(String),

    /// Credential or session resolution failed
    #[error("could not get {platform} session: {message}")]
    Credential {
        /// Platform whose session could not be built
        platform: String,
        /// Description of what failed
        message: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being serialized (if known)
        kind: Option<String>,
    },

    /// The platform config blob could not be built
    #[error("could not create cloud provider config: {0}")]
    ProviderConfig(#[source] Box<Error>),

    /// A manifest owned by an asset could not be rendered
    #[error("failed to create {asset} manifest: {source}")]
    Manifest {
        /// Display name of the asset
        asset: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A dependency was read that the graph never resolved
    #[error("dependency {0} was not resolved before generation")]
    MissingDependency(&'static str),

    /// Reading inputs from disk failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid platform error for the given platform name
    pub fn invalid_platform(platform: impl Into<String>) -> Self {
        Self::InvalidPlatform(platform.into())
    }

    /// Create a credential error for the given platform
    pub fn credential(platform: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Credential {
            platform: platform.into(),
            message: msg.into(),
        }
    }

    /// Create a serialization error with resource kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Wrap a failure from a platform config builder
    pub fn provider_config(source: Error) -> Self {
        Self::ProviderConfig(Box::new(source))
    }

    /// Wrap a failure while rendering one of an asset's manifests
    pub fn manifest(asset: impl Into<String>, source: Error) -> Self {
        Self::Manifest {
            asset: asset.into(),
            source: Box::new(source),
        }
    }
}
