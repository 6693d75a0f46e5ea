//! Cloud provider config asset for the cluster installer
//!
//! The installer builds a cluster from a graph of assets. This crate provides
//! the node that renders the in-cluster cloud provider configuration: the
//! `openshift-config/cloud-provider-config` config map and, for Azure Red Hat
//! OpenShift, the secret bootstrap manifests the cloud provider needs.
//!
//! # Modules
//!
//! - [`asset`] - Asset node contract shared with the graph engine
//! - [`installconfig`] - Resolved inputs: install config, credentials, cluster ID
//! - [`provider`] - Per-platform cloud provider config builders
//! - [`manifests`] - The cloud provider config asset and ARO manifests
//! - [`yaml`] - Key-sorted manifest serialization
//! - [`error`] - Error types

#![deny(missing_docs)]

pub mod asset;
pub mod error;
pub mod installconfig;
pub mod manifests;
pub mod provider;
pub mod yaml;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
