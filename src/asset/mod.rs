//! Asset node contract
//!
//! An asset is one node in the installer's dependency graph. The graph engine
//! (outside this crate) asks each asset for its [`Dependency`] list, resolves
//! those first, then calls [`Asset::generate`] at most once per run with the
//! resolved values in a [`Parents`] container. Writable assets additionally
//! expose the files they rendered and may offer to reload them from disk.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

use crate::{Error, Result};

/// A value produced by an upstream node and consumed through [`Parents`].
pub trait Resolved: Any + Send + Sync {
    /// Human friendly name of the node that produces this value
    const NAME: &'static str;
}

/// How a dependency is used by the asset declaring it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyKind {
    /// The resolved value is read during generation
    Value,
    /// The node only has to have run first; its value is never read
    OrderingOnly,
}

/// A typed reference to an upstream node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dependency {
    type_id: TypeId,
    name: &'static str,
    kind: DependencyKind,
}

impl Dependency {
    /// Declare a dependency whose resolved value is read
    pub fn value<T: Resolved>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
            kind: DependencyKind::Value,
        }
    }

    /// Declare a dependency that only orders this node after `T`
    pub fn ordering_only<T: Resolved>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
            kind: DependencyKind::OrderingOnly,
        }
    }

    /// Name of the upstream node
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// How the dependency is used
    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    /// Returns true if this dependency refers to `T`
    pub fn is<T: Resolved>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

/// Resolved values of an asset's dependencies, keyed by type
#[derive(Default)]
pub struct Parents {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Parents {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resolved value, replacing any previous value of the same type
    pub fn insert<T: Resolved>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Builder-style [`Parents::insert`]
    pub fn with<T: Resolved>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Borrow a resolved value.
    ///
    /// A missing value means the caller read a dependency it never declared or
    /// the engine skipped a node; both are bugs, not runtime conditions.
    pub fn get<T: Resolved>(&self) -> Result<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
            .ok_or(Error::MissingDependency(T::NAME))
    }
}

impl std::fmt::Debug for Parents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parents")
            .field("resolved", &self.values.len())
            .finish()
    }
}

/// A file rendered by an asset, relative to the install directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetFile {
    /// Path relative to the install directory
    pub filename: PathBuf,
    /// Raw file contents
    pub data: Vec<u8>,
}

impl AssetFile {
    /// Create a new file entry
    pub fn new(filename: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }
}

/// Read access to files persisted by a previous run
#[cfg_attr(test, automock)]
pub trait FileFetcher {
    /// Fetch a single file by its path relative to the install directory
    fn fetch_by_name(&self, name: &str) -> Result<Option<AssetFile>>;

    /// Fetch every file whose path matches a glob pattern
    fn fetch_by_pattern(&self, pattern: &str) -> Result<Vec<AssetFile>>;
}

/// A node in the asset graph
pub trait Asset: Send + Sync {
    /// Human friendly name for the asset
    fn name(&self) -> &str;

    /// Assets that must be resolved before [`Asset::generate`] runs
    fn dependencies(&self) -> Vec<Dependency>;

    /// Build the asset from its resolved dependencies.
    ///
    /// On error the asset must expose no output.
    fn generate(&mut self, parents: &Parents) -> Result<()>;
}

/// An asset that renders files to the install directory
pub trait WritableAsset: Asset {
    /// Files rendered by the last successful [`Asset::generate`]
    fn files(&self) -> &[AssetFile];

    /// Restore the asset from previously written files.
    ///
    /// Returns `Ok(false)` when nothing was found and the engine must call
    /// [`Asset::generate`].
    fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool>;
}
