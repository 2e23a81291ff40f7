//! OS dependency descriptors and the resolver interface.
//!
//! The engine never talks to apt or pip itself; an [`OsPackageResolver`]
//! supplied by the embedding workspace maps an abstract dependency name to
//! the concrete `(manager, package)` pairs that satisfy it on the current
//! system.

use crate::Result;

/// A concrete package entry produced by resolving an abstract dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsPackage {
    /// Package manager identifier (e.g. "apt", "pip").
    pub manager: String,
    /// Concrete package name under that manager.
    pub name: String,
}

impl OsPackage {
    pub fn new(manager: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            manager: manager.into(),
            name: name.into(),
        }
    }
}

/// Maps abstract OS dependency names to concrete package entries.
///
/// Implementations may perform I/O. The engine calls [`resolve`] once per
/// field access and adds no retries, caching or timeouts; bounding a slow
/// resolver is the implementation's contract.
///
/// [`resolve`]: OsPackageResolver::resolve
pub trait OsPackageResolver {
    /// All `(manager, package)` entries that satisfy `name`.
    fn resolve(&self, name: &str) -> Result<Vec<OsPackage>>;
}

/// An OS dependency as seen by the query engine: an abstract name plus the
/// resolver that gives it meaning.
#[derive(Clone, Copy)]
pub struct OsDep<'a> {
    name: &'a str,
    resolver: &'a dyn OsPackageResolver,
}

impl<'a> OsDep<'a> {
    pub fn new(name: &'a str, resolver: &'a dyn OsPackageResolver) -> Self {
        Self { name, resolver }
    }

    /// The abstract dependency name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Ask the resolver for the concrete entries behind this dependency.
    pub fn resolve(&self) -> Result<Vec<OsPackage>> {
        self.resolver.resolve(self.name)
    }
}

impl std::fmt::Debug for OsDep<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsDep").field("name", &self.name).finish()
    }
}
