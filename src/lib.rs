//! Package selection queries for source workspaces.
//!
//! Short textual queries select source packages and OS dependencies out of
//! a workspace: `control`, `autobuild.srcdir~drivers/camera`,
//! `foo:vcs.type=git`. Matches are graded on [`MatchPriority`] so callers
//! can rank what a loose query selected.

pub mod error;
pub mod manifest;
pub mod osdeps;
pub mod query;

pub use error::{Error, Result};
pub use manifest::{Manifest, PackageDescriptor};
pub use osdeps::{OsDep, OsPackage, OsPackageResolver};
pub use query::{
    MatchPriority, OsDepField, OsDepLeaf, OsDepQuery, Query, SourceField, SourceLeaf,
    SourcePackageQuery,
};
