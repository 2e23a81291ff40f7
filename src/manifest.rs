//! Workspace manifest: the descriptor records queries match against.
//!
//! The manifest lists every source package the workspace knows about.
//! Only loading from an explicit path is provided; where the manifest
//! lives and how it is discovered is the embedding tool's business.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::query::{MatchPriority, SourcePackageQuery};
use crate::{Error, Result};

/// A workspace manifest: the set of source package descriptors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// All source packages defined in the workspace.
    #[serde(default)]
    pub packages: Vec<PackageDescriptor>,
}

impl Manifest {
    /// Load a manifest from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Manifest(format!("failed to parse manifest: {}", e)))
    }

    /// Evaluate `query` against every package, strongest matches first.
    ///
    /// Packages with equal priority keep their manifest order;
    /// non-matching packages are dropped.
    pub fn select<'a>(
        &'a self,
        query: &SourcePackageQuery,
    ) -> Vec<(&'a PackageDescriptor, MatchPriority)> {
        let mut matches: Vec<_> = self
            .packages
            .iter()
            .filter_map(|pkg| query.match_priority(pkg).map(|priority| (pkg, priority)))
            .collect();
        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches
    }
}

/// A source package record, exposed to queries through dotted field paths
/// (`autobuild.name`, `vcs.url`, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Build-level information.
    pub autobuild: Autobuild,
    /// Version control origin.
    #[serde(default)]
    pub vcs: Vcs,
    /// The package set that defines this package.
    #[serde(default)]
    pub package_set: PackageSet,
}

/// Build-level package information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autobuild {
    /// Package name.
    pub name: String,
    /// Checkout directory, relative to the workspace root.
    pub srcdir: String,
    /// Build class.
    #[serde(default)]
    pub class: BuildClass,
}

/// The build class a package is built with (cmake, autotools, ruby, …).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildClass {
    pub name: String,
}

/// Version control origin of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vcs {
    /// VCS type (git, svn, archive, …).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Repository URL.
    #[serde(default)]
    pub url: String,
}

/// The package set a package was defined in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSet {
    pub name: String,
}

impl PackageDescriptor {
    /// Create a descriptor with the two mandatory fields.
    pub fn new(name: impl Into<String>, srcdir: impl Into<String>) -> Self {
        Self {
            autobuild: Autobuild {
                name: name.into(),
                srcdir: srcdir.into(),
                class: BuildClass::default(),
            },
            vcs: Vcs::default(),
            package_set: PackageSet::default(),
        }
    }

    /// Set the build class.
    pub fn with_class(mut self, name: impl Into<String>) -> Self {
        self.autobuild.class.name = name.into();
        self
    }

    /// Set the VCS origin.
    pub fn with_vcs(mut self, kind: impl Into<String>, url: impl Into<String>) -> Self {
        self.vcs = Vcs {
            kind: kind.into(),
            url: url.into(),
        };
        self
    }

    /// Set the defining package set.
    pub fn with_package_set(mut self, name: impl Into<String>) -> Self {
        self.package_set.name = name.into();
        self
    }

    /// Package name shorthand.
    pub fn name(&self) -> &str {
        &self.autobuild.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("manifest.toml");
        std::fs::write(
            &path,
            r#"
[[packages]]
autobuild = { name = "control", srcdir = "control/control", class = { name = "cmake" } }
vcs = { type = "git", url = "https://git.example.com/control.git" }
package_set = { name = "core" }

[[packages]]
autobuild = { name = "drivers-camera", srcdir = "drivers/camera" }
"#,
        )
        .unwrap();

        let manifest = Manifest::load_from(&path).unwrap();
        assert_eq!(manifest.packages.len(), 2);
        assert_eq!(manifest.packages[0].name(), "control");
        assert_eq!(manifest.packages[0].vcs.kind, "git");
        assert_eq!(manifest.packages[0].autobuild.class.name, "cmake");
        assert_eq!(manifest.packages[1].vcs, Vcs::default());
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("manifest.toml");
        std::fs::write(&path, "packages = 42").unwrap();

        let err = Manifest::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Manifest(_)));
    }

    #[test]
    fn test_descriptor_builder() {
        let pkg = PackageDescriptor::new("control", "control/control")
            .with_class("cmake")
            .with_vcs("git", "https://git.example.com/control.git")
            .with_package_set("core");

        assert_eq!(pkg.autobuild.name, "control");
        assert_eq!(pkg.autobuild.srcdir, "control/control");
        assert_eq!(pkg.autobuild.class.name, "cmake");
        assert_eq!(pkg.vcs.kind, "git");
        assert_eq!(pkg.package_set.name, "core");
    }

    #[test]
    fn test_select_ranks_strongest_first() {
        let manifest = Manifest {
            packages: vec![
                PackageDescriptor::new("control-utils", "tools/control-utils"),
                PackageDescriptor::new("control", "control/control"),
                PackageDescriptor::new("telemetry", "tools/telemetry"),
            ],
        };

        let query = SourcePackageQuery::parse("control").unwrap();
        let selected = manifest.select(&query);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].0.name(), "control");
        assert_eq!(selected[0].1, MatchPriority::Exact);
        assert_eq!(selected[1].0.name(), "control-utils");
        assert_eq!(selected[1].1, MatchPriority::Partial);
    }

    #[test]
    fn test_select_keeps_manifest_order_within_rank() {
        let manifest = Manifest {
            packages: vec![
                PackageDescriptor::new("orocos-rtt", "drivers/orocos-rtt"),
                PackageDescriptor::new("orocos-cpp", "drivers/orocos-cpp"),
            ],
        };

        let query = SourcePackageQuery::parse("orocos").unwrap();
        let selected = manifest.select(&query);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].0.name(), "orocos-rtt");
        assert_eq!(selected[1].0.name(), "orocos-cpp");
        assert_eq!(selected[0].1, selected[1].1);
    }
}
