//! Source package queries.
//!
//! Matches the workspace's source package descriptors by name, checkout
//! directory, build class, VCS origin or package set. The checkout
//! directory additionally supports a directory-prefix heuristic:
//! `drivers/camera` selects a package checked out under
//! `workspace/drivers/camera_v2`, with graded confidence.

use regex::{Regex, RegexBuilder};

use crate::manifest::PackageDescriptor;
use crate::query::parser::{self, Token};
use crate::query::{MatchPriority, Query};
use crate::{Error, Result};

/// A compiled query over source package descriptors.
pub type SourcePackageQuery = Query<SourceLeaf>;

/// Fields a source package query may select on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceField {
    /// `autobuild.name`
    Name,
    /// `autobuild.srcdir`
    Srcdir,
    /// `autobuild.class.name`
    ClassName,
    /// `vcs.type`
    VcsType,
    /// `vcs.url`
    VcsUrl,
    /// `package_set.name`
    PackageSet,
}

/// Allow-list mapping dotted field paths to their typed selectors.
const FIELDS: &[(&str, SourceField)] = &[
    ("autobuild.name", SourceField::Name),
    ("autobuild.srcdir", SourceField::Srcdir),
    ("autobuild.class.name", SourceField::ClassName),
    ("vcs.type", SourceField::VcsType),
    ("vcs.url", SourceField::VcsUrl),
    ("package_set.name", SourceField::PackageSet),
];

/// Short aliases accepted in place of the full dotted paths.
const ALIASES: &[(&str, &str)] = &[
    ("class", "autobuild.class.name"),
    ("autobuild", "autobuild.name"),
    ("vcs", "vcs.url"),
    ("package_set", "package_set.name"),
];

impl SourceField {
    /// Look up a dotted path in the allow-list, resolving aliases first.
    pub fn from_path(path: &str) -> Result<Self> {
        let path = ALIASES
            .iter()
            .find(|(alias, _)| *alias == path)
            .map(|(_, full)| *full)
            .unwrap_or(path);
        FIELDS
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, field)| *field)
            .ok_or_else(|| Error::UnknownField(path.to_string()))
    }

    /// The full dotted path of this field.
    pub fn path(self) -> &'static str {
        match self {
            SourceField::Name => "autobuild.name",
            SourceField::Srcdir => "autobuild.srcdir",
            SourceField::ClassName => "autobuild.class.name",
            SourceField::VcsType => "vcs.type",
            SourceField::VcsUrl => "vcs.url",
            SourceField::PackageSet => "package_set.name",
        }
    }

    /// Read this field out of a descriptor.
    fn resolve(self, pkg: &PackageDescriptor) -> &str {
        match self {
            SourceField::Name => &pkg.autobuild.name,
            SourceField::Srcdir => &pkg.autobuild.srcdir,
            SourceField::ClassName => &pkg.autobuild.class.name,
            SourceField::VcsType => &pkg.vcs.kind,
            SourceField::VcsUrl => &pkg.vcs.url,
            SourceField::PackageSet => &pkg.package_set.name,
        }
    }

    /// Whether the field holds a filesystem path. Only path fields get the
    /// directory-prefix heuristic.
    fn is_path(self) -> bool {
        matches!(self, SourceField::Srcdir)
    }
}

/// A single field/value matcher over source packages.
///
/// All matchers are precompiled: construction happens once per parsed
/// expression, matching once per candidate descriptor.
#[derive(Debug, Clone)]
pub struct SourceLeaf {
    field: SourceField,
    value: String,
    partial: bool,
    value_rx: Regex,
    dir_prefix: Option<DirPrefix>,
}

impl SourceLeaf {
    /// Build a leaf matching `value` against `field`.
    ///
    /// `partial` records whether the token used `~`. Source package queries
    /// historically fall back to substring matching for `=` as well, so the
    /// flag only drives the rendered form of the leaf.
    pub fn new(field: SourceField, value: impl Into<String>, partial: bool) -> Result<Self> {
        let value = value.into();
        let value_rx = RegexBuilder::new(&regex::escape(&value))
            .case_insensitive(true)
            .build()?;
        let dir_prefix = if field.is_path() {
            DirPrefix::for_value(&value)?
        } else {
            None
        };
        Ok(Self {
            field,
            value,
            partial,
            value_rx,
            dir_prefix,
        })
    }

    /// Grade this leaf against a descriptor.
    pub fn match_priority(&self, pkg: &PackageDescriptor) -> Option<MatchPriority> {
        let field_value = self.field.resolve(pkg);
        if field_value == self.value {
            return Some(MatchPriority::Exact);
        }
        // A value naming a directory prefix is graded by how precisely the
        // prefix pins down the checkout path, not by raw substring overlap.
        if let Some(dir_prefix) = &self.dir_prefix {
            if dir_prefix.strong.is_match(field_value) {
                return Some(MatchPriority::DirPrefixStrong);
            }
            if dir_prefix.weak.is_match(field_value) {
                return Some(MatchPriority::DirPrefixWeak);
            }
            return None;
        }
        if self.value_rx.is_match(field_value) {
            return Some(MatchPriority::Partial);
        }
        None
    }
}

impl std::fmt::Display for SourceLeaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = if self.partial { '~' } else { '=' };
        write!(f, "{}{}{}", self.field.path(), op, self.value)
    }
}

/// Precompiled weak/strong directory-prefix patterns.
#[derive(Debug, Clone)]
struct DirPrefix {
    weak: Regex,
    strong: Regex,
}

impl DirPrefix {
    /// Compile the patterns for a value with at least one path separator.
    ///
    /// Weak: every segment may be followed by a run of word characters, and
    /// the match may extend past the last segment. Strong: the last segment
    /// must match exactly and end the resolved value.
    fn for_value(value: &str) -> Result<Option<Self>> {
        let segments: Vec<&str> = value.trim_end_matches('/').split('/').collect();
        if segments.len() < 2 {
            return Ok(None);
        }
        let loose: Vec<String> = segments
            .iter()
            .map(|segment| format!("{}\\w*", regex::escape(segment)))
            .collect();
        let weak = Regex::new(&loose.join("/"))?;
        let strong = Regex::new(&format!(
            "{}/{}$",
            loose[..loose.len() - 1].join("/"),
            regex::escape(segments[segments.len() - 1]),
        ))?;
        Ok(Some(Self { weak, strong }))
    }
}

impl Query<SourceLeaf> {
    /// Parse a compound source package query.
    ///
    /// Tokens are combined with AND; a bare token matches the package name
    /// or its checkout directory.
    pub fn parse(input: &str) -> Result<Self> {
        let mut subqueries = Vec::new();
        for token in parser::tokenize(input)? {
            subqueries.push(match token {
                Token::Bare(value) => Self::default_for(value)?,
                Token::Fielded {
                    field,
                    value,
                    partial,
                } => Query::Leaf(SourceLeaf::new(SourceField::from_path(field)?, value, partial)?),
            });
        }
        Ok(Query::all(subqueries))
    }

    /// The expansion of a bare token: match by name OR by checkout
    /// directory, substring allowed.
    fn default_for(value: &str) -> Result<Self> {
        Ok(Query::any(vec![
            Query::Leaf(SourceLeaf::new(SourceField::Name, value, true)?),
            Query::Leaf(SourceLeaf::new(SourceField::Srcdir, value, true)?),
        ]))
    }

    /// Grade a descriptor against this query.
    ///
    /// AND nodes are only as confident as their weakest child and
    /// short-circuit on the first miss; OR nodes take the strongest child.
    /// Combinators consume child priorities only, never the descriptor.
    pub fn match_priority(&self, pkg: &PackageDescriptor) -> Option<MatchPriority> {
        match self {
            Query::Leaf(leaf) => leaf.match_priority(pkg),
            Query::All(children) => {
                let mut weakest: Option<MatchPriority> = None;
                for child in children {
                    let priority = child.match_priority(pkg)?;
                    weakest = Some(weakest.map_or(priority, |w| w.min(priority)));
                }
                weakest
            }
            Query::Any(children) => children
                .iter()
                .filter_map(|child| child.match_priority(pkg))
                .max(),
        }
    }
}
