//! OS dependency queries.
//!
//! An OS dependency is an abstract package name; what actually gets
//! installed is decided by the workspace's OS package resolver. Queries
//! select on the abstract name, the concrete package names, or the package
//! managers that supply them. The resolver is consulted on every field
//! access; results are not cached. Candidate sets are small and the
//! resolver owns freshness.

use regex::{Regex, RegexBuilder};

use crate::osdeps::OsDep;
use crate::query::parser::{self, Token};
use crate::query::{MatchPriority, Query};
use crate::{Error, Result};

/// A compiled query over OS dependencies.
pub type OsDepQuery = Query<OsDepLeaf>;

/// Fields an OS dependency query may select on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsDepField {
    /// The abstract dependency name.
    Name,
    /// Concrete package names the resolver maps the dependency to.
    RealPackage,
    /// Package managers that can supply the dependency.
    PackageManager,
}

/// Allow-list for OS dependency queries. No aliases in this domain.
const FIELDS: &[(&str, OsDepField)] = &[
    ("name", OsDepField::Name),
    ("real_package", OsDepField::RealPackage),
    ("package_manager", OsDepField::PackageManager),
];

impl OsDepField {
    /// Look up a field path in the allow-list.
    pub fn from_path(path: &str) -> Result<Self> {
        FIELDS
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, field)| *field)
            .ok_or_else(|| Error::UnknownField(path.to_string()))
    }

    /// The field path as written in queries.
    pub fn path(self) -> &'static str {
        match self {
            OsDepField::Name => "name",
            OsDepField::RealPackage => "real_package",
            OsDepField::PackageManager => "package_manager",
        }
    }

    /// Resolve this field to its value set. `real_package` and
    /// `package_manager` call into the resolver each time.
    fn resolve(self, dep: &OsDep<'_>) -> Result<Vec<String>> {
        match self {
            OsDepField::Name => Ok(vec![dep.name().to_string()]),
            OsDepField::RealPackage => {
                Ok(dep.resolve()?.into_iter().map(|pkg| pkg.name).collect())
            }
            OsDepField::PackageManager => {
                Ok(dep.resolve()?.into_iter().map(|pkg| pkg.manager).collect())
            }
        }
    }
}

/// A single field/value matcher over OS dependencies.
///
/// Unlike source package queries, `=` is strict here: the substring
/// fallback only applies when the token used `~`.
#[derive(Debug, Clone)]
pub struct OsDepLeaf {
    field: OsDepField,
    value: String,
    partial: bool,
    value_rx: Regex,
}

impl OsDepLeaf {
    /// Build a leaf matching `value` against `field`.
    pub fn new(field: OsDepField, value: impl Into<String>, partial: bool) -> Result<Self> {
        let value = value.into();
        let value_rx = RegexBuilder::new(&regex::escape(&value))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            field,
            value,
            partial,
            value_rx,
        })
    }

    /// Grade this leaf against a dependency descriptor.
    ///
    /// Resolver failures propagate unchanged.
    pub fn match_priority(&self, dep: &OsDep<'_>) -> Result<Option<MatchPriority>> {
        let values = self.field.resolve(dep)?;
        if values.iter().any(|v| *v == self.value) {
            return Ok(Some(MatchPriority::Exact));
        }
        if !self.partial {
            return Ok(None);
        }
        if values.iter().any(|v| self.value_rx.is_match(v)) {
            return Ok(Some(MatchPriority::Partial));
        }
        Ok(None)
    }
}

impl std::fmt::Display for OsDepLeaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = if self.partial { '~' } else { '=' };
        write!(f, "{}{}{}", self.field.path(), op, self.value)
    }
}

impl Query<OsDepLeaf> {
    /// Parse a compound OS dependency query.
    ///
    /// Tokens are combined with AND; a bare token matches the abstract
    /// dependency name, substring allowed.
    pub fn parse(input: &str) -> Result<Self> {
        let mut subqueries = Vec::new();
        for token in parser::tokenize(input)? {
            subqueries.push(match token {
                Token::Bare(value) => {
                    Query::Leaf(OsDepLeaf::new(OsDepField::Name, value, true)?)
                }
                Token::Fielded {
                    field,
                    value,
                    partial,
                } => Query::Leaf(OsDepLeaf::new(OsDepField::from_path(field)?, value, partial)?),
            });
        }
        Ok(Query::all(subqueries))
    }

    /// Grade a dependency against this query.
    ///
    /// Same aggregation as source package queries, except that resolver
    /// errors surface from any leaf.
    pub fn match_priority(&self, dep: &OsDep<'_>) -> Result<Option<MatchPriority>> {
        match self {
            Query::Leaf(leaf) => leaf.match_priority(dep),
            Query::All(children) => {
                let mut weakest: Option<MatchPriority> = None;
                for child in children {
                    match child.match_priority(dep)? {
                        None => return Ok(None),
                        Some(priority) => {
                            weakest = Some(weakest.map_or(priority, |w| w.min(priority)));
                        }
                    }
                }
                Ok(weakest)
            }
            Query::Any(children) => {
                let mut strongest: Option<MatchPriority> = None;
                for child in children {
                    if let Some(priority) = child.match_priority(dep)? {
                        strongest = Some(strongest.map_or(priority, |s| s.max(priority)));
                    }
                }
                Ok(strongest)
            }
        }
    }
}
