//! Query micro-language for selecting packages out of a workspace.
//!
//! # Syntax Overview
//!
//! Full pattern: `token(:token)*`
//!
//! - **Fielded tokens**: `FIELD=VALUE` (strict) or `FIELD~VALUE` (substring)
//! - **Bare tokens**: `VALUE`, expanded to the domain's default fields
//! - `:` combines tokens with AND
//!
//! Each domain validates `FIELD` against its own allow-list and resolves
//! short aliases (`class` → `autobuild.class.name`) before validation, so a
//! query that parses is guaranteed well-formed for its domain. Matching
//! grades its confidence on [`MatchPriority`]; "no match" is an absent
//! value, not a rank.

mod parser;

pub mod osdep;
pub mod source;

pub use osdep::{OsDepField, OsDepLeaf, OsDepQuery};
pub use source::{SourceField, SourceLeaf, SourcePackageQuery};


/// Confidence of a single match, from weakest to strongest.
///
/// "No match" is deliberately not a variant: matching returns
/// `Option<MatchPriority>` so a miss can never be confused with a valid
/// rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchPriority {
    /// The value is a directory prefix of the field, last segment matched
    /// loosely.
    DirPrefixWeak,
    /// The value is a directory prefix of the field, last segment matched
    /// exactly and anchored at the end.
    DirPrefixStrong,
    /// The value is a case-insensitive substring of the field.
    Partial,
    /// The field equals the value.
    Exact,
}

impl std::fmt::Display for MatchPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPriority::DirPrefixWeak => write!(f, "dir_prefix_weak"),
            MatchPriority::DirPrefixStrong => write!(f, "dir_prefix_strong"),
            MatchPriority::Partial => write!(f, "partial"),
            MatchPriority::Exact => write!(f, "exact"),
        }
    }
}

/// A compiled query: a leaf matcher or an AND/OR combination of subqueries.
///
/// The tree is immutable once built and holds no per-evaluation state, so a
/// compiled query can be evaluated against any number of descriptors, from
/// any number of threads.
#[derive(Debug, Clone)]
pub enum Query<L> {
    /// A single field/value matcher.
    Leaf(L),
    /// Matches when every child matches; as confident as its weakest child.
    All(Vec<Query<L>>),
    /// Matches when any child matches; as confident as its strongest child.
    Any(Vec<Query<L>>),
}

impl<L> Query<L> {
    /// AND the given subqueries. A single subquery is returned as-is rather
    /// than wrapped.
    pub fn all(mut children: Vec<Query<L>>) -> Query<L> {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Query::All(children)
        }
    }

    /// OR the given subqueries. A single subquery is returned as-is rather
    /// than wrapped.
    pub fn any(mut children: Vec<Query<L>>) -> Query<L> {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Query::Any(children)
        }
    }
}
