//! Error types for query parsing and matching.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty query")]
    EmptyQuery,

    #[error("invalid query token '{0}': expected FIELD=VALUE, FIELD~VALUE or a bare value")]
    QuerySyntax(String),

    #[error("'{0}' is not a known query field")]
    UnknownField(String),

    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("resolution of OS package '{name}' failed: {source}")]
    Resolve {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
