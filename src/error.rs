//! Error types.
//!
//! `ProviderError` is what a collaborator reports for a single call.
//! `SweepError` is the run-level taxonomy: which failures are recovered
//! (invalid identifiers, per-scope enumeration, per-item deletion) and which
//! end the run (scope not found, authentication, configuration).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Definitive answer that the resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("provider error: {0}")]
    Api(String),

    #[error("unexpected provider output: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("invalid resource identifier format: {0}")]
    InvalidIdentifierFormat(String),

    #[error("subscription not found: {0}")]
    ScopeNotFound(String),

    #[error("enumeration failed for subscription {scope}: {source}")]
    Enumeration {
        scope: String,
        #[source]
        source: ProviderError,
    },

    #[error("failed to delete snapshot {name} in {resource_group}: {source}")]
    Deletion {
        name: String,
        resource_group: String,
        #[source]
        source: ProviderError,
    },

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("no scan has been run yet")]
    NoScan,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SweepError {
    /// Wraps a provider fault raised while enumerating `scope`, keeping
    /// authentication failures fatal.
    pub fn enumeration(scope: &str, source: ProviderError) -> Self {
        match source {
            ProviderError::Authentication(msg) => SweepError::Authentication(msg),
            source => SweepError::Enumeration {
                scope: scope.to_string(),
                source,
            },
        }
    }

    /// Fatal errors end the run; everything else is recovered where it occurs.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SweepError::InvalidIdentifierFormat(_)
                | SweepError::Enumeration { .. }
                | SweepError::Deletion { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
