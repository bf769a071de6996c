//! Repository error types
//!
//! Every fallible operation in the library returns [`RepositoryError`]. The CLI maps
//! each kind to its own exit code through [`RepositoryError::exit_code`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::artifacts::objects::object_id::ObjectId;

/// The main error type for repository operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// no object, commit or revision exists under the given name
    #[error("not found: {0}")]
    NotFound(String),

    /// the file passed to `add` or `hash-object` does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// stored bytes do not parse as the expected record, fail the integrity check,
    /// or the parent chain loops
    #[error("corrupt repository data: {0}")]
    Corrupt(String),

    /// underlying storage is unavailable
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// the repository lock was not acquired in time
    #[error("repository is locked by another operation (waited {}ms)", .0.as_millis())]
    Locked(Duration),

    /// commit requested with an empty staging area
    #[error("nothing staged for commit")]
    EmptyCommit,

    /// the repository directory has not been initialized
    #[error("not a twig repository: {}", .0.display())]
    NotInitialized(PathBuf),

    /// the path cannot be staged (outside the repository, a directory, or unencodable)
    #[error("invalid path {}: {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// a digest prefix matches more than one object
    #[error("ambiguous revision {prefix}: candidates {}", format_candidates(.candidates))]
    AmbiguousRevision {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    /// an environment setting could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

fn format_candidates(candidates: &[ObjectId]) -> String {
    candidates
        .iter()
        .map(|oid| oid.to_short_oid())
        .collect::<Vec<_>>()
        .join(", ")
}

impl RepositoryError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        RepositoryError::Corrupt(reason.into())
    }

    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        RepositoryError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// check if this error indicates the requested thing doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::NotFound(_) | RepositoryError::FileNotFound(_)
        )
    }

    /// check if the caller may retry the operation with backoff
    pub fn is_retriable(&self) -> bool {
        matches!(self, RepositoryError::Locked(_))
    }

    /// Process exit code for the CLI, one per error kind
    pub fn exit_code(&self) -> u8 {
        match self {
            RepositoryError::NotFound(_) => 2,
            RepositoryError::FileNotFound(_) => 3,
            RepositoryError::Corrupt(_) => 4,
            RepositoryError::Io(_) => 5,
            RepositoryError::Locked(_) => 6,
            RepositoryError::EmptyCommit => 7,
            RepositoryError::NotInitialized(_) => 8,
            RepositoryError::InvalidPath { .. } => 9,
            RepositoryError::AmbiguousRevision { .. } => 10,
            RepositoryError::InvalidConfig(_) => 11,
        }
    }
}

/// result type alias for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_error_classification() {
        let not_found = RepositoryError::NotFound("abc".to_string());
        assert!(not_found.is_not_found());
        assert!(!not_found.is_retriable());

        let locked = RepositoryError::Locked(Duration::from_millis(10));
        assert!(locked.is_retriable());
        assert!(!locked.is_not_found());
    }

    #[test]
    fn test_exit_codes_are_distinct_and_non_zero() {
        let errors = [
            RepositoryError::NotFound(String::new()),
            RepositoryError::FileNotFound(PathBuf::new()),
            RepositoryError::Corrupt(String::new()),
            RepositoryError::Io(std::io::Error::other("boom")),
            RepositoryError::Locked(Duration::ZERO),
            RepositoryError::EmptyCommit,
            RepositoryError::NotInitialized(PathBuf::new()),
            RepositoryError::invalid_path("a", "b"),
            RepositoryError::AmbiguousRevision {
                prefix: String::new(),
                candidates: vec![],
            },
            RepositoryError::InvalidConfig(String::new()),
        ];

        let codes = errors.iter().map(|e| e.exit_code()).collect::<HashSet<_>>();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
    }
}
