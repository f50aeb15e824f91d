//! Error types for GitGrade core.

use std::{error::Error, fmt};

/// Error type for GitGrade core operations.
///
/// Missing upstream data is not an error: transport absence and unparsable
/// sources degrade to defaults. Only a batch with nothing to evaluate, or a
/// report that cannot be serialized, is surfaced to the caller.
#[derive(Debug)]
pub enum GitGradeError {
    /// The resolver produced no repositories for the given owner.
    NoRepositories {
        /// Owner (or raw input) the batch was resolved for.
        owner: String,
    },
    /// Report serialization failed.
    Json(serde_json::Error),
}

impl fmt::Display for GitGradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRepositories { owner } => write!(
                f,
                "No repositories found for {owner}. GitHub may have rate-limited the request. Try again after some time."
            ),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl Error for GitGradeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NoRepositories { .. } => None,
        }
    }
}

impl From<serde_json::Error> for GitGradeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Convenience result type for GitGrade core.
pub type Result<T> = std::result::Result<T, GitGradeError>;
