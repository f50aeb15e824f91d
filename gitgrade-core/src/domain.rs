//! Domain entities for GitGrade.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Language names detected for a repository. Never empty once detection ran.
pub type LanguageSet = BTreeSet<String>;

/// Identity of a repository on the source host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Account that owns the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepositoryRef {
    /// Create a reference from owner and repository name.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A single entry of a tree listing, in upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Repository-relative path.
    pub path: String,
}

impl FileEntry {
    /// Create an entry for a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Structural metrics extracted from one source file.
///
/// Files that cannot be parsed produce [`AnalysisSample::default`], the
/// "no signal" value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSample {
    /// Number of function definitions anywhere in the file.
    pub function_count: usize,
    /// Number of class definitions anywhere in the file.
    pub class_count: usize,
    /// Mean count of direct body statements per function, or 0.
    pub avg_function_body_length: f64,
}

/// Outcome of evaluating one repository. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Repository name (without owner).
    pub repo_name: String,
    /// Languages used by the repository.
    pub languages: LanguageSet,
    /// Sum of all sub-scores, rounded to one decimal.
    pub total_score: f64,
    /// Tree size and class structure, 0-30.
    pub structure_score: f64,
    /// Function size heuristic, at most 30 and unbounded below.
    pub quality_score: f64,
    /// Whether sampled Python paths look like tests.
    pub has_tests: bool,
    /// Whether the tree contains CI workflow configuration.
    pub has_ci: bool,
    /// README length heuristic, 0-15.
    pub docs_score: f64,
    /// Number of entries in the full tree listing.
    pub tree_size: usize,
}

impl EvaluationResult {
    /// Whether Python is among the detected languages.
    pub fn uses_python(&self) -> bool {
        self.languages.contains("Python")
    }
}
