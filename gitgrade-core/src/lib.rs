#![deny(missing_docs)]
//! GitGrade core library.
//!
//! Resolves public repositories, samples their trees and Python sources, and
//! turns what it finds into bounded heuristic scores with feedback. Network
//! access goes through the [`Transport`] trait; everything returned is plain
//! serializable data.

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod languages;
pub mod payload;
pub mod report;
pub mod resolver;
pub mod scoring;
pub mod transport;

pub use analyzer::{AggregateMetrics, SourceSample, aggregate, analyze_python};
pub use cache::{BranchCache, FetchCache};
pub use config::{EngineLimits, Endpoints};
pub use domain::{AnalysisSample, EvaluationResult, FileEntry, LanguageSet, RepositoryRef};
pub use engine::{Session, no_repositories};
pub use error::{GitGradeError, Result};
pub use feedback::{DeveloperLevel, developer_level, roadmap, strengths, suggestions};
pub use languages::{UNKNOWN_LANGUAGE, detect_languages};
pub use report::{
    BatchReport, BatchSummary, RepositoryReport, TIMESTAMP_FORMAT, average, render_json,
    render_markdown,
};
pub use resolver::{FALLBACK_BRANCH, RepoQuery, Resolver, parse_input};
pub use scoring::{ScoreBreakdown, ScoreInputs, score};
pub use transport::Transport;
