//! Evaluation pipeline for one batch run.

use chrono::Local;
use log::{debug, info};

use crate::analyzer::{SourceSample, aggregate, analyze_python};
use crate::cache::{BranchCache, FetchCache};
use crate::config::{EngineLimits, Endpoints};
use crate::domain::{AnalysisSample, EvaluationResult, FileEntry, RepositoryRef};
use crate::error::{GitGradeError, Result};
use crate::languages::detect_languages;
use crate::payload::{LanguageMap, ReadmeMetadata, TreeListing, decode};
use crate::report::BatchReport;
use crate::resolver::{Resolver, parse_input};
use crate::scoring::{ScoreInputs, score};
use crate::transport::Transport;

/// State of one evaluation batch.
///
/// Owns the fetch and branch caches; create one per run and drop it
/// afterwards. A session is `Sync` whenever its transport is, so
/// repositories of the same batch can be evaluated from several threads.
pub struct Session<T: Transport> {
    transport: T,
    endpoints: Endpoints,
    limits: EngineLimits,
    cache: FetchCache,
    branches: BranchCache,
}

impl<T: Transport> Session<T> {
    /// Start a session with default limits.
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        Self::with_limits(transport, endpoints, EngineLimits::default())
    }

    /// Start a session with custom limits.
    pub fn with_limits(transport: T, endpoints: Endpoints, limits: EngineLimits) -> Self {
        Self {
            transport,
            endpoints,
            limits,
            cache: FetchCache::new(),
            branches: BranchCache::new(),
        }
    }

    /// The fetch cache of this session.
    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Endpoints this session fetches from.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn resolver(&self) -> Resolver<'_, T> {
        Resolver::new(&self.transport, &self.endpoints, &self.cache, &self.branches)
    }

    /// Repositories that `input` refers to.
    pub fn resolve(&self, input: &str) -> Vec<RepositoryRef> {
        let query = parse_input(input, self.endpoints.host());
        self.resolver().resolve(&query, &self.limits)
    }

    /// Default branch of `repo`.
    pub fn default_branch(&self, repo: &RepositoryRef) -> String {
        self.resolver().default_branch(repo)
    }

    /// Run the full pipeline for one repository.
    pub fn evaluate_repository(&self, repo: &RepositoryRef) -> EvaluationResult {
        let branch = self.default_branch(repo);
        let (tree_size, tree) = self.tree(repo, &branch);
        let sample = SourceSample::new(&tree, &self.limits);
        info!("{repo}@{branch}: {tree_size} tree entries");

        let samples: Vec<AnalysisSample> = sample
            .files_to_analyze(&self.limits)
            .iter()
            .map(|path| {
                let source = self
                    .transport
                    .fetch_text(&self.endpoints.raw_file(repo, &branch, path));
                analyze_python(&source)
            })
            .collect();
        let metrics = aggregate(&samples, sample.python_candidates().len());

        let readme: Option<ReadmeMetadata> = decode(
            self.cache
                .get_json(&self.transport, &self.endpoints.readme(repo)),
            "readme",
        );
        let has_tests = sample.has_tests();
        let has_ci = sample.has_ci();
        let breakdown = score(&ScoreInputs {
            tree_size,
            class_count: metrics.class_count,
            avg_function_body_length: metrics.avg_function_body_length,
            has_tests,
            has_ci,
            readme_content_length: readme.as_ref().map(ReadmeMetadata::content_length),
        });

        let languages: Option<LanguageMap> = decode(
            self.cache
                .get_json(&self.transport, &self.endpoints.languages(repo)),
            "languages",
        );
        let languages = detect_languages(languages.as_ref(), sample.window());

        info!("{repo}: total score {}", breakdown.total);
        EvaluationResult {
            repo_name: repo.name.clone(),
            languages,
            total_score: breakdown.total,
            structure_score: breakdown.structure,
            quality_score: breakdown.quality,
            has_tests,
            has_ci,
            docs_score: breakdown.docs,
            tree_size,
        }
    }

    /// Resolve `input` and evaluate every repository in order.
    ///
    /// Fails only when nothing could be resolved.
    pub fn evaluate(&self, input: &str) -> Result<BatchReport> {
        let repos = self.resolve(input);
        if repos.is_empty() {
            return Err(no_repositories(input, self.endpoints.host()));
        }
        let results = repos
            .iter()
            .map(|repo| self.evaluate_repository(repo))
            .collect();
        Ok(BatchReport::build(results, Local::now()))
    }

    /// Size of the full listing and its entries that carry a path.
    fn tree(&self, repo: &RepositoryRef, branch: &str) -> (usize, Vec<FileEntry>) {
        let url = self.endpoints.tree(repo, branch);
        let listing: Option<TreeListing> =
            decode(self.cache.get_json(&self.transport, &url), "tree");
        let Some(listing) = listing else {
            return (0, Vec::new());
        };
        if listing.truncated == Some(true) {
            debug!("{repo}@{branch}: tree listing truncated upstream");
        }
        (listing.entry_count(), listing.into_entries())
    }
}

/// The resolution failure for `input`.
pub fn no_repositories(input: &str, host: &str) -> GitGradeError {
    let owner = parse_input(input, host).owner;
    GitGradeError::NoRepositories {
        owner: if owner.is_empty() {
            input.trim().to_string()
        } else {
            owner
        },
    }
}
