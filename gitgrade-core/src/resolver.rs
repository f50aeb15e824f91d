//! Turns user input into repositories to evaluate.

use log::{debug, info};

use crate::cache::{BranchCache, FetchCache};
use crate::config::{EngineLimits, Endpoints};
use crate::domain::RepositoryRef;
use crate::payload::{RepoListingEntry, RepoMetadata, decode};
use crate::transport::Transport;

/// Branch used when metadata does not name one.
pub const FALLBACK_BRANCH: &str = "main";

/// Parsed form of a profile URL, repository URL or bare handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoQuery {
    /// Account to look up.
    pub owner: String,
    /// Specific repository, when the input named one.
    pub repo: Option<String>,
}

/// Parse user input into an owner and optional repository.
///
/// The query string and a trailing slash are dropped. Inputs containing
/// `host` are split after it into at most two path segments; anything else is
/// taken verbatim as the owner.
pub fn parse_input(input: &str, host: &str) -> RepoQuery {
    let trimmed = input.trim();
    let without_query = trimmed.split('?').next().unwrap_or(trimmed);
    let cleaned = without_query.trim_end_matches('/');

    let Some(index) = cleaned.find(host).filter(|_| !host.is_empty()) else {
        return RepoQuery {
            owner: cleaned.to_string(),
            repo: None,
        };
    };

    let path = cleaned[index + host.len()..].trim_start_matches(['/', ':']);
    let mut segments = path.split('/');
    let owner = segments.next().unwrap_or_default().to_string();
    let repo = segments
        .next()
        .map(|segment| segment.strip_suffix(".git").unwrap_or(segment))
        .filter(|segment| !segment.is_empty())
        .map(str::to_string);

    RepoQuery { owner, repo }
}

/// Resolves repositories and their default branches.
pub struct Resolver<'a, T: Transport + ?Sized> {
    transport: &'a T,
    endpoints: &'a Endpoints,
    cache: &'a FetchCache,
    branches: &'a BranchCache,
}

impl<'a, T: Transport + ?Sized> Resolver<'a, T> {
    /// Create a resolver over shared session state.
    pub fn new(
        transport: &'a T,
        endpoints: &'a Endpoints,
        cache: &'a FetchCache,
        branches: &'a BranchCache,
    ) -> Self {
        Self {
            transport,
            endpoints,
            cache,
            branches,
        }
    }

    /// Resolve a parsed query into repositories.
    ///
    /// A named repository is returned as is. Otherwise the owner's most
    /// recently updated repositories are listed, up to the configured limit.
    pub fn resolve(&self, query: &RepoQuery, limits: &EngineLimits) -> Vec<RepositoryRef> {
        if query.owner.is_empty() {
            return Vec::new();
        }
        if let Some(repo) = &query.repo {
            return vec![RepositoryRef::new(query.owner.clone(), repo.clone())];
        }

        let url = self.endpoints.owner_repos(&query.owner);
        let listing: Vec<RepoListingEntry> =
            decode(self.cache.get_json(self.transport, &url), "repository list")
                .unwrap_or_default();
        let repos: Vec<RepositoryRef> = most_recent(listing, limits.max_repositories)
            .into_iter()
            .map(|name| RepositoryRef::new(query.owner.clone(), name))
            .collect();
        info!("resolved {} repositories for {}", repos.len(), query.owner);
        repos
    }

    /// Default branch of `repo`, falling back to [`FALLBACK_BRANCH`].
    pub fn default_branch(&self, repo: &RepositoryRef) -> String {
        self.branches.get_or_resolve(repo, || {
            let url = self.endpoints.repository(repo);
            let metadata: Option<RepoMetadata> =
                decode(self.cache.get_json(self.transport, &url), "repository metadata");
            let branch = metadata
                .and_then(|metadata| metadata.default_branch)
                .filter(|branch| !branch.is_empty());
            if branch.is_none() {
                debug!("{repo}: no default branch in metadata, using {FALLBACK_BRANCH}");
            }
            branch.unwrap_or_else(|| FALLBACK_BRANCH.to_string())
        })
    }
}

/// Names of the `limit` most recently updated repositories.
///
/// ISO-8601 timestamps sort lexicographically; the sort is stable so ties
/// keep upstream order.
fn most_recent(mut listing: Vec<RepoListingEntry>, limit: usize) -> Vec<String> {
    listing.retain(|entry| entry.name.as_deref().is_some_and(|name| !name.is_empty()));
    listing.sort_by(|a, b| {
        let a = a.updated_at.as_deref().unwrap_or_default();
        let b = b.updated_at.as_deref().unwrap_or_default();
        b.cmp(a)
    });
    listing
        .into_iter()
        .filter_map(|entry| entry.name)
        .take(limit)
        .collect()
}
