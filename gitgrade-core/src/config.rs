//! Endpoint templates and engine limits.

use crate::domain::RepositoryRef;

/// Default REST API base.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default raw-content base.
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";
/// Host name that marks an input as a URL rather than a bare handle.
pub const DEFAULT_HOST: &str = "github.com";

/// URL templates for every upstream document the engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_base: String,
    raw_base: String,
    host: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_RAW_URL, DEFAULT_HOST)
    }
}

impl Endpoints {
    /// Build endpoints from explicit bases.
    pub fn new(api_base: &str, raw_base: &str, host: &str) -> Self {
        Self {
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            raw_base: raw_base.trim().trim_end_matches('/').to_string(),
            host: host.trim().to_string(),
        }
    }

    /// Build endpoints from `GITHUB_API_URL`, `GITHUB_RAW_URL` and
    /// `GITGRADE_HOST`, using defaults for unset or blank values.
    pub fn from_env() -> Self {
        Self::new(
            &env_or("GITHUB_API_URL", DEFAULT_API_URL),
            &env_or("GITHUB_RAW_URL", DEFAULT_RAW_URL),
            &env_or("GITGRADE_HOST", DEFAULT_HOST),
        )
    }

    /// Replace the API base.
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim().trim_end_matches('/').to_string();
        self
    }

    /// Replace the raw-content base.
    pub fn with_raw_base(mut self, raw_base: &str) -> Self {
        self.raw_base = raw_base.trim().trim_end_matches('/').to_string();
        self
    }

    /// Host marker used by input parsing.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Repository list of an owner.
    pub fn owner_repos(&self, owner: &str) -> String {
        format!("{}/users/{owner}/repos", self.api_base)
    }

    /// Repository metadata.
    pub fn repository(&self, repo: &RepositoryRef) -> String {
        format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.name)
    }

    /// Language byte counts.
    pub fn languages(&self, repo: &RepositoryRef) -> String {
        format!("{}/languages", self.repository(repo))
    }

    /// Recursive tree listing at a branch.
    pub fn tree(&self, repo: &RepositoryRef, branch: &str) -> String {
        format!("{}/git/trees/{branch}?recursive=1", self.repository(repo))
    }

    /// Raw file content at a branch.
    pub fn raw_file(&self, repo: &RepositoryRef, branch: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/{branch}/{path}",
            self.raw_base, repo.owner, repo.name
        )
    }

    /// README metadata.
    pub fn readme(&self, repo: &RepositoryRef) -> String {
        format!("{}/readme", self.repository(repo))
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Bounds that keep a single evaluation cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    /// Leading tree entries inspected for languages, tests and sources.
    pub sample_window: usize,
    /// Python files whose content is fetched and parsed.
    pub analyzed_files: usize,
    /// Most recently updated repositories evaluated for a profile.
    pub max_repositories: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            sample_window: 120,
            analyzed_files: 3,
            max_repositories: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("alice", "proj")
    }

    #[test]
    fn default_templates_point_at_github() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.owner_repos("alice"),
            "https://api.github.com/users/alice/repos"
        );
        assert_eq!(
            endpoints.tree(&repo(), "main"),
            "https://api.github.com/repos/alice/proj/git/trees/main?recursive=1"
        );
        assert_eq!(
            endpoints.raw_file(&repo(), "dev", "src/app.py"),
            "https://raw.githubusercontent.com/alice/proj/dev/src/app.py"
        );
        assert_eq!(
            endpoints.languages(&repo()),
            "https://api.github.com/repos/alice/proj/languages"
        );
        assert_eq!(
            endpoints.readme(&repo()),
            "https://api.github.com/repos/alice/proj/readme"
        );
    }

    #[test]
    fn bases_are_normalized() {
        let endpoints = Endpoints::default()
            .with_api_base("http://127.0.0.1:9000/api/ ")
            .with_raw_base("http://127.0.0.1:9000/raw/");
        assert_eq!(
            endpoints.repository(&repo()),
            "http://127.0.0.1:9000/api/repos/alice/proj"
        );
        assert_eq!(
            endpoints.raw_file(&repo(), "main", "a.py"),
            "http://127.0.0.1:9000/raw/alice/proj/main/a.py"
        );
    }

    #[test]
    fn default_limits_match_sampling_bounds() {
        let limits = EngineLimits::default();
        assert_eq!(limits.sample_window, 120);
        assert_eq!(limits.analyzed_files, 3);
        assert_eq!(limits.max_repositories, 5);
    }
}
