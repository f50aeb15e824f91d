//! Developer level classification and human-readable feedback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::EvaluationResult;

/// Minimum score for [`DeveloperLevel::Advanced`].
pub const ADVANCED_THRESHOLD: f64 = 80.0;
/// Minimum score for [`DeveloperLevel::Intermediate`].
pub const INTERMEDIATE_THRESHOLD: f64 = 50.0;

/// Structure score that earns praise.
const STRUCTURE_PRAISE: f64 = 18.0;
/// Docs score considered readable.
const READABLE_DOCS: f64 = 8.0;
/// Quality score below which Python code should be refactored.
const PYTHON_QUALITY_FLOOR: f64 = 18.0;
/// Trees smaller than this look like small projects.
const SMALL_TREE: usize = 30;

/// Developer tier derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeveloperLevel {
    /// Below 50.
    Beginner,
    /// 50 up to, but excluding, 80.
    Intermediate,
    /// 80 and above.
    Advanced,
}

impl DeveloperLevel {
    /// Classify a score. Each tier includes its lower bound.
    pub fn from_score(score: f64) -> Self {
        if score >= ADVANCED_THRESHOLD {
            Self::Advanced
        } else if score >= INTERMEDIATE_THRESHOLD {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// Three next steps for this tier, in order.
    pub fn roadmap(&self) -> [&'static str; 3] {
        match self {
            Self::Beginner => [
                "Learn clean structuring",
                "Practice testing",
                "Understand CI/CD",
            ],
            Self::Intermediate => [
                "Improve coverage",
                "Use design patterns",
                "Automate pipelines",
            ],
            Self::Advanced => [
                "Optimize performance",
                "Contribute to open source",
                "Architect scalable systems",
            ],
        }
    }
}

impl fmt::Display for DeveloperLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier for a score.
pub fn developer_level(score: f64) -> DeveloperLevel {
    DeveloperLevel::from_score(score)
}

/// Roadmap for a tier as owned strings.
pub fn roadmap(level: DeveloperLevel) -> Vec<String> {
    level.roadmap().iter().map(|step| step.to_string()).collect()
}

/// What the repository does well.
pub fn strengths(result: &EvaluationResult) -> Vec<String> {
    let languages: Vec<&str> = result.languages.iter().map(String::as_str).collect();
    let mut strengths = vec![format!("Uses {}", languages.join(", "))];
    if result.structure_score >= STRUCTURE_PRAISE {
        strengths.push("Well-organized project structure".to_string());
    }
    if result.has_tests {
        strengths.push("Includes test files".to_string());
    }
    if result.has_ci {
        strengths.push("CI pipeline configured".to_string());
    }
    if result.docs_score >= READABLE_DOCS {
        strengths.push("Readable documentation".to_string());
    }
    strengths
}

/// What the repository should improve.
pub fn suggestions(result: &EvaluationResult) -> Vec<String> {
    let mut suggestions = Vec::new();
    if result.uses_python() && result.quality_score < PYTHON_QUALITY_FLOOR {
        suggestions.push("Refactor Python code and follow PEP8".to_string());
    }
    if result.tree_size < SMALL_TREE {
        suggestions.push("Expand project scope with more features".to_string());
    }
    if !result.has_tests {
        suggestions.push("Add unit tests".to_string());
    }
    if !result.has_ci {
        suggestions.push("Add GitHub Actions CI".to_string());
    }
    if result.docs_score < READABLE_DOCS {
        suggestions.push("Improve README documentation".to_string());
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LanguageSet;

    fn result(languages: &[&str]) -> EvaluationResult {
        EvaluationResult {
            repo_name: "proj".to_string(),
            languages: languages.iter().map(|l| l.to_string()).collect::<LanguageSet>(),
            total_score: 0.0,
            structure_score: 0.0,
            quality_score: 30.0,
            has_tests: false,
            has_ci: false,
            docs_score: 0.0,
            tree_size: 0,
        }
    }

    #[test]
    fn level_thresholds_are_inclusive() {
        assert_eq!(developer_level(80.0), DeveloperLevel::Advanced);
        assert_eq!(developer_level(79.9), DeveloperLevel::Intermediate);
        assert_eq!(developer_level(50.0), DeveloperLevel::Intermediate);
        assert_eq!(developer_level(49.9), DeveloperLevel::Beginner);
        assert_eq!(developer_level(-12.0), DeveloperLevel::Beginner);
        assert_eq!(developer_level(73.0).to_string(), "Intermediate");
    }

    #[test]
    fn roadmaps_are_keyed_by_tier() {
        assert_eq!(
            roadmap(DeveloperLevel::Beginner),
            vec!["Learn clean structuring", "Practice testing", "Understand CI/CD"]
        );
        assert_eq!(roadmap(DeveloperLevel::Intermediate)[0], "Improve coverage");
        assert_eq!(
            roadmap(DeveloperLevel::Advanced)[2],
            "Architect scalable systems"
        );
    }

    #[test]
    fn strengths_always_mention_languages() {
        let strengths = strengths(&result(&["Python", "JavaScript"]));
        assert_eq!(strengths, vec!["Uses JavaScript, Python"]);
    }

    #[test]
    fn strengths_follow_fixed_order() {
        let mut repo = result(&["Rust"]);
        repo.structure_score = 18.0;
        repo.has_tests = true;
        repo.has_ci = true;
        repo.docs_score = 8.0;

        assert_eq!(
            strengths(&repo),
            vec![
                "Uses Rust",
                "Well-organized project structure",
                "Includes test files",
                "CI pipeline configured",
                "Readable documentation",
            ]
        );
    }

    #[test]
    fn suggestions_fire_independently() {
        let mut repo = result(&["Python"]);
        repo.quality_score = 17.9;

        assert_eq!(
            suggestions(&repo),
            vec![
                "Refactor Python code and follow PEP8",
                "Expand project scope with more features",
                "Add unit tests",
                "Add GitHub Actions CI",
                "Improve README documentation",
            ]
        );

        repo.languages = ["Java".to_string()].into_iter().collect();
        repo.tree_size = 30;
        repo.has_tests = true;
        repo.has_ci = true;
        repo.docs_score = 8.0;
        assert!(suggestions(&repo).is_empty());
    }
}
