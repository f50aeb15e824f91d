//! Batch report assembly and formatting.

use std::fmt::Write;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::EvaluationResult;
use crate::error::Result;
use crate::feedback::{DeveloperLevel, roadmap, strengths, suggestions};
use crate::scoring::round_one_decimal;

/// Timestamp layout of [`BatchSummary::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y, %H:%M";

/// Feedback for one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryReport {
    /// Scores and signals.
    pub result: EvaluationResult,
    /// Things done well.
    pub strengths: Vec<String>,
    /// Things to improve.
    pub suggestions: Vec<String>,
}

impl RepositoryReport {
    /// Attach feedback to an evaluation result.
    pub fn new(result: EvaluationResult) -> Self {
        Self {
            strengths: strengths(&result),
            suggestions: suggestions(&result),
            result,
        }
    }
}

/// Aggregate over every repository in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Mean total score, rounded to one decimal.
    pub average_score: f64,
    /// Tier of the average score.
    pub level: DeveloperLevel,
    /// Number of repositories evaluated.
    pub repository_count: usize,
    /// When the batch finished.
    pub timestamp: String,
}

/// Everything produced by one evaluation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Aggregate figures.
    pub summary: BatchSummary,
    /// Per-repository results in resolution order.
    pub repositories: Vec<RepositoryReport>,
    /// Next steps for the aggregate tier.
    pub roadmap: Vec<String>,
}

impl BatchReport {
    /// Build the report for evaluated repositories.
    pub fn build<Tz>(results: Vec<EvaluationResult>, finished_at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let totals: Vec<f64> = results.iter().map(|result| result.total_score).collect();
        let average_score = average(&totals);
        let level = DeveloperLevel::from_score(average_score);
        Self {
            summary: BatchSummary {
                average_score,
                level,
                repository_count: results.len(),
                timestamp: finished_at.format(TIMESTAMP_FORMAT).to_string(),
            },
            repositories: results.into_iter().map(RepositoryReport::new).collect(),
            roadmap: roadmap(level),
        }
    }
}

/// Mean of the totals rounded to one decimal; 0 for an empty slice.
pub fn average(totals: &[f64]) -> f64 {
    if totals.is_empty() {
        return 0.0;
    }
    round_one_decimal(totals.iter().sum::<f64>() / totals.len() as f64)
}

/// Render a batch report as Markdown.
pub fn render_markdown(report: &BatchReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# GitGrade Report\n");
    let _ = writeln!(
        output,
        "- Overall score: {:.1} / 100",
        report.summary.average_score
    );
    let _ = writeln!(output, "- Developer level: {}", report.summary.level);
    let _ = writeln!(
        output,
        "- Repositories analyzed: {}",
        report.summary.repository_count
    );
    let _ = writeln!(output, "- Time: {}\n", report.summary.timestamp);

    for repo in &report.repositories {
        let result = &repo.result;
        let _ = writeln!(
            output,
            "## {} ({:.1} / 100)\n",
            result.repo_name, result.total_score
        );
        let _ = writeln!(
            output,
            "| Structure | Quality | Tests | CI | Docs | Tree size |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|");
        let _ = writeln!(
            output,
            "| {:.1} | {:.1} | {} | {} | {:.0} | {} |\n",
            result.structure_score,
            result.quality_score,
            yes_no(result.has_tests),
            yes_no(result.has_ci),
            result.docs_score,
            result.tree_size
        );
        append_list(&mut output, "Strengths", &repo.strengths, "None noted.");
        append_list(
            &mut output,
            "Suggestions",
            &repo.suggestions,
            "Nothing to suggest.",
        );
    }

    let _ = writeln!(output, "## Roadmap\n");
    for (index, step) in report.roadmap.iter().enumerate() {
        let _ = writeln!(output, "{}. {step}", index + 1);
    }
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(payload)?)
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn append_list(output: &mut String, title: &str, items: &[String], empty_message: &str) {
    if items.is_empty() {
        let _ = writeln!(output, "### {title}\n{empty_message}\n");
        return;
    }
    let _ = writeln!(output, "### {title}");
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
    let _ = writeln!(output);
}
