//! Heuristic scoring of an evaluated repository.
//!
//! ```text
//! structure = min(30, 10 * ln(tree_size + 1) + class_count)
//! quality   = min(30, 30 - 2 * |avg_function_body_length - 12|)
//! readiness = 10 if tests + 15 if ci
//! docs      = min(15, readme_content_length / 300)
//! total     = round(structure + quality + readiness + docs, 1)
//! ```
//!
//! `quality` has no lower bound: very long or very short functions can push
//! it, and the total, below zero.

use serde::{Deserialize, Serialize};

/// Upper bound of the structure score.
pub const MAX_STRUCTURE: f64 = 30.0;
/// Upper bound of the quality score.
pub const MAX_QUALITY: f64 = 30.0;
/// Upper bound of the docs score.
pub const MAX_DOCS: f64 = 15.0;
/// Function body size, in statements, that earns the full quality score.
pub const IDEAL_FUNCTION_BODY: f64 = 12.0;
/// Readiness points for tests.
pub const TESTS_POINTS: f64 = 10.0;
/// Readiness points for CI.
pub const CI_POINTS: f64 = 15.0;
/// Encoded README characters per docs point.
pub const README_CHARS_PER_POINT: usize = 300;

/// Signals collected for one repository.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreInputs {
    /// Entries in the full tree listing.
    pub tree_size: usize,
    /// Classes across analysed files.
    pub class_count: usize,
    /// Normalised average function body length.
    pub avg_function_body_length: f64,
    /// Test files present in the sample.
    pub has_tests: bool,
    /// CI configuration present in the tree.
    pub has_ci: bool,
    /// Encoded README length, `None` when there is no README.
    pub readme_content_length: Option<usize>,
}

/// The four sub-scores and their rounded sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Structure sub-score.
    pub structure: f64,
    /// Quality sub-score.
    pub quality: f64,
    /// Readiness sub-score.
    pub readiness: f64,
    /// Documentation sub-score.
    pub docs: f64,
    /// Rounded total.
    pub total: f64,
}

/// Score a repository from its collected signals.
pub fn score(inputs: &ScoreInputs) -> ScoreBreakdown {
    let structure = structure_score(inputs.tree_size, inputs.class_count);
    let quality = quality_score(inputs.avg_function_body_length);
    let readiness = readiness_score(inputs.has_tests, inputs.has_ci);
    let docs = docs_score(inputs.readme_content_length);
    ScoreBreakdown {
        structure,
        quality,
        readiness,
        docs,
        total: round_one_decimal(structure + quality + readiness + docs),
    }
}

/// Logarithmic tree size plus classes, capped at 30.
pub fn structure_score(tree_size: usize, class_count: usize) -> f64 {
    let size = 10.0 * ((tree_size + 1) as f64).ln();
    (size + class_count as f64).min(MAX_STRUCTURE)
}

/// Linear penalty around the ideal function size, capped at 30 and not
/// floored.
pub fn quality_score(avg_function_body_length: f64) -> f64 {
    let deviation = (avg_function_body_length - IDEAL_FUNCTION_BODY).abs();
    (MAX_QUALITY - 2.0 * deviation).min(MAX_QUALITY)
}

/// Points for tests and CI.
pub fn readiness_score(has_tests: bool, has_ci: bool) -> f64 {
    let tests = if has_tests { TESTS_POINTS } else { 0.0 };
    let ci = if has_ci { CI_POINTS } else { 0.0 };
    tests + ci
}

/// One point per 300 encoded README characters, capped at 15.
pub fn docs_score(readme_content_length: Option<usize>) -> f64 {
    let Some(length) = readme_content_length else {
        return 0.0;
    };
    ((length / README_CHARS_PER_POINT) as f64).min(MAX_DOCS)
}

/// Round to one decimal digit.
///
/// Rounds the exact binary value, breaking exact ties to even, so `59.25`
/// becomes `59.2` and `0.15` (stored just below) becomes `0.1`.
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_is_zero_for_empty_tree() {
        assert_eq!(structure_score(0, 0), 0.0);
    }

    #[test]
    fn structure_stays_within_bounds() {
        for tree_size in [0, 1, 10, 100, 10_000, 1_000_000] {
            for class_count in [0, 3, 50] {
                let score = structure_score(tree_size, class_count);
                assert!((0.0..=MAX_STRUCTURE).contains(&score), "{score}");
            }
        }
        assert_eq!(structure_score(1_000, 0), MAX_STRUCTURE);
    }

    #[test]
    fn structure_adds_classes_before_cap() {
        let base = 10.0 * 2f64.ln();
        assert!((structure_score(1, 2) - (base + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn quality_peaks_at_ideal_size() {
        assert_eq!(quality_score(12.0), 30.0);
        assert_eq!(quality_score(11.0), 28.0);
        assert_eq!(quality_score(13.0), 28.0);
        assert_eq!(quality_score(0.0), 6.0);
    }

    #[test]
    fn quality_is_not_floored() {
        assert_eq!(quality_score(32.0), -10.0);
        assert_eq!(quality_score(-8.0), -10.0);
    }

    #[test]
    fn readiness_takes_fixed_values() {
        assert_eq!(readiness_score(false, false), 0.0);
        assert_eq!(readiness_score(true, false), 10.0);
        assert_eq!(readiness_score(false, true), 15.0);
        assert_eq!(readiness_score(true, true), 25.0);
    }

    #[test]
    fn docs_uses_integer_division_and_cap() {
        assert_eq!(docs_score(None), 0.0);
        assert_eq!(docs_score(Some(299)), 0.0);
        assert_eq!(docs_score(Some(900)), 3.0);
        assert_eq!(docs_score(Some(2_699)), 8.0);
        assert_eq!(docs_score(Some(1_000_000)), MAX_DOCS);
    }

    #[test]
    fn end_to_end_breakdown() {
        let breakdown = score(&ScoreInputs {
            tree_size: 50,
            class_count: 2,
            avg_function_body_length: 12.0,
            has_tests: true,
            has_ci: false,
            readme_content_length: Some(900),
        });

        assert_eq!(breakdown.structure, 30.0);
        assert_eq!(breakdown.quality, 30.0);
        assert_eq!(breakdown.readiness, 10.0);
        assert_eq!(breakdown.docs, 3.0);
        assert_eq!(breakdown.total, 73.0);
    }

    #[test]
    fn total_can_drop_below_other_terms() {
        let breakdown = score(&ScoreInputs {
            avg_function_body_length: 40.0,
            ..ScoreInputs::default()
        });
        assert_eq!(breakdown.quality, -26.0);
        assert_eq!(breakdown.total, -26.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round_one_decimal(41.94), 41.9);
        assert_eq!(round_one_decimal(56.5), 56.5);
        assert_eq!(round_one_decimal(7.25), 7.2);
        assert_eq!(round_one_decimal(7.35), 7.3);
        assert_eq!(round_one_decimal(-26.04), -26.0);
    }

    #[test]
    fn total_breaks_exact_ties_to_even() {
        let breakdown = score(&ScoreInputs {
            tree_size: 5_000,
            avg_function_body_length: 12.375,
            ..ScoreInputs::default()
        });
        assert_eq!(breakdown.structure, 30.0);
        assert_eq!(breakdown.quality, 29.25);
        assert_eq!(breakdown.total, 59.2);
    }
}
