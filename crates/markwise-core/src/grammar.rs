//! Grammar scoring on top of a [`GrammarChecker`] backend.
//!
//! A failing or slow backend never aborts an evaluation: the assessment falls
//! back to a zero score with the original text and carries a warning.

use std::time::Duration;

use crate::error::GrammarError;
use crate::traits::{apply_corrections, GrammarChecker, GrammarIssue};

/// Outcome of checking one candidate answer.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarAssessment {
    /// `1 - issues / characters`, or 0 for empty text and backend failures.
    pub score: f64,
    /// Text with suggestions applied; the original text on failure.
    pub corrected_text: String,
    /// Issues reported by the backend.
    pub issues: Vec<GrammarIssue>,
    /// Set when the backend failed or timed out.
    pub warning: Option<String>,
}

impl GrammarAssessment {
    fn failed(text: &str, warning: String) -> Self {
        Self {
            score: 0.0,
            corrected_text: text.to_string(),
            issues: Vec::new(),
            warning: Some(warning),
        }
    }
}

/// Grammar score for `issue_count` issues in `text`.
///
/// Empty text scores 0. The score never drops below 0.
pub fn grammar_score(text: &str, issue_count: usize) -> f64 {
    let length = text.chars().count();
    if length == 0 {
        return 0.0;
    }
    (1.0 - issue_count as f64 / length as f64).max(0.0)
}

/// Check `text` with `checker`, bounded by `timeout`.
pub async fn assess_grammar(
    checker: &dyn GrammarChecker,
    text: &str,
    timeout: Duration,
) -> GrammarAssessment {
    if text.is_empty() {
        return GrammarAssessment {
            score: 0.0,
            corrected_text: String::new(),
            issues: Vec::new(),
            warning: None,
        };
    }

    let outcome = match tokio::time::timeout(timeout, checker.check(text)).await {
        Ok(result) => result,
        Err(_) => Err(GrammarError::Timeout(timeout.as_secs()).into()),
    };

    match outcome {
        Ok(issues) => {
            tracing::debug!(
                checker = checker.name(),
                issues = issues.len(),
                "grammar check complete"
            );
            GrammarAssessment {
                score: grammar_score(text, issues.len()),
                corrected_text: apply_corrections(text, &issues),
                issues,
                warning: None,
            }
        }
        Err(e) => {
            let reason = match e.downcast_ref::<GrammarError>() {
                Some(grammar_err) => grammar_err.to_string(),
                None => GrammarError::Unavailable(format!("{e:#}")).to_string(),
            };
            tracing::warn!(checker = checker.name(), "grammar check failed: {reason}");
            GrammarAssessment::failed(
                text,
                format!(
                    "grammar check via '{}' failed ({reason}); grammar marks set to 0",
                    checker.name()
                ),
            )
        }
    }
}
