//! Submission report types with JSON persistence and score-change detection.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::EvaluationResult;

/// A complete graded submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The submission that was graded.
    pub submission_id: Uuid,
    /// Summary of the question bank.
    pub bank: BankSummary,
    /// Grammar backend used for this run.
    pub grammar_checker: String,
    /// Candidate answers as graded, in question order.
    pub answers: Vec<String>,
    /// Per-question outcomes, in bank order.
    pub questions: Vec<QuestionReport>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a question bank (without the reference answers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
    pub total_marks: f64,
}

/// Outcome for one question of a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReport {
    pub question_id: String,
    pub max_marks: f64,
    /// The candidate answer, if the submission had one for this question.
    #[serde(default)]
    pub candidate: Option<String>,
    #[serde(flatten)]
    pub outcome: QuestionOutcome,
}

/// How a question's evaluation ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuestionOutcome {
    /// Scored successfully.
    Graded { result: EvaluationResult },
    /// Could not be scored; other questions are unaffected.
    Failed { error: String },
    /// The submission had no answer at this position.
    NoAnswer,
}

impl QuestionReport {
    /// Awarded marks; zero unless graded.
    pub fn score(&self) -> f64 {
        match &self.outcome {
            QuestionOutcome::Graded { result } => result.total_score,
            _ => 0.0,
        }
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        match &self.outcome {
            QuestionOutcome::Graded { result } => Some(result),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, QuestionOutcome::Failed { .. })
    }
}

impl SubmissionReport {
    /// Sum of awarded marks across questions.
    pub fn total_score(&self) -> f64 {
        self.questions.iter().map(QuestionReport::score).sum()
    }

    /// Questions that could not be scored.
    pub fn failed_questions(&self) -> impl Iterator<Item = &QuestionReport> {
        self.questions.iter().filter(|q| q.is_failed())
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SubmissionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline, question by question.
    ///
    /// Changes no larger than `threshold` marks count as unchanged.
    pub fn compare(&self, baseline: &SubmissionReport, threshold: f64) -> ScoreChangeReport {
        let mut drops = Vec::new();
        let mut gains = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        for current in &self.questions {
            let Some(before) = baseline
                .questions
                .iter()
                .find(|q| q.question_id == current.question_id)
            else {
                new_questions += 1;
                continue;
            };

            let change = ScoreChange {
                question_id: current.question_id.clone(),
                baseline_score: before.score(),
                current_score: current.score(),
                delta: current.score() - before.score(),
            };
            if change.delta < -threshold {
                drops.push(change);
            } else if change.delta > threshold {
                gains.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_questions = baseline
            .questions
            .iter()
            .filter(|b| !self.questions.iter().any(|q| q.question_id == b.question_id))
            .count();

        ScoreChangeReport {
            baseline_total: baseline.total_score(),
            current_total: self.total_score(),
            drops,
            gains,
            unchanged,
            new_questions,
            removed_questions,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChangeReport {
    pub baseline_total: f64,
    pub current_total: f64,
    /// Questions whose score went down.
    pub drops: Vec<ScoreChange>,
    /// Questions whose score went up.
    pub gains: Vec<ScoreChange>,
    /// Questions with no significant change.
    pub unchanged: usize,
    /// Questions in current but not baseline.
    pub new_questions: usize,
    /// Questions in baseline but not current.
    pub removed_questions: usize,
}

/// A per-question score change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub question_id: String,
    pub baseline_score: f64,
    pub current_score: f64,
    pub delta: f64,
}

impl ScoreChangeReport {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {:.2} -> {:.2} marks; {} drops, {} gains, {} unchanged\n\n",
            self.baseline_total,
            self.current_total,
            self.drops.len(),
            self.gains.len(),
            self.unchanged
        ));

        for (title, changes) in [("Drops", &self.drops), ("Gains", &self.gains)] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Question | Baseline | Current | Delta |\n");
            md.push_str("|----------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:+.2} |\n",
                    c.question_id, c.baseline_score, c.current_score, c.delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if any question lost marks.
    pub fn has_drops(&self) -> bool {
        !self.drops.is_empty()
    }

    /// Returns true if nothing changed beyond the threshold.
    pub fn is_identical(&self) -> bool {
        self.drops.is_empty()
            && self.gains.is_empty()
            && self.new_questions == 0
            && self.removed_questions == 0
    }
}
