//! Core data model types for markwise.
//!
//! These are the fundamental types the grading pipeline uses to represent
//! questions, question banks, submissions, and per-question results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel a candidate answer carries when the student wrote nothing.
pub const UNATTEMPTED_SENTINEL: &str = "UNATTEMPTED";

/// Mistake entry reported for an unattempted answer.
pub const UNATTEMPTED_MISTAKE: &str = "Unattempted";

/// A single question with its acceptable reference answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier (e.g. "Q1").
    pub id: String,
    /// The question text shown to students.
    #[serde(default)]
    pub prompt: String,
    /// Equally valid canonical answers, in configuration order.
    #[serde(default)]
    pub references: Vec<String>,
    /// Maximum achievable marks.
    pub max_marks: f64,
    /// Whether answer length relative to the reference contributes to the score.
    #[serde(default)]
    pub length_based: bool,
}

/// A collection of questions graded together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this bank.
    #[serde(default)]
    pub description: String,
    /// Questions in the order answers are expected.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Sum of the maximum marks of every question.
    pub fn total_marks(&self) -> f64 {
        self.questions.iter().map(|q| q.max_marks).sum()
    }
}

/// Returns `true` if `text` is the unattempted sentinel (case-insensitive, trimmed).
pub fn is_unattempted(text: &str) -> bool {
    text.trim().to_uppercase() == UNATTEMPTED_SENTINEL
}

/// One student's ordered answers, one per question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique submission identifier.
    pub id: Uuid,
    /// When the answers were received.
    pub created_at: DateTime<Utc>,
    /// Candidate answers in question order.
    pub answers: Vec<String>,
}

impl Submission {
    pub fn new(answers: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            answers,
        }
    }
}

/// The scored outcome of evaluating one candidate answer.
///
/// Sub-scores are already weighted and scaled by the question's marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Total awarded marks.
    pub total_score: f64,
    /// Marks from textual similarity.
    pub similarity_score: f64,
    /// Marks from grammatical correctness.
    pub grammar_score: f64,
    /// Marks from answer length (zero unless the question is length-based).
    pub length_score: f64,
    /// Human-readable deficiencies.
    pub mistakes: Vec<String>,
    /// Index of the reference answer that produced the best score.
    #[serde(default)]
    pub matched_reference: Option<usize>,
    /// Candidate text with grammar suggestions applied.
    #[serde(default)]
    pub corrected_text: String,
    /// Recoverable problems encountered while scoring.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl EvaluationResult {
    /// The fixed result for an unattempted answer.
    pub fn unattempted() -> Self {
        Self {
            total_score: 0.0,
            similarity_score: 0.0,
            grammar_score: 0.0,
            length_score: 0.0,
            mistakes: vec![UNATTEMPTED_MISTAKE.to_string()],
            matched_reference: None,
            corrected_text: String::new(),
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unattempted_detection() {
        assert!(is_unattempted("UNATTEMPTED"));
        assert!(is_unattempted("  unattempted\n"));
        assert!(is_unattempted("UnAttempted"));
        assert!(!is_unattempted("un attempted"));
        assert!(!is_unattempted(""));
    }

    #[test]
    fn bank_lookup_and_totals() {
        let bank = QuestionBank {
            id: "b".into(),
            name: "Bank".into(),
            description: String::new(),
            questions: vec![
                Question {
                    id: "Q1".into(),
                    prompt: String::new(),
                    references: vec!["a".into()],
                    max_marks: 2.0,
                    length_based: false,
                },
                Question {
                    id: "Q2".into(),
                    prompt: String::new(),
                    references: vec!["b".into()],
                    max_marks: 8.0,
                    length_based: true,
                },
            ],
        };
        assert_eq!(bank.total_marks(), 10.0);
        assert!(bank.question("Q2").unwrap().length_based);
        assert!(bank.question("Q3").is_none());
    }

    #[test]
    fn evaluation_result_serde_roundtrip() {
        let result = EvaluationResult {
            total_score: 1.25,
            similarity_score: 0.5,
            grammar_score: 0.4,
            length_score: 0.0,
            mistakes: vec!["Missing part: 'kernel'".into()],
            matched_reference: Some(2),
            corrected_text: "An OS.".into(),
            warnings: vec![],
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: EvaluationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
