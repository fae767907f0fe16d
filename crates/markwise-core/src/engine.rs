//! Central answer-evaluation engine.
//!
//! Scores a candidate answer against every reference answer of a question,
//! keeps the best-scoring reference, and grades whole submissions question
//! by question.

use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::error::EvalError;
use crate::gaps::GapDetector;
use crate::grammar::assess_grammar;
use crate::model::{is_unattempted, EvaluationResult, Question, QuestionBank, Submission};
use crate::report::{BankSummary, QuestionOutcome, QuestionReport, SubmissionReport};
use crate::similarity::similarity;
use crate::text::KeyPhraseExtractor;
use crate::traits::{GrammarChecker, WordTokenizer};

/// Share of the marks awarded for textual similarity.
pub const SIMILARITY_WEIGHT: f64 = 0.4;
/// Share of the marks awarded for grammatical correctness.
pub const GRAMMAR_WEIGHT: f64 = 0.2;
/// Share of the marks awarded for answer length.
pub const LENGTH_WEIGHT: f64 = 0.1;

/// Configuration for the evaluator.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Upper bound on a single grammar check.
    pub grammar_timeout: Duration,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            grammar_timeout: Duration::from_secs(10),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_question_start(&self, question_id: &str);
    fn on_question_complete(&self, question_id: &str, result: &EvaluationResult);
    fn on_question_error(&self, question_id: &str, error: &str);
    fn on_submission_complete(&self, graded: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_question_start(&self, _: &str) {}
    fn on_question_complete(&self, _: &str, _: &EvaluationResult) {}
    fn on_question_error(&self, _: &str, _: &str) {}
    fn on_submission_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// Unweighted scores of a candidate against one reference.
#[derive(Debug, Clone)]
struct ReferenceScore {
    index: usize,
    similarity: f64,
    length: f64,
    raw_total: f64,
    mistakes: Vec<String>,
}

/// Length adequacy of `candidate` relative to `reference`, capped at 1.
///
/// An empty reference is always matched.
pub fn length_ratio(candidate: &str, reference: &str) -> f64 {
    let reference_len = reference.chars().count();
    if reference_len == 0 {
        return 1.0;
    }
    (candidate.chars().count() as f64 / reference_len as f64).min(1.0)
}

/// The answer evaluator.
///
/// Holds the grammar and tokenizer capabilities for the lifetime of the
/// process; evaluations themselves are stateless.
pub struct AnswerEvaluator {
    grammar: Arc<dyn GrammarChecker>,
    gaps: GapDetector,
    config: EvaluatorConfig,
}

impl AnswerEvaluator {
    pub fn new(
        grammar: Arc<dyn GrammarChecker>,
        tokenizer: Arc<dyn WordTokenizer>,
        config: EvaluatorConfig,
    ) -> Self {
        Self {
            grammar,
            gaps: GapDetector::new(KeyPhraseExtractor::new(tokenizer)),
            config,
        }
    }

    /// Name of the grammar backend in use.
    pub fn grammar_checker(&self) -> &str {
        self.grammar.name()
    }

    /// Score `candidate` against `references` and keep the best reference.
    ///
    /// The winning reference is the first one with the strictly greatest raw
    /// total. Fails when there are no references to compare against or when
    /// `max_marks` is negative or not finite.
    pub async fn evaluate(
        &self,
        candidate: &str,
        references: &[String],
        max_marks: f64,
        length_based: bool,
    ) -> Result<EvaluationResult, EvalError> {
        self.evaluate_for("<unnamed>", candidate, references, max_marks, length_based)
            .await
    }

    /// Evaluate `candidate` against a configured question.
    pub async fn evaluate_question(
        &self,
        question: &Question,
        candidate: &str,
    ) -> Result<EvaluationResult, EvalError> {
        self.evaluate_for(
            &question.id,
            candidate,
            &question.references,
            question.max_marks,
            question.length_based,
        )
        .await
    }

    async fn evaluate_for(
        &self,
        question_id: &str,
        candidate: &str,
        references: &[String],
        max_marks: f64,
        length_based: bool,
    ) -> Result<EvaluationResult, EvalError> {
        if is_unattempted(candidate) {
            return Ok(EvaluationResult::unattempted());
        }
        if !max_marks.is_finite() || max_marks < 0.0 {
            return Err(EvalError::InvalidMarks {
                question_id: question_id.to_string(),
                max_marks,
            });
        }
        if references.is_empty() {
            return Err(EvalError::MissingConfiguration {
                question_id: question_id.to_string(),
            });
        }

        // Grammar depends only on the candidate.
        let grammar = assess_grammar(self.grammar.as_ref(), candidate, self.config.grammar_timeout).await;
        let candidate_terms = self.gaps.extractor().extract(candidate);

        let best = references
            .iter()
            .enumerate()
            .map(|(index, reference)| {
                let similarity = similarity(candidate, reference);
                let length = if length_based {
                    length_ratio(candidate, reference)
                } else {
                    1.0
                };
                let raw_total = (similarity * SIMILARITY_WEIGHT
                    + grammar.score * GRAMMAR_WEIGHT
                    + length * LENGTH_WEIGHT)
                    * max_marks;
                tracing::debug!(question_id, index, similarity, length, raw_total, "scored reference");
                ReferenceScore {
                    index,
                    similarity,
                    length,
                    raw_total,
                    mistakes: self.gaps.missing_parts_from(&candidate_terms, reference),
                }
            })
            .reduce(|best, next| {
                if next.raw_total > best.raw_total {
                    next
                } else {
                    best
                }
            })
            .ok_or_else(|| EvalError::MissingConfiguration {
                question_id: question_id.to_string(),
            })?;

        Ok(EvaluationResult {
            total_score: best.raw_total,
            similarity_score: best.similarity * SIMILARITY_WEIGHT * max_marks,
            grammar_score: grammar.score * GRAMMAR_WEIGHT * max_marks,
            length_score: if length_based {
                best.length * LENGTH_WEIGHT * max_marks
            } else {
                0.0
            },
            mistakes: best.mistakes,
            matched_reference: Some(best.index),
            corrected_text: grammar.corrected_text,
            warnings: grammar.warning.into_iter().collect(),
        })
    }

    /// Grade every question of `bank` against the positionally matching answer.
    ///
    /// A failing question is recorded and never stops the remaining ones.
    pub async fn evaluate_submission(
        &self,
        bank: &QuestionBank,
        submission: &Submission,
        progress: &dyn ProgressReporter,
    ) -> SubmissionReport {
        let start = Instant::now();

        if submission.answers.len() > bank.questions.len() {
            tracing::warn!(
                "submission {} has {} answers for {} questions; ignoring the extras",
                submission.id,
                submission.answers.len(),
                bank.questions.len()
            );
        }

        let mut questions = Vec::with_capacity(bank.questions.len());
        let mut graded = 0usize;
        let mut failed = 0usize;

        for (position, question) in bank.questions.iter().enumerate() {
            let outcome = match submission.answers.get(position) {
                None => QuestionOutcome::NoAnswer,
                Some(candidate) => {
                    progress.on_question_start(&question.id);
                    match self.evaluate_question(question, candidate).await {
                        Ok(result) => {
                            progress.on_question_complete(&question.id, &result);
                            graded += 1;
                            QuestionOutcome::Graded { result }
                        }
                        Err(e) => {
                            tracing::error!("evaluation failed for {}: {e}", question.id);
                            progress.on_question_error(&question.id, &e.to_string());
                            failed += 1;
                            QuestionOutcome::Failed {
                                error: e.to_string(),
                            }
                        }
                    }
                }
            };

            questions.push(QuestionReport {
                question_id: question.id.clone(),
                max_marks: question.max_marks,
                candidate: submission.answers.get(position).cloned(),
                outcome,
            });
        }

        let elapsed = start.elapsed();
        progress.on_submission_complete(graded, failed, elapsed);

        let report = SubmissionReport {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            submission_id: submission.id,
            bank: BankSummary {
                id: bank.id.clone(),
                name: bank.name.clone(),
                question_count: bank.questions.len(),
                total_marks: bank.total_marks(),
            },
            grammar_checker: self.grammar.name().to_string(),
            answers: submission.answers.clone(),
            questions,
            duration_ms: elapsed.as_millis() as u64,
        };
        tracing::info!(
            "graded submission {}: {:.2}/{:.2}",
            submission.id,
            report.total_score(),
            report.bank.total_marks
        );
        report
    }
}
