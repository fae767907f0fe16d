//! Error types for evaluation and grammar checking.
//!
//! `GrammarError` is defined here rather than in `markwise-grammar` so the
//! evaluator can downcast backend failures and classify them without string
//! matching.

use thiserror::Error;

/// Errors that make a single question impossible to evaluate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// The question has no reference answers to compare against.
    #[error("question '{question_id}' has no reference answers configured")]
    MissingConfiguration { question_id: String },

    /// The question's maximum marks are negative or not a finite number.
    #[error("question '{question_id}' has invalid max marks: {max_marks}")]
    InvalidMarks { question_id: String, max_marks: f64 },
}

/// Errors that can occur when talking to a grammar-checking backend.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// The backend is not reachable or not serving checks.
    #[error("grammar service unavailable: {0}")]
    Unavailable(String),

    /// The check did not complete in time.
    #[error("grammar check timed out after {0}s")]
    Timeout(u64),

    /// The backend returned an error response.
    #[error("grammar API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}
