//! Splitting extracted answer-sheet text into per-question answers.
//!
//! Upstream extraction produces one block of text per sheet, with each
//! answer terminated by a literal `END` marker.

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::Submission;

/// Marker separating consecutive answers.
pub const ANSWER_DELIMITER: &str = "END";

/// Split `text` on the answer delimiter, trimming pieces and dropping empty ones.
pub fn split_answers(text: &str) -> Vec<String> {
    text.split(ANSWER_DELIMITER)
        .map(str::trim)
        .filter(|answer| !answer.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a submission from extracted sheet text.
pub fn submission_from_text(text: &str) -> Submission {
    Submission::new(split_answers(text))
}

/// Read extracted text from a file and build a submission.
pub fn load_submission(path: &Path) -> Result<Submission> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    let submission = submission_from_text(&text);
    tracing::debug!(
        "loaded {} answers from {}",
        submission.answers.len(),
        path.display()
    );
    Ok(submission)
}
