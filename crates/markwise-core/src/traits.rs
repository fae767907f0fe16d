//! Core trait definitions for grammar checkers and word tokenizers.
//!
//! Grammar backends are implemented by the `markwise-grammar` crate; the
//! default tokenizer lives in [`crate::text`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Grammar checker trait
// ---------------------------------------------------------------------------

/// Trait for backends that find grammar issues in a piece of text.
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    /// Human-readable backend name (e.g. "languagetool").
    fn name(&self) -> &str;

    /// Return every issue found in `text`.
    ///
    /// Backend failures should be reported as [`crate::error::GrammarError`]
    /// so callers can classify them.
    async fn check(&self, text: &str) -> anyhow::Result<Vec<GrammarIssue>>;
}

/// A grammar issue anchored to a span of the checked text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarIssue {
    /// Start of the span, in characters.
    pub offset: usize,
    /// Length of the span, in characters.
    pub length: usize,
    /// Explanation of the problem.
    pub message: String,
    /// Suggested replacements, best first.
    #[serde(default)]
    pub replacements: Vec<String>,
    /// Identifier of the rule that fired.
    #[serde(default)]
    pub rule_id: String,
}

// ---------------------------------------------------------------------------
// Tokenizer trait
// ---------------------------------------------------------------------------

/// Trait for splitting natural-language text into word tokens.
pub trait WordTokenizer: Send + Sync {
    /// Ordered word tokens of `text`, punctuation excluded.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Applying corrections
// ---------------------------------------------------------------------------

/// Apply the first suggested replacement of every issue to `text`.
///
/// Issues without replacements, spans past the end of the text, and spans
/// overlapping an earlier applied issue are skipped.
pub fn apply_corrections(text: &str, issues: &[GrammarIssue]) -> String {
    let chars: Vec<char> = text.chars().collect();

    let mut ordered: Vec<&GrammarIssue> = issues
        .iter()
        .filter(|i| !i.replacements.is_empty())
        .collect();
    ordered.sort_by_key(|i| (i.offset, i.length));

    let mut corrected = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for issue in ordered {
        let end = issue.offset + issue.length;
        if issue.offset < cursor || end > chars.len() {
            continue;
        }
        corrected.extend(&chars[cursor..issue.offset]);
        corrected.push_str(&issue.replacements[0]);
        cursor = end;
    }

    corrected.extend(&chars[cursor..]);
    corrected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(offset: usize, length: usize, replacement: &str) -> GrammarIssue {
        GrammarIssue {
            offset,
            length,
            message: "test".into(),
            replacements: vec![replacement.into()],
            rule_id: "TEST".into(),
        }
    }

    #[test]
    fn applies_single_replacement() {
        let text = "She were here.";
        let corrected = apply_corrections(text, &[issue(4, 4, "was")]);
        assert_eq!(corrected, "She was here.");
    }

    #[test]
    fn applies_multiple_out_of_order() {
        let text = "i think it it works";
        let issues = vec![issue(8, 5, "it"), issue(0, 1, "I")];
        assert_eq!(apply_corrections(text, &issues), "I think it works");
    }

    #[test]
    fn skips_overlapping_and_empty() {
        let text = "abcdef";
        let mut no_fix = issue(0, 1, "x");
        no_fix.replacements.clear();
        let issues = vec![no_fix, issue(1, 3, "X"), issue(2, 2, "Y")];
        assert_eq!(apply_corrections(text, &issues), "aXef");
    }

    #[test]
    fn skips_out_of_range() {
        let text = "short";
        assert_eq!(apply_corrections(text, &[issue(3, 10, "!")]), "short");
    }

    #[test]
    fn character_offsets_handle_multibyte() {
        let text = "café are nice";
        assert_eq!(apply_corrections(text, &[issue(5, 3, "is")]), "café is nice");
    }

    #[test]
    fn no_issues_returns_input() {
        assert_eq!(apply_corrections("Fine text.", &[]), "Fine text.");
    }
}
