//! Offline rule-based grammar checker.
//!
//! Catches a handful of mechanical mistakes without any network access.
//! Useful when no LanguageTool server is available, and in tests.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;

use markwise_core::traits::{GrammarChecker, GrammarIssue};

/// Rule-based grammar checker.
pub struct BasicGrammarChecker {
    word: Regex,
    sentence_start: Regex,
    lone_i: Regex,
    double_space: Regex,
    space_before_punct: Regex,
}

impl BasicGrammarChecker {
    pub fn new() -> Result<Self> {
        Ok(Self {
            word: Regex::new(r"\w+")?,
            sentence_start: Regex::new(r"(?:^\s*|[.!?]\s+)(\p{Ll})")?,
            lone_i: Regex::new(r"\bi\b")?,
            double_space: Regex::new(r" {2,}")?,
            space_before_punct: Regex::new(r"[ \t]+[,.;:!?]")?,
        })
    }

    fn find_issues(&self, text: &str) -> Vec<GrammarIssue> {
        let to_chars = |byte: usize| text[..byte].chars().count();
        let mut issues = Vec::new();

        let words: Vec<regex::Match<'_>> = self.word.find_iter(text).collect();
        for pair in words.windows(2) {
            let (first, second) = (pair[0], pair[1]);
            let gap = &text[first.end()..second.start()];
            if !gap.is_empty()
                && gap.chars().all(char::is_whitespace)
                && first.as_str().to_lowercase() == second.as_str().to_lowercase()
            {
                issues.push(GrammarIssue {
                    offset: to_chars(first.end()),
                    length: to_chars(second.end()) - to_chars(first.end()),
                    message: format!("Possible typo: '{}' is repeated.", second.as_str()),
                    replacements: vec![String::new()],
                    rule_id: "REPEATED_WORD".into(),
                });
            }
        }

        for caps in self.sentence_start.captures_iter(text) {
            let Some(letter) = caps.get(1) else { continue };
            issues.push(GrammarIssue {
                offset: to_chars(letter.start()),
                length: 1,
                message: "This sentence does not start with an uppercase letter.".into(),
                replacements: vec![letter.as_str().to_uppercase()],
                rule_id: "UPPERCASE_SENTENCE_START".into(),
            });
        }

        for m in self.lone_i.find_iter(text) {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            if before == Some('.') || after == Some('.') {
                continue;
            }
            issues.push(GrammarIssue {
                offset: to_chars(m.start()),
                length: 1,
                message: "The personal pronoun 'I' should be uppercase.".into(),
                replacements: vec!["I".into()],
                rule_id: "I_LOWERCASE".into(),
            });
        }

        for m in self.double_space.find_iter(text) {
            issues.push(GrammarIssue {
                offset: to_chars(m.start()),
                length: m.as_str().len(),
                message: "Possible typo: you repeated a whitespace.".into(),
                replacements: vec![" ".into()],
                rule_id: "WHITESPACE_RULE".into(),
            });
        }

        for m in self.space_before_punct.find_iter(text) {
            // The match ends with one ASCII punctuation byte.
            let spaces = m.as_str().len() - 1;
            issues.push(GrammarIssue {
                offset: to_chars(m.start()),
                length: spaces,
                message: "Don't put a space before punctuation.".into(),
                replacements: vec![String::new()],
                rule_id: "PUNCTUATION_SPACING".into(),
            });
        }

        issues.sort_by_key(|i| (i.offset, i.length));
        issues.dedup_by_key(|i| (i.offset, i.length));
        issues
    }
}

#[async_trait]
impl GrammarChecker for BasicGrammarChecker {
    fn name(&self) -> &str {
        "basic"
    }

    async fn check(&self, text: &str) -> anyhow::Result<Vec<GrammarIssue>> {
        let issues = self.find_issues(text);
        tracing::debug!(issues = issues.len(), "basic grammar check complete");
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markwise_core::traits::apply_corrections;

    fn rules(text: &str) -> Vec<String> {
        BasicGrammarChecker::new()
            .unwrap()
            .find_issues(text)
            .into_iter()
            .map(|i| i.rule_id)
            .collect()
    }

    #[test]
    fn clean_text_has_no_issues() {
        assert!(rules("The kernel manages memory. It also schedules processes.").is_empty());
    }

    #[test]
    fn flags_each_rule() {
        assert_eq!(rules("The the kernel."), vec!["REPEATED_WORD"]);
        assert_eq!(rules("the kernel."), vec!["UPPERCASE_SENTENCE_START"]);
        assert_eq!(rules("It works. then it stops."), vec!["UPPERCASE_SENTENCE_START"]);
        assert_eq!(rules("Now i know."), vec!["I_LOWERCASE"]);
        assert_eq!(rules("Two  spaces."), vec!["WHITESPACE_RULE"]);
        assert_eq!(rules("Done ."), vec!["PUNCTUATION_SPACING"]);
    }

    #[test]
    fn abbreviation_i_e_is_not_a_pronoun() {
        assert!(rules("Memory, i.e. RAM, is volatile.").is_empty());
    }

    #[test]
    fn sentence_start_and_pronoun_are_reported_once() {
        let checker = BasicGrammarChecker::new().unwrap();
        let issues = checker.find_issues("i think so.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].offset, 0);
    }

    #[test]
    fn offsets_are_in_characters() {
        let checker = BasicGrammarChecker::new().unwrap();
        let issues = checker.find_issues("Café  open.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].offset, 4);
        assert_eq!(issues[0].length, 2);
    }

    #[test]
    fn corrections_fix_the_text() {
        let checker = BasicGrammarChecker::new().unwrap();
        let text = "the the OS manages  memory , and i like it.";
        let issues = checker.find_issues(text);
        assert_eq!(issues.len(), 5);
        assert_eq!(
            apply_corrections(text, &issues),
            "The OS manages memory, and I like it."
        );
    }
}
