//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionBank};

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(default)]
    prompt: String,
    max_marks: f64,
    #[serde(default)]
    length_based: bool,
    #[serde(default)]
    references: Vec<String>,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank file: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            prompt: q.prompt,
            references: q.references,
            max_marks: q.max_marks,
            length_based: q.length_based,
        })
        .collect();

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` question bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank from a file, or the single bank in a directory.
pub fn load_question_bank(path: &Path) -> Result<QuestionBank> {
    if !path.is_dir() {
        return parse_question_bank(path);
    }
    let mut banks = load_bank_directory(path)?;
    match banks.len() {
        1 => Ok(banks.remove(0)),
        0 => anyhow::bail!("no question banks found in {}", path.display()),
        n => anyhow::bail!(
            "{} contains {n} question banks; pass a single bank file",
            path.display()
        ),
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common issues.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
    }

    // Check for duplicate question IDs
    let mut seen_ids = HashSet::new();
    for question in &bank.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &bank.questions {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message,
            })
        };

        if question.references.is_empty() {
            warn("no reference answers; this question cannot be graded".into());
        }

        if !question.max_marks.is_finite() || question.max_marks <= 0.0 {
            warn(format!("max_marks must be positive, got {}", question.max_marks));
        }

        let mut seen_refs = HashSet::new();
        for (i, reference) in question.references.iter().enumerate() {
            if reference.trim().is_empty() {
                warn(format!("reference {} is blank", i + 1));
            } else if !seen_refs.insert(reference.trim()) {
                warn(format!("reference {} duplicates an earlier reference", i + 1));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "os-basics"
name = "Operating Systems Basics"
description = "Introductory OS questions"

[[questions]]
id = "Q1"
prompt = "What is an operating system?"
max_marks = 2
references = [
    "An OS is software that provides a platform for running applications and managing hardware resources.",
    "The operating system acts as an intermediary between users and the computer hardware.",
]

[[questions]]
id = "Q2"
prompt = "List applications of an operating system."
max_marks = 8
length_based = true
references = ["The OS serves to manage computer resources, run applications, and provide security."]
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_question_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.id, "os-basics");
        assert_eq!(bank.name, "Operating Systems Basics");
        assert_eq!(bank.questions.len(), 2);
        assert_eq!(bank.questions[0].references.len(), 2);
        assert_eq!(bank.questions[0].max_marks, 2.0);
        assert!(!bank.questions[0].length_based);
        assert!(bank.questions[1].length_based);
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[bank]
id = "minimal"
name = "Minimal"

[[questions]]
id = "Q1"
max_marks = 1.5
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert!(bank.description.is_empty());
        assert!(bank.questions[0].prompt.is_empty());
        assert!(bank.questions[0].references.is_empty());
        assert!(!bank.questions[0].length_based);
    }

    #[test]
    fn validate_duplicate_ids() {
        let toml = r#"
[bank]
id = "dupes"
name = "Dupes"

[[questions]]
id = "same"
max_marks = 1
references = ["a"]

[[questions]]
id = "same"
max_marks = 1
references = ["b"]
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_question_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate question ID")));
    }

    #[test]
    fn validate_reference_problems() {
        let toml = r#"
[bank]
id = "refs"
name = "Refs"

[[questions]]
id = "empty"
max_marks = 1

[[questions]]
id = "blank"
max_marks = 0
references = ["ok", "  ", "ok"]
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_question_bank(&bank);
        let messages: Vec<(&str, &str)> = warnings
            .iter()
            .map(|w| (w.question_id.as_deref().unwrap_or(""), w.message.as_str()))
            .collect();
        assert!(messages
            .iter()
            .any(|(id, m)| *id == "empty" && m.contains("no reference answers")));
        assert!(messages
            .iter()
            .any(|(id, m)| *id == "blank" && m.contains("must be positive")));
        assert!(messages.iter().any(|(_, m)| m.contains("reference 2 is blank")));
        assert!(messages.iter().any(|(_, m)| m.contains("reference 3 duplicates")));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_question_bank_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn parse_requires_max_marks() {
        let toml = r#"
[bank]
id = "x"
name = "X"

[[questions]]
id = "Q1"
references = ["a"]
"#;
        assert!(parse_question_bank_str(toml, &PathBuf::from("x.toml")).is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "not toml {").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].id, "os-basics");

        let bank = load_question_bank(dir.path()).unwrap();
        assert_eq!(bank.id, "os-basics");
    }

    #[test]
    fn load_directory_rejects_ambiguous_bank() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("b.toml"), VALID_TOML).unwrap();
        assert!(load_question_bank(dir.path()).is_err());
    }
}
