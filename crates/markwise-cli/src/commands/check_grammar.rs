//! The `markwise check-grammar` command.

use std::path::PathBuf;

use anyhow::Result;

use markwise_core::grammar::assess_grammar;
use markwise_grammar::config::{create_checker, load_config_from};

pub async fn execute(
    text: String,
    checker: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let name = checker.unwrap_or_else(|| config.default_checker.clone());
    let grammar = create_checker(&name, &config)?;

    let assessment = assess_grammar(
        grammar.as_ref(),
        &text,
        config.evaluator_config().grammar_timeout,
    )
    .await;

    println!("Checker: {}", grammar.name());
    println!("Grammar score: {:.3}", assessment.score);

    if let Some(warning) = &assessment.warning {
        println!("Warning: {warning}");
    }

    if assessment.issues.is_empty() {
        println!("No issues found.");
    } else {
        println!("\n{} issue(s):", assessment.issues.len());
        for issue in &assessment.issues {
            let span: String = text
                .chars()
                .skip(issue.offset)
                .take(issue.length)
                .collect();
            let suggestion = issue
                .replacements
                .first()
                .map(|r| format!(" -> '{r}'"))
                .unwrap_or_default();
            println!(
                "  [{}] '{}'{}: {}",
                issue.rule_id, span, suggestion, issue.message
            );
        }
    }

    println!("\nCorrected: {}", assessment.corrected_text);

    Ok(())
}
