//! The `markwise reevaluate` command.

use std::path::PathBuf;

use anyhow::Result;

use markwise_core::model::Submission;
use markwise_core::parser::load_question_bank;
use markwise_core::report::SubmissionReport;
use markwise_grammar::config::load_config_from;

use super::compare::print_text;
use super::grade::{build_evaluator, print_summary, write_outputs, ConsoleReporter};

pub async fn execute(
    report_path: PathBuf,
    bank_path: PathBuf,
    checker: Option<String>,
    output: Option<PathBuf>,
    threshold: f64,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let config = load_config_from(config_path.as_deref())?;
    let previous = SubmissionReport::load_json(&report_path)?;
    let bank = load_question_bank(&bank_path)?;

    if previous.bank.id != bank.id {
        tracing::warn!(
            "report was graded against bank '{}' but re-grading against '{}'",
            previous.bank.id,
            bank.id
        );
    }

    let submission = Submission {
        id: previous.submission_id,
        created_at: chrono::Utc::now(),
        answers: previous.answers.clone(),
    };

    let evaluator = build_evaluator(&config, checker.as_deref())?;
    eprintln!(
        "Re-grading {} stored answers against '{}' (grammar: {})\n",
        submission.answers.len(),
        bank.name,
        evaluator.grammar_checker()
    );

    let report = evaluator
        .evaluate_submission(&bank, &submission, &ConsoleReporter)
        .await;

    print_summary(&report);

    let changes = report.compare(&previous, threshold);
    println!();
    print_text(&changes);

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    write_outputs(&report, &output, "json")?;

    Ok(())
}
