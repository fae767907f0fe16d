//! The `markwise grade` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use markwise_core::answers::load_submission;
use markwise_core::engine::{AnswerEvaluator, ProgressReporter};
use markwise_core::model::EvaluationResult;
use markwise_core::parser::load_question_bank;
use markwise_core::report::{QuestionOutcome, SubmissionReport};
use markwise_core::text::UnicodeWordTokenizer;
use markwise_grammar::config::{create_checker, load_config_from, MarkwiseConfig};
use markwise_report::html::write_html_report;

/// Console progress reporter.
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_question_start(&self, question_id: &str) {
        eprintln!("  Grading: {question_id}");
    }

    fn on_question_complete(&self, question_id: &str, result: &EvaluationResult) {
        eprintln!(
            "  Done: {question_id} {:.2} marks ({} mistakes)",
            result.total_score,
            result.mistakes.len()
        );
        for warning in &result.warnings {
            eprintln!("    warning: {warning}");
        }
    }

    fn on_question_error(&self, question_id: &str, error: &str) {
        eprintln!("  ERROR: {question_id}: {error}");
    }

    fn on_submission_complete(&self, graded: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {graded} graded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

/// Build an evaluator around the requested (or configured) grammar checker.
pub fn build_evaluator(config: &MarkwiseConfig, checker: Option<&str>) -> Result<AnswerEvaluator> {
    let name = checker.unwrap_or(&config.default_checker);
    let grammar = create_checker(name, config)?;
    Ok(AnswerEvaluator::new(
        grammar,
        Arc::new(UnicodeWordTokenizer),
        config.evaluator_config(),
    ))
}

pub async fn execute(
    bank_path: PathBuf,
    answers_path: PathBuf,
    checker: Option<String>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = load_question_bank(&bank_path)?;
    let submission = load_submission(&answers_path)?;

    let evaluator = build_evaluator(&config, checker.as_deref())?;

    eprintln!(
        "markwise v{}: grading {} answers against '{}' ({} questions, grammar: {})",
        env!("CARGO_PKG_VERSION"),
        submission.answers.len(),
        bank.name,
        bank.questions.len(),
        evaluator.grammar_checker()
    );
    eprintln!();

    let report = evaluator
        .evaluate_submission(&bank, &submission, &ConsoleReporter)
        .await;

    print_summary(&report);

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    write_outputs(&report, &output, &format)?;

    Ok(())
}

/// Save the report in each requested format.
pub fn write_outputs(report: &SubmissionReport, output: &Path, format: &str) -> Result<()> {
    std::fs::create_dir_all(output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

pub fn print_summary(report: &SubmissionReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Question",
        "Score",
        "Max",
        "Similarity",
        "Grammar",
        "Length",
        "Mistakes",
    ]);

    for q in &report.questions {
        let row = match &q.outcome {
            QuestionOutcome::Graded { result } => vec![
                Cell::new(&q.question_id),
                Cell::new(format!("{:.2}", result.total_score)),
                Cell::new(format!("{:.2}", q.max_marks)),
                Cell::new(format!("{:.2}", result.similarity_score)),
                Cell::new(format!("{:.2}", result.grammar_score)),
                Cell::new(format!("{:.2}", result.length_score)),
                Cell::new(result.mistakes.len()),
            ],
            QuestionOutcome::Failed { .. } => vec![
                Cell::new(&q.question_id),
                Cell::new("FAILED"),
                Cell::new(format!("{:.2}", q.max_marks)),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ],
            QuestionOutcome::NoAnswer => vec![
                Cell::new(&q.question_id),
                Cell::new("no answer"),
                Cell::new(format!("{:.2}", q.max_marks)),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ],
        };
        table.add_row(row);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Total: {:.2} / {:.2}",
        report.total_score(),
        report.bank.total_marks
    );
}
