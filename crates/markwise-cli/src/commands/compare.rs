//! The `markwise compare` command.

use std::path::PathBuf;

use anyhow::Result;

use markwise_core::report::{ScoreChangeReport, SubmissionReport};

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = SubmissionReport::load_json(&baseline_path)?;
    let current = SubmissionReport::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => print_text(&report),
    }

    if fail_on_regression && report.has_drops() {
        std::process::exit(1);
    }

    Ok(())
}

/// Print a comparison in plain text.
pub fn print_text(report: &ScoreChangeReport) {
    println!(
        "Comparison: {:.2} -> {:.2} marks; {} drops, {} gains, {} unchanged",
        report.baseline_total,
        report.current_total,
        report.drops.len(),
        report.gains.len(),
        report.unchanged
    );

    for (title, changes) in [("Drops", &report.drops), ("Gains", &report.gains)] {
        if changes.is_empty() {
            continue;
        }
        println!("\n{title}:");
        for c in changes {
            println!(
                "  {} {:.2} -> {:.2} ({:+.2})",
                c.question_id, c.baseline_score, c.current_score, c.delta
            );
        }
    }

    if report.new_questions > 0 {
        println!("\n{} new question(s)", report.new_questions);
    }
    if report.removed_questions > 0 {
        println!("{} removed question(s)", report.removed_questions);
    }
}
