//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use markwise_core::model::EvaluationResult;
use markwise_core::report::{QuestionOutcome, QuestionReport, SubmissionReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// CSS class for a score as a fraction of the available marks.
fn grade_class(score: f64, max_marks: f64) -> &'static str {
    if max_marks <= 0.0 {
        return "neutral";
    }
    let fraction = score / max_marks;
    if fraction >= 0.5 {
        "good"
    } else if fraction >= 0.25 {
        "fair"
    } else {
        "poor"
    }
}

/// Generate an HTML report from a submission report.
pub fn generate_html(report: &SubmissionReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>markwise report: {}</title>\n",
        html_escape(&report.bank.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>markwise report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Bank: <strong>{}</strong> | {} questions | grammar: {} | {}</p>\n",
        html_escape(&report.bank.name),
        report.bank.question_count,
        html_escape(&report.grammar_checker),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    let total = report.total_score();
    html.push_str("<section class=\"summary\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<div class=\"total {}\">{:.2} / {:.2}</div>\n",
        grade_class(total, report.bank.total_marks),
        total,
        report.bank.total_marks
    ));
    let failed = report.failed_questions().count();
    if failed > 0 {
        html.push_str(&format!(
            "<p class=\"warning\">{failed} question(s) could not be graded.</p>\n"
        ));
    }
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>Question</th><th>Status</th><th>Score</th><th>Max</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for q in &report.questions {
        let status = match &q.outcome {
            QuestionOutcome::Graded { .. } => "graded",
            QuestionOutcome::Failed { .. } => "failed",
            QuestionOutcome::NoAnswer => "no answer",
        };
        html.push_str(&format!(
            "<tr><td><a href=\"#q-{id}\">{id}</a></td><td>{status}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
            q.score(),
            q.max_marks,
            id = html_escape(&q.question_id),
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Per-question boxes
    html.push_str("<section class=\"questions\">\n");
    html.push_str("<h2>Questions</h2>\n");
    for q in &report.questions {
        html.push_str(&question_box(q));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

fn question_box(q: &QuestionReport) -> String {
    let id = html_escape(&q.question_id);
    let mut html = format!(
        "<article class=\"question {}\" id=\"q-{id}\">\n<h3>{id}</h3>\n",
        grade_class(q.score(), q.max_marks)
    );

    if let Some(candidate) = &q.candidate {
        html.push_str(&format!(
            "<blockquote class=\"answer\">{}</blockquote>\n",
            html_escape(candidate)
        ));
    }

    match &q.outcome {
        QuestionOutcome::Graded { result } => html.push_str(&result_details(result, q.max_marks)),
        QuestionOutcome::Failed { error } => html.push_str(&format!(
            "<p class=\"error\">Not graded: {}</p>\n",
            html_escape(error)
        )),
        QuestionOutcome::NoAnswer => {
            html.push_str("<p class=\"meta\">No answer was submitted for this question.</p>\n")
        }
    }

    html.push_str("</article>\n");
    html
}

fn result_details(result: &EvaluationResult, max_marks: f64) -> String {
    let mut html = String::from("<div class=\"scores\">\n");
    for (label, value) in [
        ("Score", result.total_score),
        ("Similarity", result.similarity_score),
        ("Grammar", result.grammar_score),
        ("Length", result.length_score),
    ] {
        html.push_str(&format!(
            "<div class=\"score-box\"><span class=\"label\">{label}</span><span class=\"value\">{value:.2}</span></div>\n"
        ));
    }
    html.push_str(&format!(
        "<div class=\"score-box\"><span class=\"label\">Max</span><span class=\"value\">{max_marks:.2}</span></div>\n"
    ));
    html.push_str("</div>\n");

    if !result.mistakes.is_empty() {
        html.push_str("<h4>Mistakes</h4>\n<ul class=\"mistakes\">\n");
        for mistake in &result.mistakes {
            html.push_str(&format!("<li>{}</li>\n", html_escape(mistake)));
        }
        html.push_str("</ul>\n");
    }

    if !result.corrected_text.is_empty() {
        html.push_str(&format!(
            "<h4>Corrected text</h4>\n<p class=\"corrected\">{}</p>\n",
            html_escape(&result.corrected_text)
        ));
    }

    for warning in &result.warnings {
        html.push_str(&format!(
            "<p class=\"warning\">{}</p>\n",
            html_escape(warning)
        ));
    }

    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &SubmissionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #dcfce7; --fair: #fef9c3; --poor: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #064e3b; --fair: #713f12; --poor: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.total { font-size: 2rem; font-weight: bold; padding: 1rem; border-radius: 8px; display: inline-block; }
.question { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; margin: 1rem 0; }
.good { background: var(--good); }
.fair { background: var(--fair); }
.poor { background: var(--poor); }
.scores { display: flex; gap: 0.75rem; flex-wrap: wrap; }
.score-box { border: 1px solid var(--border); border-radius: 6px; padding: 0.5rem 0.75rem; display: flex; flex-direction: column; min-width: 6rem; }
.score-box .label { font-size: 0.75rem; color: #6b7280; }
.score-box .value { font-size: 1.25rem; font-weight: bold; }
blockquote { border-left: 4px solid var(--border); margin: 0.5rem 0; padding-left: 1rem; white-space: pre-wrap; }
.error, .warning { font-weight: bold; }
.hidden { display: none; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

const JS: &str = r#"
document.querySelectorAll('.question h3').forEach(h => {
  h.style.cursor = 'pointer';
  h.addEventListener('click', () => {
    Array.from(h.parentElement.children)
      .filter(el => el !== h)
      .forEach(el => el.classList.toggle('hidden'));
  });
});
"#;
