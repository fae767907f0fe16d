//! End-to-end tests: question bank → answer sheet → evaluator → report.
//!
//! These run the real scoring pipeline against the mock grammar checker, so
//! they need no network access.

use std::sync::Arc;
use std::time::Duration;

use markwise_core::answers::submission_from_text;
use markwise_core::engine::{
    length_ratio, AnswerEvaluator, EvaluatorConfig, NoopReporter, GRAMMAR_WEIGHT, LENGTH_WEIGHT,
    SIMILARITY_WEIGHT,
};
use markwise_core::error::EvalError;
use markwise_core::gaps::missing_parts;
use markwise_core::model::{Question, QuestionBank};
use markwise_core::report::QuestionOutcome;
use markwise_core::similarity::similarity;
use markwise_core::text::UnicodeWordTokenizer;
use markwise_core::traits::GrammarIssue;
use markwise_grammar::MockGrammarChecker;

fn evaluator(checker: Arc<MockGrammarChecker>) -> AnswerEvaluator {
    AnswerEvaluator::new(
        checker,
        Arc::new(UnicodeWordTokenizer),
        EvaluatorConfig::default(),
    )
}

fn clean_evaluator() -> AnswerEvaluator {
    evaluator(Arc::new(MockGrammarChecker::clean()))
}

fn refs(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

fn question(id: &str, max_marks: f64, length_based: bool, references: &[&str]) -> Question {
    Question {
        id: id.into(),
        prompt: String::new(),
        references: refs(references),
        max_marks,
        length_based,
    }
}

#[tokio::test]
async fn e2e_marks_eight_length_based() {
    let reference = "The operating system manages resources and security.";
    let candidate = "The OS manages resources.";

    let result = clean_evaluator()
        .evaluate(candidate, &refs(&[reference]), 8.0, true)
        .await
        .unwrap();

    let sim = similarity(candidate, reference);
    let len = length_ratio(candidate, reference);
    assert!((len - 25.0 / 52.0).abs() < 1e-12);

    let expected = (sim * SIMILARITY_WEIGHT + 1.0 * GRAMMAR_WEIGHT + len * LENGTH_WEIGHT) * 8.0;
    assert!((result.total_score - expected).abs() < 1e-9);
    assert!((result.similarity_score - sim * SIMILARITY_WEIGHT * 8.0).abs() < 1e-9);
    assert!((result.grammar_score - GRAMMAR_WEIGHT * 8.0).abs() < 1e-9);
    assert!((result.length_score - len * LENGTH_WEIGHT * 8.0).abs() < 1e-9);
    assert_eq!(result.matched_reference, Some(0));
    assert!(result.warnings.is_empty());
    assert_eq!(result.corrected_text, candidate);

    for term in ["operating", "system", "security"] {
        assert!(
            result.mistakes.contains(&format!("Missing part: '{term}'")),
            "expected {term} in {:?}",
            result.mistakes
        );
    }
    assert!(!result.mistakes.iter().any(|m| m.contains("'manages'")));
    assert!(!result.mistakes.iter().any(|m| m.contains("'resources'")));
}

#[tokio::test]
async fn e2e_unattempted_in_any_case() {
    let evaluator = clean_evaluator();
    for text in ["UNATTEMPTED", "unattempted", "  UnAttempted \n"] {
        let result = evaluator
            .evaluate(text, &refs(&["An OS manages hardware."]), 5.0, true)
            .await
            .unwrap();
        assert_eq!(result.total_score, 0.0);
        assert_eq!(result.mistakes, vec!["Unattempted"]);
        assert_eq!(result.matched_reference, None);
    }
}

#[tokio::test]
async fn e2e_unattempted_wins_over_missing_references() {
    let result = clean_evaluator()
        .evaluate("unattempted", &[], 5.0, false)
        .await
        .unwrap();
    assert_eq!(result.mistakes, vec!["Unattempted"]);
}

#[tokio::test]
async fn e2e_score_never_exceeds_seventy_percent() {
    let evaluator = clean_evaluator();
    let reference = "An OS is software that provides a platform for running applications.";

    for (length_based, marks) in [(false, 2.0), (true, 8.0), (true, 13.5)] {
        let result = evaluator
            .evaluate(reference, &refs(&[reference]), marks, length_based)
            .await
            .unwrap();
        assert!(result.total_score <= 0.7 * marks + 1e-6);
        assert!((result.total_score - 0.7 * marks).abs() < 1e-9);
    }
}

#[tokio::test]
async fn e2e_reevaluation_is_identical() {
    let evaluator = clean_evaluator();
    let references = refs(&[
        "An operating system (OS) is system software that manages computer hardware.",
        "The operating system acts as an intermediary between users and the hardware.",
    ]);
    let candidate = "the OS sits between users and hardware";

    let first = evaluator.evaluate(candidate, &references, 2.0, false).await.unwrap();
    let second = evaluator.evaluate(candidate, &references, 2.0, false).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn e2e_best_reference_reports_its_own_gaps() {
    let candidate = "the kernel schedules processes";
    let references = refs(&[
        "zzzz",
        "the kernel runs programs",
        "the kernel schedules processes fairly",
    ]);

    let s: Vec<f64> = references.iter().map(|r| similarity(candidate, r)).collect();
    assert!(s[0] < s[1] && s[1] < s[2]);

    let result = clean_evaluator()
        .evaluate(candidate, &references, 4.0, false)
        .await
        .unwrap();

    assert_eq!(result.matched_reference, Some(2));
    assert_eq!(result.mistakes, missing_parts(candidate, &references[2]));
    assert_eq!(result.mistakes, vec!["Missing part: 'fairly'"]);
}

#[tokio::test]
async fn e2e_ties_keep_first_reference() {
    let reference = "Processes are programs in execution.";
    let result = clean_evaluator()
        .evaluate("A process runs.", &refs(&[reference, reference]), 3.0, false)
        .await
        .unwrap();
    assert_eq!(result.matched_reference, Some(0));
}

#[tokio::test]
async fn e2e_length_ratios() {
    assert_eq!(length_ratio("abcd", "abcd"), 1.0);
    assert_eq!(length_ratio("abcdabcd", "abcd"), 1.0);
    assert_eq!(length_ratio("ab", "abcd"), 0.5);

    // Non-length-based questions still get the length share in the total,
    // but report no length marks.
    let result = clean_evaluator()
        .evaluate("ab", &refs(&["abcd"]), 10.0, false)
        .await
        .unwrap();
    assert_eq!(result.length_score, 0.0);
    let expected =
        (similarity("ab", "abcd") * SIMILARITY_WEIGHT + GRAMMAR_WEIGHT + LENGTH_WEIGHT) * 10.0;
    assert!((result.total_score - expected).abs() < 1e-9);
}

#[tokio::test]
async fn e2e_grammar_checked_once_per_answer() {
    let checker = Arc::new(MockGrammarChecker::clean());
    let evaluator = evaluator(checker.clone());

    evaluator
        .evaluate(
            "An OS manages memory.",
            &refs(&["first reference", "second reference", "third reference"]),
            2.0,
            false,
        )
        .await
        .unwrap();

    assert_eq!(checker.call_count(), 1);
    assert_eq!(checker.last_text().as_deref(), Some("An OS manages memory."));
}

#[tokio::test]
async fn e2e_grammar_issues_lower_score_and_correct_text() {
    let issue = GrammarIssue {
        offset: 0,
        length: 3,
        message: "capitalize".into(),
        replacements: vec!["The".into()],
        rule_id: "UPPERCASE_SENTENCE_START".into(),
    };
    let candidate = "the kernel runs.";
    let evaluator = evaluator(Arc::new(MockGrammarChecker::with_issues(vec![issue])));

    let result = evaluator
        .evaluate(candidate, &refs(&["The kernel runs."]), 5.0, false)
        .await
        .unwrap();

    let grammar = 1.0 - 1.0 / candidate.chars().count() as f64;
    assert!((result.grammar_score - grammar * GRAMMAR_WEIGHT * 5.0).abs() < 1e-9);
    assert_eq!(result.corrected_text, "The kernel runs.");
}

#[tokio::test]
async fn e2e_grammar_failure_becomes_warning() {
    let candidate = "An OS manages hardware.";
    let evaluator = evaluator(Arc::new(MockGrammarChecker::failing("connection refused")));

    let result = evaluator
        .evaluate(candidate, &refs(&["An OS manages hardware."]), 4.0, false)
        .await
        .unwrap();

    assert_eq!(result.grammar_score, 0.0);
    assert_eq!(result.corrected_text, candidate);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("connection refused"));
    // Similarity 1 plus the length share, no grammar.
    assert!((result.total_score - (SIMILARITY_WEIGHT + LENGTH_WEIGHT) * 4.0).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn e2e_slow_grammar_times_out() {
    let checker = Arc::new(MockGrammarChecker::clean().with_delay(Duration::from_secs(60)));
    let evaluator = AnswerEvaluator::new(
        checker,
        Arc::new(UnicodeWordTokenizer),
        EvaluatorConfig {
            grammar_timeout: Duration::from_secs(2),
        },
    );

    let result = evaluator
        .evaluate("An OS.", &refs(&["An OS."]), 1.0, false)
        .await
        .unwrap();

    assert_eq!(result.grammar_score, 0.0);
    assert!(result.warnings[0].contains("timed out after 2s"));
}

#[tokio::test]
async fn e2e_missing_references_is_an_error() {
    let err = clean_evaluator()
        .evaluate_question(&question("Q9", 2.0, false, &[]), "some answer")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::MissingConfiguration {
            question_id: "Q9".into()
        }
    );
}

#[tokio::test]
async fn e2e_invalid_marks_rejected() {
    let err = clean_evaluator()
        .evaluate_question(&question("Q1", -1.0, false, &["ref"]), "answer")
        .await
        .unwrap_err();
    assert!(matches!(err, EvalError::InvalidMarks { .. }));
}

#[tokio::test]
async fn e2e_partial_submission() {
    let bank = QuestionBank {
        id: "os".into(),
        name: "OS".into(),
        description: String::new(),
        questions: vec![
            question("Q1", 2.0, false, &["An OS manages hardware resources."]),
            question("Q2", 8.0, true, &[]),
            question("Q3", 4.0, false, &["A process is a program in execution."]),
        ],
    };
    let submission = submission_from_text("An OS manages hardware.\nEND\nIt runs apps.\nEND\n");
    assert_eq!(submission.answers.len(), 2);

    let report = clean_evaluator()
        .evaluate_submission(&bank, &submission, &NoopReporter)
        .await;

    assert_eq!(report.questions.len(), 3);
    assert!(matches!(report.questions[0].outcome, QuestionOutcome::Graded { .. }));
    match &report.questions[1].outcome {
        QuestionOutcome::Failed { error } => assert!(error.contains("no reference answers")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(matches!(report.questions[2].outcome, QuestionOutcome::NoAnswer));
    assert_eq!(report.questions[2].candidate, None);

    assert_eq!(report.failed_questions().count(), 1);
    assert_eq!(report.bank.total_marks, 14.0);
    assert_eq!(report.grammar_checker, "mock");
    assert!((report.total_score() - report.questions[0].score()).abs() < 1e-12);
    assert_eq!(report.answers, submission.answers);
}

#[tokio::test]
async fn e2e_report_json_roundtrip_and_compare() {
    let bank = QuestionBank {
        id: "os".into(),
        name: "OS".into(),
        description: String::new(),
        questions: vec![question("Q1", 2.0, false, &["An OS manages hardware resources."])],
    };
    let submission = submission_from_text("An OS manages hardware. END");
    let evaluator = clean_evaluator();

    let report = evaluator
        .evaluate_submission(&bank, &submission, &NoopReporter)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();
    let loaded = markwise_core::report::SubmissionReport::load_json(&path).unwrap();
    assert!((loaded.total_score() - report.total_score()).abs() < 1e-12);
    assert_eq!(
        loaded.questions[0].result().map(|r| &r.mistakes),
        report.questions[0].result().map(|r| &r.mistakes)
    );

    let again = evaluator
        .evaluate_submission(&bank, &submission, &NoopReporter)
        .await;
    assert!(again.compare(&loaded, 1e-9).is_identical());
}
