//! Quick grade example: minimal programmatic usage of markwise.
//!
//! Builds an `AnswerEvaluator` around the offline rule-based grammar
//! checker and scores one answer against two reference answers.
//!
//! ```bash
//! cargo run -p markwise-cli --example quick_grade
//! ```

use std::sync::Arc;

use markwise_core::engine::{AnswerEvaluator, EvaluatorConfig};
use markwise_core::text::UnicodeWordTokenizer;
use markwise_core::traits::GrammarChecker;
use markwise_grammar::BasicGrammarChecker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Any GrammarChecker can be injected; the basic one needs no server.
    let checker: Arc<dyn GrammarChecker> = Arc::new(BasicGrammarChecker::new()?);
    let evaluator = AnswerEvaluator::new(
        checker,
        Arc::new(UnicodeWordTokenizer),
        EvaluatorConfig::default(),
    );

    let references = vec![
        "An operating system manages hardware and software resources.".to_string(),
        "The OS is system software that manages computer hardware.".to_string(),
    ];
    let candidate = "the operating system manages  hardware .";

    let result = evaluator.evaluate(candidate, &references, 8.0, true).await?;

    println!("Checker: {}", evaluator.grammar_checker());
    println!("Total: {:.2} / 8", result.total_score);
    println!("  similarity: {:.2}", result.similarity_score);
    println!("  grammar:    {:.2}", result.grammar_score);
    println!("  length:     {:.2}", result.length_score);
    if let Some(index) = result.matched_reference {
        println!("Best reference: #{}", index + 1);
    }
    for mistake in &result.mistakes {
        println!("  {mistake}");
    }
    println!("Corrected: {}", result.corrected_text);

    Ok(())
}
