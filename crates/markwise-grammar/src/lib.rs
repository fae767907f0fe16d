//! markwise-grammar: Grammar-checking backends.
//!
//! Implements the `GrammarChecker` trait for a LanguageTool server, an
//! offline rule-based checker, and a mock for tests, plus the configuration
//! layer that picks between them.

pub mod basic;
pub mod config;
pub mod languagetool;
pub mod mock;

pub use basic::BasicGrammarChecker;
pub use config::{create_checker, load_config, load_config_from, CheckerConfig, MarkwiseConfig};
pub use languagetool::LanguageToolChecker;
pub use mock::MockGrammarChecker;
