//! markwise-core: Core answer-evaluation engine and scoring.
//!
//! This crate defines the data model, capability traits, and the scoring
//! logic (similarity, grammar, length, keyword gaps) that the rest of
//! markwise builds on.

pub mod answers;
pub mod engine;
pub mod error;
pub mod gaps;
pub mod grammar;
pub mod model;
pub mod parser;
pub mod report;
pub mod similarity;
pub mod text;
pub mod traits;
