//! Subcommand implementations.

pub mod check_grammar;
pub mod compare;
pub mod grade;
pub mod init;
pub mod reevaluate;
pub mod validate;
