//! markwise-report: HTML rendering of graded submissions.
//!
//! JSON persistence lives on `SubmissionReport` itself in `markwise-core`.

pub mod html;

pub use html::{generate_html, write_html_report};
