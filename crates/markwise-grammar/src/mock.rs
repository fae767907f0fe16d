//! Mock grammar checker for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use markwise_core::error::GrammarError;
use markwise_core::traits::{GrammarChecker, GrammarIssue};

/// A grammar checker that never leaves the process.
///
/// Returns a fixed set of issues, or fails every call when built with
/// [`MockGrammarChecker::failing`].
pub struct MockGrammarChecker {
    issues: Vec<GrammarIssue>,
    failure: Option<String>,
    delay: Option<Duration>,
    call_count: AtomicU32,
    last_text: Mutex<Option<String>>,
}

impl MockGrammarChecker {
    /// A checker that finds no issues.
    pub fn clean() -> Self {
        Self::with_issues(Vec::new())
    }

    /// A checker that reports the same issues for every text.
    pub fn with_issues(issues: Vec<GrammarIssue>) -> Self {
        Self {
            issues,
            failure: None,
            delay: None,
            call_count: AtomicU32::new(0),
            last_text: Mutex::new(None),
        }
    }

    /// A checker whose backend is always unavailable.
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::clean()
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of checks performed.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The text of the most recent check.
    pub fn last_text(&self) -> Option<String> {
        self.last_text.lock().ok().and_then(|t| t.clone())
    }
}

#[async_trait]
impl GrammarChecker for MockGrammarChecker {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check(&self, text: &str) -> anyhow::Result<Vec<GrammarIssue>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_text.lock() {
            *last = Some(text.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(reason) => Err(GrammarError::Unavailable(reason.clone()).into()),
            None => Ok(self.issues.clone()),
        }
    }
}
