//! LanguageTool HTTP grammar checker.
//!
//! Talks to a LanguageTool server (self-hosted or the public API) through
//! its `/v2/check` endpoint.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use markwise_core::error::GrammarError;
use markwise_core::traits::{GrammarChecker, GrammarIssue};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// LanguageTool grammar checker.
pub struct LanguageToolChecker {
    base_url: String,
    language: String,
    username: Option<String>,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl LanguageToolChecker {
    pub fn new(base_url: &str, language: &str) -> Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url.trim_end_matches('/')
        };
        let language = if language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            language
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base.to_string(),
            language: language.to_string(),
            username: None,
            api_key: None,
            client,
        })
    }

    /// Authenticate against a premium LanguageTool endpoint.
    pub fn with_credentials(mut self, username: Option<String>, api_key: Option<String>) -> Self {
        self.username = username.filter(|u| !u.is_empty());
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }
}

#[derive(Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<CheckMatch>,
}

#[derive(Deserialize)]
struct CheckMatch {
    message: String,
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
    #[serde(default)]
    rule: Option<Rule>,
}

#[derive(Deserialize)]
struct Replacement {
    value: String,
}

#[derive(Deserialize)]
struct Rule {
    id: String,
}

/// Convert a UTF-16 span (as LanguageTool reports it) to a character span.
fn utf16_span_to_chars(text: &str, offset: usize, length: usize) -> (usize, usize) {
    let mut units = 0usize;
    let mut start = None;
    let mut end = None;

    for (index, ch) in text.chars().enumerate() {
        if start.is_none() && units >= offset {
            start = Some(index);
        }
        if end.is_none() && units >= offset + length {
            end = Some(index);
            break;
        }
        units += ch.len_utf16();
    }

    let total = text.chars().count();
    let start = start.unwrap_or(total);
    let end = end.unwrap_or(total).max(start);
    (start, end - start)
}

#[async_trait]
impl GrammarChecker for LanguageToolChecker {
    fn name(&self) -> &str {
        "languagetool"
    }

    #[instrument(skip(self, text), fields(language = %self.language, chars = text.len()))]
    async fn check(&self, text: &str) -> anyhow::Result<Vec<GrammarIssue>> {
        let mut form = vec![("text", text), ("language", self.language.as_str())];
        if let Some(username) = &self.username {
            form.push(("username", username.as_str()));
        }
        if let Some(api_key) = &self.api_key {
            form.push(("apiKey", api_key.as_str()));
        }

        let response = self
            .client
            .post(format!("{}/v2/check", self.base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GrammarError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else if e.is_connect() {
                    GrammarError::NetworkError(format!(
                        "LanguageTool not reachable at {}. Is the server running?",
                        self.base_url
                    ))
                } else {
                    GrammarError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(GrammarError::Unavailable(format!(
                "no LanguageTool check endpoint at {}/v2/check",
                self.base_url
            ))
            .into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(GrammarError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: CheckResponse =
            response.json().await.map_err(|e| GrammarError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        Ok(api_response
            .matches
            .into_iter()
            .map(|m| {
                let (offset, length) = utf16_span_to_chars(text, m.offset, m.length);
                GrammarIssue {
                    offset,
                    length,
                    message: m.message,
                    replacements: m.replacements.into_iter().map(|r| r.value).collect(),
                    rule_id: m.rule.map(|r| r.id).unwrap_or_default(),
                }
            })
            .collect())
    }
}
