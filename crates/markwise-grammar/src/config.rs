//! Configuration loading and grammar checker factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use markwise_core::engine::EvaluatorConfig;
use markwise_core::traits::GrammarChecker;

use crate::basic::BasicGrammarChecker;
use crate::languagetool::{LanguageToolChecker, DEFAULT_BASE_URL};

/// Configuration for a single grammar backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CheckerConfig {
    LanguageTool {
        #[serde(default = "default_languagetool_url")]
        base_url: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        api_key: Option<String>,
    },
    Basic,
}

impl std::fmt::Debug for CheckerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckerConfig::LanguageTool {
                base_url,
                username,
                api_key,
            } => f
                .debug_struct("LanguageTool")
                .field("base_url", base_url)
                .field("username", username)
                .field("api_key", &api_key.as_ref().map(|_| "***"))
                .finish(),
            CheckerConfig::Basic => f.write_str("Basic"),
        }
    }
}

fn default_languagetool_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Top-level markwise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkwiseConfig {
    /// Grammar backend configurations keyed by name.
    #[serde(default)]
    pub checkers: HashMap<String, CheckerConfig>,
    /// Backend used when none is given on the command line.
    #[serde(default = "default_checker")]
    pub default_checker: String,
    /// Upper bound on a single grammar check, in seconds.
    #[serde(default = "default_timeout")]
    pub grammar_timeout_secs: u64,
    /// Language code sent to LanguageTool.
    #[serde(default = "default_language")]
    pub language: String,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_checker() -> String {
    "languagetool".to_string()
}
fn default_timeout() -> u64 {
    10
}
fn default_language() -> String {
    "en-US".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./markwise-results")
}

impl Default for MarkwiseConfig {
    fn default() -> Self {
        Self {
            checkers: HashMap::new(),
            default_checker: default_checker(),
            grammar_timeout_secs: default_timeout(),
            language: default_language(),
            output_dir: default_output_dir(),
        }
    }
}

impl MarkwiseConfig {
    /// Evaluator settings derived from this configuration.
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            grammar_timeout: Duration::from_secs(self.grammar_timeout_secs),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let value = std::env::var(&rest[start + 2..start + end]).unwrap_or_default();
        result.push_str(&value);
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_checker_config(config: &CheckerConfig) -> CheckerConfig {
    match config {
        CheckerConfig::LanguageTool {
            base_url,
            username,
            api_key,
        } => CheckerConfig::LanguageTool {
            base_url: resolve_env_vars(base_url),
            username: username.as_deref().map(resolve_env_vars),
            api_key: api_key.as_deref().map(resolve_env_vars),
        },
        CheckerConfig::Basic => CheckerConfig::Basic,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `markwise.toml` in the current directory
/// 2. `~/.config/markwise/config.toml`
///
/// `MARKWISE_LANGUAGETOOL_URL` overrides the LanguageTool server address.
pub fn load_config() -> Result<MarkwiseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MarkwiseConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("markwise.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<MarkwiseConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MarkwiseConfig::default(),
    };

    if let Ok(url) = std::env::var("MARKWISE_LANGUAGETOOL_URL") {
        let entry = config
            .checkers
            .entry("languagetool".into())
            .or_insert(CheckerConfig::LanguageTool {
                base_url: String::new(),
                username: None,
                api_key: None,
            });
        if let CheckerConfig::LanguageTool { base_url, .. } = entry {
            *base_url = url;
        }
    }

    config.checkers = config
        .checkers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_checker_config(v)))
        .collect();

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("markwise"))
}

/// Create the grammar checker called `name`.
///
/// Unconfigured `languagetool` and `basic` names fall back to their
/// defaults; any other unknown name is an error.
pub fn create_checker(name: &str, config: &MarkwiseConfig) -> Result<Arc<dyn GrammarChecker>> {
    let checker_config = match (config.checkers.get(name), name) {
        (Some(c), _) => c.clone(),
        (None, "languagetool") => CheckerConfig::LanguageTool {
            base_url: default_languagetool_url(),
            username: None,
            api_key: None,
        },
        (None, "basic") => CheckerConfig::Basic,
        (None, _) => {
            let mut known: Vec<&str> = config.checkers.keys().map(String::as_str).collect();
            known.sort_unstable();
            anyhow::bail!(
                "unknown grammar checker '{name}' (configured: {})",
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            );
        }
    };

    tracing::debug!(checker = name, config = ?checker_config, "creating grammar checker");

    match checker_config {
        CheckerConfig::LanguageTool {
            base_url,
            username,
            api_key,
        } => Ok(Arc::new(
            LanguageToolChecker::new(&base_url, &config.language)?
                .with_credentials(username, api_key),
        )),
        CheckerConfig::Basic => Ok(Arc::new(BasicGrammarChecker::new()?)),
    }
}
