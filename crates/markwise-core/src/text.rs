//! Word tokenization and key-phrase extraction.

use std::collections::BTreeSet;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::traits::WordTokenizer;

/// Words never treated as key phrases. Applied after lower-casing.
pub const STOP_WORDS: [&str; 10] = ["a", "an", "the", "and", "is", "to", "for", "in", "on", "of"];

/// Tokenizer following Unicode (UAX #29) word boundaries.
///
/// Contractions such as "don't" stay a single token and punctuation-only
/// segments are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

impl WordTokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(str::to_string).collect()
    }
}

/// A set of normalized, stop-word-filtered terms.
///
/// Iteration is in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPhraseSet(BTreeSet<String>);

impl KeyPhraseSet {
    /// Case-insensitive membership test.
    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(&term.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Terms in `self` that are absent from `other`, in lexicographic order.
    pub fn difference<'a>(&'a self, other: &'a KeyPhraseSet) -> impl Iterator<Item = &'a str> {
        self.0.difference(&other.0).map(String::as_str)
    }
}

impl FromIterator<String> for KeyPhraseSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Extracts [`KeyPhraseSet`]s using an injected tokenizer.
#[derive(Clone)]
pub struct KeyPhraseExtractor {
    tokenizer: Arc<dyn WordTokenizer>,
}

impl KeyPhraseExtractor {
    pub fn new(tokenizer: Arc<dyn WordTokenizer>) -> Self {
        Self { tokenizer }
    }

    /// Lower-case `text`, tokenize it, and drop stop words.
    pub fn extract(&self, text: &str) -> KeyPhraseSet {
        self.tokenizer
            .tokenize(&text.to_lowercase())
            .into_iter()
            .filter(|word| !STOP_WORDS.contains(&word.as_str()))
            .collect()
    }
}

impl Default for KeyPhraseExtractor {
    fn default() -> Self {
        Self::new(Arc::new(UnicodeWordTokenizer))
    }
}

impl std::fmt::Debug for KeyPhraseExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPhraseExtractor").finish_non_exhaustive()
    }
}

/// Extract key phrases with the default Unicode tokenizer.
pub fn extract_key_phrases(text: &str) -> KeyPhraseSet {
    KeyPhraseExtractor::default().extract(text)
}
