//! Keyword-gap detection between a candidate and a reference answer.

use crate::text::{KeyPhraseExtractor, KeyPhraseSet};

/// Format a missing term as a human-readable mistake.
pub fn missing_part(term: &str) -> String {
    format!("Missing part: '{term}'")
}

/// Finds reference key phrases absent from a candidate answer.
#[derive(Debug, Clone, Default)]
pub struct GapDetector {
    extractor: KeyPhraseExtractor,
}

impl GapDetector {
    pub fn new(extractor: KeyPhraseExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &KeyPhraseExtractor {
        &self.extractor
    }

    /// Mistakes for every reference term missing from `candidate`, sorted by term.
    pub fn missing_parts(&self, candidate: &str, reference: &str) -> Vec<String> {
        let candidate_terms = self.extractor.extract(candidate);
        self.missing_parts_from(&candidate_terms, reference)
    }

    /// Like [`GapDetector::missing_parts`], reusing already extracted candidate terms.
    pub fn missing_parts_from(&self, candidate_terms: &KeyPhraseSet, reference: &str) -> Vec<String> {
        let reference_terms = self.extractor.extract(reference);
        reference_terms
            .difference(candidate_terms)
            .map(missing_part)
            .collect()
    }
}

/// Gap detection with the default tokenizer.
pub fn missing_parts(candidate: &str, reference: &str) -> Vec<String> {
    GapDetector::default().missing_parts(candidate, reference)
}
