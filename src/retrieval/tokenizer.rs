//! Tokenizer and term-frequency maps
//!
//! Turns free text into normalized tokens and sparse count vectors.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Sparse count vector over observed tokens. Unseen tokens are absent.
pub type TermFrequency = HashMap<String, usize>;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("non-word pattern is valid"));

/// Lowercase, strip punctuation, split on whitespace and drop single-character tokens.
///
/// Order is preserved and duplicates are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Count occurrences of each token.
pub fn term_frequency(tokens: &[String]) -> TermFrequency {
    let mut counts = TermFrequency::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

/// Tokens of one text together with their term-frequency map.
///
/// Built once per query or document and discarded after scoring.
#[derive(Debug, Clone)]
pub struct TextProfile {
    pub tokens: Vec<String>,
    pub term_frequency: TermFrequency,
}

impl TextProfile {
    pub fn new(text: &str) -> Self {
        let tokens = tokenize(text);
        let term_frequency = term_frequency(&tokens);
        Self {
            tokens,
            term_frequency,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
