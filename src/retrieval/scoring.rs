//! Similarity scoring
//!
//! Combines token overlap with term-frequency cosine similarity.

use std::collections::HashSet;

use crate::retrieval::tokenizer::{TermFrequency, TextProfile};

pub const OVERLAP_WEIGHT: f64 = 0.5;
pub const COSINE_WEIGHT: f64 = 0.5;

/// Document tokens found among the distinct query tokens, divided by the
/// query token count (duplicates included). Returns 0 for an empty query.
pub fn overlap_score(query_tokens: &[String], doc_tokens: &[String]) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }

    let query_set: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    let hits = doc_tokens
        .iter()
        .filter(|token| query_set.contains(token.as_str()))
        .count();

    hits as f64 / query_tokens.len() as f64
}

/// Cosine similarity over the union of both maps' keys.
///
/// Returns 0 when either vector has zero norm.
pub fn cosine_similarity(a: &TermFrequency, b: &TermFrequency) -> f64 {
    // Keys missing from one side contribute nothing to the dot product.
    let dot: usize = a
        .iter()
        .filter_map(|(token, &va)| b.get(token).map(|&vb| va * vb))
        .sum();
    let norm_a: usize = a.values().map(|&v| v * v).sum();
    let norm_b: usize = b.values().map(|&v| v * v).sum();

    if norm_a == 0 || norm_b == 0 {
        return 0.0;
    }
    dot as f64 / ((norm_a as f64).sqrt() * (norm_b as f64).sqrt())
}

/// Equal-weight blend of overlap and cosine.
pub fn combined_score(query: &TextProfile, document: &TextProfile) -> f64 {
    let overlap = overlap_score(&query.tokens, &document.tokens);
    let cosine = cosine_similarity(&query.term_frequency, &document.term_frequency);
    OVERLAP_WEIGHT * overlap + COSINE_WEIGHT * cosine
}
