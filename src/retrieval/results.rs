//! Retrieval result types

use std::cmp::Ordering;

use crate::retrieval::document::Document;

/// A corpus document paired with its relevance to a query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f64,
    /// Index of the document in the corpus it was scored from.
    pub position: usize,
}

impl ScoredDocument<'_> {
    /// Score descending, then corpus position ascending.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.position.cmp(&other.position))
    }
}
