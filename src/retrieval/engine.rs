//! Retrieval engine
//!
//! Ranks a caller-supplied corpus against a free-text query. Holds no state
//! and never mutates the corpus, so calls may run concurrently.

use log::debug;

use crate::retrieval::document::Document;
use crate::retrieval::results::ScoredDocument;
use crate::retrieval::scoring::combined_score;
use crate::retrieval::tokenizer::TextProfile;

/// Number of documents returned by [`retrieve`].
pub const TOP_K: usize = 6;

/// Return the [`TOP_K`] most relevant documents for `query`.
///
/// A query without usable tokens returns the head of the corpus in its
/// original order.
pub fn retrieve(query: &str, corpus: &[Document]) -> Vec<Document> {
    retrieve_top_k(query, corpus, TOP_K)
}

/// Same as [`retrieve`] with an explicit result count.
pub fn retrieve_top_k(query: &str, corpus: &[Document], k: usize) -> Vec<Document> {
    let query_profile = TextProfile::new(query);
    if query_profile.is_empty() {
        debug!("Query has no usable tokens, returning first {} documents", k);
        return corpus.iter().take(k).cloned().collect();
    }

    let mut ranked = score_corpus(&query_profile, corpus);
    ranked.truncate(k);
    ranked
        .into_iter()
        .map(|scored| scored.document.clone())
        .collect()
}

/// Score every document against `query` and sort by relevance.
///
/// Ties keep corpus order.
pub fn rank<'a>(query: &str, corpus: &'a [Document]) -> Vec<ScoredDocument<'a>> {
    score_corpus(&TextProfile::new(query), corpus)
}

fn score_corpus<'a>(query: &TextProfile, corpus: &'a [Document]) -> Vec<ScoredDocument<'a>> {
    let mut scored: Vec<ScoredDocument<'a>> = corpus
        .iter()
        .enumerate()
        .map(|(position, document)| ScoredDocument {
            document,
            score: combined_score(query, &TextProfile::new(&document.text)),
            position,
        })
        .collect();

    scored.sort_by(|a, b| a.rank_cmp(b));
    scored
}
