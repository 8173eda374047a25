//! Corpus store
//!
//! Copy-on-write holder for the corpus currently served to retrievals.
//! The server only loads it once at startup; an embedding application calls
//! [`CorpusStore::replace`] whenever it regenerates its session records.

use log::info;
use std::sync::{Arc, PoisonError, RwLock};

use crate::retrieval::document::{CorpusRecord, Document, build_corpus};

/// Shares the current corpus with concurrent retrievals.
///
/// Readers take an immutable snapshot; [`CorpusStore::replace`] swaps in a
/// freshly built corpus without touching snapshots already handed out.
#[derive(Debug, Default)]
pub struct CorpusStore {
    current: RwLock<Arc<[Document]>>,
}

impl CorpusStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            current: RwLock::new(documents.into()),
        }
    }

    pub fn from_records<R: CorpusRecord>(records: &[R]) -> Self {
        Self::new(build_corpus(records))
    }

    pub fn snapshot(&self) -> Arc<[Document]> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Rebuild the corpus from `records` and make it current.
    pub fn replace<R: CorpusRecord>(&self, records: &[R]) -> usize {
        let documents: Arc<[Document]> = build_corpus(records).into();
        let count = documents.len();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = documents;
        info!("Corpus replaced with {} documents", count);
        count
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
