//! Documents and corpus construction
//!
//! A corpus is an ordered, immutable sequence of [`Document`]s rebuilt from
//! caller records.

use log::warn;
use serde::{Deserialize, Serialize};

/// A short piece of rendered text that can be ranked against a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A caller record that can be rendered into a [`Document`].
pub trait CorpusRecord {
    /// Identifier of the record, unique within a corpus snapshot.
    fn record_id(&self) -> &str;

    /// Fields making up the document text, in a stable order.
    fn text_fields(&self) -> Vec<String>;

    fn to_document(&self) -> Document {
        Document::new(self.record_id(), self.text_fields().join(" "))
    }
}

/// Render every record into a document, preserving record order.
///
/// Records without an identifier are skipped.
pub fn build_corpus<R: CorpusRecord>(records: &[R]) -> Vec<Document> {
    records
        .iter()
        .filter_map(|record| {
            if record.record_id().trim().is_empty() {
                warn!("Skipping corpus record without an identifier");
                return None;
            }
            Some(record.to_document())
        })
        .collect()
}
