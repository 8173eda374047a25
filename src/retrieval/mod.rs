//! Lexical retrieval
//!
//! Tokenization, similarity scoring and top-K ranking of short documents
//! against a free-text query.

pub mod document;
pub mod engine;
pub mod results;
pub mod scoring;
pub mod session;
pub mod store;
pub mod tokenizer;

pub use document::{CorpusRecord, Document, build_corpus};
pub use engine::{TOP_K, rank, retrieve, retrieve_top_k};
pub use results::ScoredDocument;
pub use session::{ClassSession, ClassType, TimeSlot, load_sessions};
pub use store::CorpusStore;
