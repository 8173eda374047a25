//! Gateway result types

use serde::Serialize;

use crate::retrieval::Document;

pub const CONTEXT_HEADER: &str = "Relevant session data (use for evidence):\n";
pub const NO_CONTEXT: &str = "No matching session data.";

/// Evidence assembled for the downstream generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatContext {
    pub client_id: String,
    pub documents: Vec<Document>,
    pub context_block: String,
}

/// Join document texts into the evidence block handed to the generator.
pub fn build_context_block(documents: &[Document]) -> String {
    if documents.is_empty() {
        return NO_CONTEXT.to_string();
    }
    let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
    format!("{}{}", CONTEXT_HEADER, texts.join("\n\n"))
}
