//! Data types flowing through the pipeline, and context assembly.
//!
//! The query path stitches retrieved and searched text into a single
//! context string. Every entry carries a parseable source prefix —
//! `[Source: <file>]` for retrieval, `[Web: <link>]` for search results —
//! which the synthesizer relies on to cite where answer text came from.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One unit of text extracted from a source document: a page, a
/// paragraph, or a slide, tagged with the file it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextBlock {
    /// Name of the originating file (never a full path).
    pub file_name: String,
    /// The extracted text.
    pub text: String,
}

/// A bounded word-window over one [`TextBlock`].
///
/// Chunks never span two blocks or two files. `index` is the chunk's
/// ordinal within its file and participates in record id derivation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Name of the originating file.
    pub file_name: String,
    /// The chunk text.
    pub text: String,
    /// Ordinal of this chunk within its file.
    pub index: usize,
}

/// A chunk paired with its embedding, keyed for upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingRecord {
    /// Upsert key. Derived deterministically from the chunk contents so
    /// re-ingesting an unchanged corpus overwrites instead of duplicating.
    pub id: String,
    /// The dense embedding vector.
    pub values: Vec<f32>,
    /// The chunk text, stored as metadata for retrieval.
    pub text: String,
    /// Name of the originating file, stored as metadata for citations.
    pub file_name: String,
}

impl EmbeddingRecord {
    /// Build a record from a chunk and its embedding.
    pub fn from_chunk(chunk: &Chunk, values: Vec<f32>) -> Self {
        Self {
            id: record_id(&chunk.file_name, chunk.index, &chunk.text),
            values,
            text: chunk.text.clone(),
            file_name: chunk.file_name.clone(),
        }
    }
}

/// Derive a stable record id from a chunk's identity.
///
/// Same file, same position, same text ⇒ same id, so upserts are
/// idempotent across ingestion runs.
pub fn record_id(file_name: &str, index: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update([0x1f]);
    hasher.update(index.to_le_bytes());
    hasher.update([0x1f]);
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// A nearest-neighbour result from the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalMatch {
    /// Name of the file the matched chunk came from.
    pub file_name: String,
    /// The matched chunk text.
    pub text: String,
    /// Similarity score (higher is more relevant).
    pub score: f32,
}

/// One web search result used to augment context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSnippet {
    /// The snippet text.
    pub content: String,
    /// The page the snippet came from.
    pub link: String,
}

/// The final structured answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    /// The answer text.
    pub text: String,
    /// Citations drawn from the context actually used. Empty when the
    /// model's output could not be parsed structurally.
    pub references: Vec<String>,
}

/// Assemble retrieval matches into a context string, one prefixed entry
/// per match, in the order given (most similar first).
pub fn format_context(matches: &[RetrievalMatch]) -> String {
    matches
        .iter()
        .map(|m| format!("[Source: {}] {}", m.file_name, m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one web snippet as a context entry.
pub fn format_snippet(snippet: &SearchSnippet) -> String {
    format!("[Web: {}] {}", snippet.link, snippet.content)
}
