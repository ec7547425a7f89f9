//! Vector store trait for namespaced storage and similarity search.

use async_trait::async_trait;

use crate::document::{EmbeddingRecord, RetrievalMatch};
use crate::error::Result;

/// A storage backend for vector embeddings with similarity search.
///
/// Every operation takes an explicit `namespace` — the logical partition
/// holding one user's data. Namespaces keep queries and deletions from
/// ever crossing users; nothing in this crate infers a namespace from
/// ambient state.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{VectorStore, InMemoryVectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.upsert("user-7", &records).await?;
/// let matches = store.query("user-7", &query_embedding, 3).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Write records into a namespace, overwriting by record id.
    async fn upsert(&self, namespace: &str, records: &[EmbeddingRecord]) -> Result<()>;

    /// Return up to `top_k` nearest neighbours by cosine similarity,
    /// most similar first, with stored text and file-name metadata but
    /// not the raw vectors.
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>>;

    /// Delete every record in a namespace.
    ///
    /// Either the whole namespace is cleared or an error is returned —
    /// never partial silent success.
    async fn purge(&self, namespace: &str) -> Result<()>;
}
