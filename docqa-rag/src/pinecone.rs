//! Pinecone vector store backend.
//!
//! Provides [`PineconeVectorStore`], a [`VectorStore`] over the Pinecone
//! data-plane REST API. The client talks to an existing index host; the
//! index's dimension and metric (cosine) are fixed at index-creation
//! time on the Pinecone side.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::PineconeVectorStore;
//!
//! let store = PineconeVectorStore::new("https://my-index-abc123.svc.pinecone.io", "pc-...")?;
//! store.upsert("user-7", &records).await?;
//! let matches = store.query("user-7", &query_embedding, 3).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::document::{EmbeddingRecord, RetrievalMatch};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Per-request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A [`VectorStore`] backed by a Pinecone index.
///
/// Namespaces map to Pinecone namespaces. Chunk text and file name are
/// stored as vector metadata; queries request metadata but not vector
/// values, keeping response payloads small.
pub struct PineconeVectorStore {
    client: reqwest::Client,
    host: String,
    api_key: String,
}

impl PineconeVectorStore {
    /// Create a new store talking to the given index host.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::VectorStoreError {
                backend: "Pinecone".into(),
                message: "API key must not be empty".into(),
            });
        }

        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
            RagError::VectorStoreError {
                backend: "Pinecone".into(),
                message: format!("failed to build HTTP client: {e}"),
            }
        })?;

        Ok(Self { client, host: host.into().trim_end_matches('/').to_string(), api_key })
    }

    /// Create a new store from the `PINECONE_HOST` and `PINECONE_API_KEY`
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("PINECONE_HOST").map_err(|_| RagError::VectorStoreError {
            backend: "Pinecone".into(),
            message: "PINECONE_HOST environment variable not set".into(),
        })?;
        let api_key = std::env::var("PINECONE_API_KEY").map_err(|_| {
            RagError::VectorStoreError {
                backend: "Pinecone".into(),
                message: "PINECONE_API_KEY environment variable not set".into(),
            }
        })?;
        Self::new(host, api_key)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}{path}", self.host))
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(path, error = %e, "Pinecone request failed");
                RagError::VectorStoreError {
                    backend: "Pinecone".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(path, %status, "Pinecone API error");
            return Err(RagError::VectorStoreError {
                backend: "Pinecone".into(),
                message: format!("API returned {status}: {body}"),
            });
        }

        Ok(response)
    }
}

// ── Pinecone API request/response types ────────────────────────────

#[derive(Serialize)]
struct Vector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: Metadata<'a>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    text: &'a str,
    file_name: &'a str,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<Vector<'a>>,
    namespace: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    namespace: &'a str,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    score: f32,
    #[serde(default)]
    metadata: Option<MatchMetadata>,
}

#[derive(Deserialize, Default)]
struct MatchMetadata {
    #[serde(default)]
    text: String,
    #[serde(default)]
    file_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    delete_all: bool,
    namespace: &'a str,
}

// ── VectorStore implementation ─────────────────────────────────────

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn upsert(&self, namespace: &str, records: &[EmbeddingRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        debug!(namespace, count = records.len(), "upserting vectors");

        let request = UpsertRequest {
            vectors: records
                .iter()
                .map(|r| Vector {
                    id: &r.id,
                    values: &r.values,
                    metadata: Metadata { text: &r.text, file_name: &r.file_name },
                })
                .collect(),
            namespace,
        };

        self.post("/vectors/upsert", &request).await?;
        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>> {
        let request = QueryRequest {
            vector,
            top_k,
            namespace,
            include_metadata: true,
            include_values: false,
        };

        let response: QueryResponse =
            self.post("/query", &request).await?.json().await.map_err(|e| {
                error!(error = %e, "failed to parse Pinecone query response");
                RagError::VectorStoreError {
                    backend: "Pinecone".into(),
                    message: format!("failed to parse response: {e}"),
                }
            })?;

        Ok(response
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.unwrap_or_default();
                RetrievalMatch {
                    file_name: metadata.file_name,
                    text: metadata.text,
                    score: m.score,
                }
            })
            .collect())
    }

    async fn purge(&self, namespace: &str) -> Result<()> {
        debug!(namespace, "purging namespace");
        self.post("/vectors/delete", &DeleteRequest { delete_all: true, namespace }).await?;
        Ok(())
    }
}
