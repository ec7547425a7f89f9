//! Pipeline orchestrator.
//!
//! [`RagPipeline`] composes the loader, a [`Chunker`], an
//! [`EmbeddingProvider`], a [`VectorStore`], the judge/synthesis models,
//! and an optional [`WebSearch`] client into the two top-level
//! operations: knowledge-base ingestion and query answering. Every
//! collaborator arrives through the builder — nothing is reached through
//! ambient globals — so any piece can be swapped for a test double.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_rag::{RagPipeline, RagConfig, InMemoryVectorStore, WordWindowChunker};
//!
//! let config = RagConfig::default();
//! let pipeline = RagPipeline::builder()
//!     .config(config.clone())
//!     .embedding_provider(Arc::new(embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chunker(Arc::new(WordWindowChunker::new(config.chunk_size, config.chunk_overlap)?))
//!     .judge_model(judge)
//!     .synthesis_model(generator)
//!     .web_search(Arc::new(search))   // optional
//!     .build()?;
//!
//! pipeline.ingest_directory("user-7", &kb_dir).await?;
//! let answer = pipeline.answer("user-7", "What does the Q3 report say?").await?;
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use docqa_model::Llm;
use tracing::{error, info};

use crate::augment::ContextAugmenter;
use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{format_context, Answer, Chunk, EmbeddingRecord};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::loader;
use crate::synthesis::Synthesizer;
use crate::vectorstore::VectorStore;
use crate::websearch::WebSearch;

/// The answering pipeline.
///
/// Holds every stage behind its trait seam. One pipeline instance serves
/// many concurrent queries; per-query state never outlives a call.
pub struct RagPipeline {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
    augmenter: Option<ContextAugmenter>,
    synthesizer: Synthesizer,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Ingest a knowledge-base directory: load → chunk → embed → store.
    ///
    /// Returns the number of records upserted. Unreadable files are
    /// skipped with a warning; re-ingesting an unchanged directory
    /// upserts onto the same record ids.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] naming the failed stage if the
    /// directory is unreadable or embedding/storage fails.
    pub async fn ingest_directory(&self, namespace: &str, dir: &Path) -> Result<usize> {
        let blocks = loader::load_directory(dir).map_err(|e| {
            error!(error = %e, "loading failed during ingestion");
            RagError::PipelineError(format!("loading failed for '{}': {e}", dir.display()))
        })?;

        // Chunk per block, numbering chunks consecutively within each
        // file so record ids stay stable across blocks.
        let mut next_index: HashMap<String, usize> = HashMap::new();
        let mut chunks: Vec<Chunk> = Vec::new();
        for block in &blocks {
            for mut chunk in self.chunker.chunk(block) {
                let index = next_index.entry(chunk.file_name.clone()).or_insert(0);
                chunk.index = *index;
                *index += 1;
                chunks.push(chunk);
            }
        }

        if chunks.is_empty() {
            info!(namespace, records = 0, "ingested knowledge base (empty)");
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(error = %e, "embedding failed during ingestion");
            RagError::PipelineError(format!("embedding failed during ingestion: {e}"))
        })?;

        let records: Vec<EmbeddingRecord> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, values)| EmbeddingRecord::from_chunk(chunk, values))
            .collect();

        self.store.upsert(namespace, &records).await.map_err(|e| {
            error!(namespace, error = %e, "upsert failed during ingestion");
            RagError::PipelineError(format!("upsert failed during ingestion: {e}"))
        })?;

        info!(namespace, records = records.len(), files = blocks.len(), "ingested knowledge base");
        Ok(records.len())
    }

    /// Answer a query: embed → retrieve → (optionally) augment → synthesize.
    ///
    /// When no web-search client is configured, retrieval context passes
    /// to synthesis unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] naming the failed stage.
    pub async fn answer(&self, namespace: &str, query: &str) -> Result<Answer> {
        let query_embedding = self.embedder.embed(query).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;

        let matches = self
            .store
            .query(namespace, &query_embedding, self.config.top_k)
            .await
            .map_err(|e| {
                error!(namespace, error = %e, "retrieval failed");
                RagError::PipelineError(format!("retrieval failed in '{namespace}': {e}"))
            })?;

        let mut context = format_context(&matches);

        if let Some(augmenter) = &self.augmenter {
            context = augmenter.augment(query, context).await.map_err(|e| {
                error!(error = %e, "web augmentation failed");
                RagError::PipelineError(format!("web augmentation failed: {e}"))
            })?;
        }

        let answer = self.synthesizer.synthesize(query, &context).await.map_err(|e| {
            error!(error = %e, "synthesis failed");
            RagError::PipelineError(format!("synthesis failed: {e}"))
        })?;

        info!(namespace, matches = matches.len(), references = answer.references.len(), "answered query");
        Ok(answer)
    }

    /// Delete every record in a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the store operation fails.
    pub async fn purge(&self, namespace: &str) -> Result<()> {
        self.store.purge(namespace).await.map_err(|e| {
            error!(namespace, error = %e, "purge failed");
            RagError::PipelineError(format!("purge failed for '{namespace}': {e}"))
        })
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields except `web_search` are required.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
    judge: Option<Arc<dyn Llm>>,
    synthesis: Option<Arc<dyn Llm>>,
    search: Option<Arc<dyn WebSearch>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the judge model used by the context-sufficiency loop.
    pub fn judge_model(mut self, judge: Arc<dyn Llm>) -> Self {
        self.judge = Some(judge);
        self
    }

    /// Set the generation model used for answer synthesis.
    pub fn synthesis_model(mut self, synthesis: Arc<dyn Llm>) -> Self {
        self.synthesis = Some(synthesis);
        self
    }

    /// Set the optional web-search client. When omitted, the
    /// context-sufficiency loop is skipped entirely.
    pub fn web_search(mut self, search: Arc<dyn WebSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// Build the [`RagPipeline`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required field is missing
    /// or the embedding provider's dimensionality does not match the
    /// configured index dimension. Both are caught here, before any
    /// network call is made.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::ConfigError("chunker is required".to_string()))?;
        let judge = self
            .judge
            .ok_or_else(|| RagError::ConfigError("judge_model is required".to_string()))?;
        let synthesis = self
            .synthesis
            .ok_or_else(|| RagError::ConfigError("synthesis_model is required".to_string()))?;

        if embedder.dimensions() != config.dimensions {
            return Err(RagError::ConfigError(format!(
                "embedding dimensions ({}) do not match index dimensions ({})",
                embedder.dimensions(),
                config.dimensions
            )));
        }

        let augmenter = self.search.map(|search| {
            ContextAugmenter::new(judge, search)
                .with_max_attempts(config.max_search_attempts)
                .with_max_snippets(config.max_snippets)
        });

        Ok(RagPipeline {
            config,
            embedder,
            store,
            chunker,
            augmenter,
            synthesizer: Synthesizer::new(synthesis),
        })
    }
}
