//! # docqa-rag
//!
//! Retrieval-Augmented Generation pipeline for DocQA.
//!
//! Answers natural-language queries from a private document collection:
//! documents are extracted, chunked into overlapping word windows,
//! embedded, and indexed under a per-user namespace; at query time the
//! nearest chunks are retrieved, optionally augmented with live web
//! search when a judge model finds the context insufficient, and handed
//! to a generation model that produces a cited [`Answer`].
//!
//! ## Components
//!
//! - [`loader`] — PDF / docx / pptx / text extraction into [`TextBlock`]s
//! - [`WordWindowChunker`] — overlapping word-window chunking
//! - [`EmbeddingProvider`] — text → fixed-dimension vector
//! - [`VectorStore`] — namespaced upsert / query / purge
//!   ([`InMemoryVectorStore`], [`PineconeVectorStore`])
//! - [`ContextAugmenter`] — bounded judge/search sufficiency loop
//! - [`Synthesizer`] — structured answer generation with fallback
//! - [`RagPipeline`] — the orchestrator tying the stages together
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_rag::{InMemoryVectorStore, RagConfig, RagPipeline, WordWindowChunker};
//!
//! let config = RagConfig::default();
//! let pipeline = RagPipeline::builder()
//!     .config(config.clone())
//!     .embedding_provider(embedder)
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chunker(Arc::new(WordWindowChunker::new(config.chunk_size, config.chunk_overlap)?))
//!     .judge_model(model.clone())
//!     .synthesis_model(model)
//!     .build()?;
//!
//! pipeline.ingest_directory("user-7", kb_dir).await?;
//! let answer = pipeline.answer("user-7", "What changed in Q3?").await?;
//! ```

pub mod augment;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod loader;
pub mod openai;
pub mod pinecone;
pub mod pipeline;
pub mod prompts;
pub mod synthesis;
pub mod vectorstore;
pub mod websearch;

pub use augment::{ContextAugmenter, JudgeDecision};
pub use chunking::{Chunker, WordWindowChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{
    Answer, Chunk, EmbeddingRecord, RetrievalMatch, SearchSnippet, TextBlock, format_context,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use loader::load_directory;
pub use openai::OpenAiEmbeddingProvider;
pub use pinecone::PineconeVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use synthesis::Synthesizer;
pub use vectorstore::VectorStore;
pub use websearch::{GoogleWebSearch, WebSearch};
