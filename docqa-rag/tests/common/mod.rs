//! Shared test doubles for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use docqa_rag::document::SearchSnippet;
use docqa_rag::embedding::EmbeddingProvider;
use docqa_rag::error::Result;
use docqa_rag::websearch::WebSearch;

/// Deterministic hash-based embeddings: same text, same vector.
///
/// The direction depends on the text content, so different chunks land
/// at different points on the unit sphere and cosine search stays
/// meaningful without a real model.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut embedding = vec![0.0f32; self.dimensions];
        for (i, v) in embedding.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        // L2-normalise so cosine similarity is just the dot product.
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A web search stub returning one snippet per call and counting calls.
pub struct StubSearch {
    calls: AtomicUsize,
}

impl StubSearch {
    pub fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for StubSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![SearchSnippet {
            content: format!("web result {n} for {query}"),
            link: format!("https://example.test/{n}"),
        }])
    }
}
