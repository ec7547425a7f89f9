//! Web search clients for context augmentation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::document::SearchSnippet;
use crate::error::{RagError, Result};

/// Per-request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on snippets consumed per search call.
const DEFAULT_MAX_RESULTS: usize = 5;

/// A provider of web search results.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Search for the given free-text query, returning snippets in
    /// provider ranking order.
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>>;
}

/// A [`WebSearch`] backed by the Google Custom Search JSON API.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::GoogleWebSearch;
///
/// let search = GoogleWebSearch::new("api-key", "engine-id")?;
/// let snippets = search.search("rust async traits").await?;
/// ```
pub struct GoogleWebSearch {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
    max_results: usize,
}

impl GoogleWebSearch {
    /// Create a new client with the given API key and search engine id.
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let engine_id = engine_id.into();
        if api_key.is_empty() || engine_id.is_empty() {
            return Err(RagError::SearchError {
                provider: "Google".into(),
                message: "API key and engine id must not be empty".into(),
            });
        }

        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
            RagError::SearchError {
                provider: "Google".into(),
                message: format!("failed to build HTTP client: {e}"),
            }
        })?;

        Ok(Self { client, api_key, engine_id, max_results: DEFAULT_MAX_RESULTS })
    }

    /// Create a new client from the `GOOGLE_SEARCH_API_KEY` and
    /// `GOOGLE_SEARCH_ENGINE_ID` environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("GOOGLE_SEARCH_API_KEY").map_err(|_| RagError::SearchError {
                provider: "Google".into(),
                message: "GOOGLE_SEARCH_API_KEY environment variable not set".into(),
            })?;
        let engine_id =
            std::env::var("GOOGLE_SEARCH_ENGINE_ID").map_err(|_| RagError::SearchError {
                provider: "Google".into(),
                message: "GOOGLE_SEARCH_ENGINE_ID environment variable not set".into(),
            })?;
        Self::new(api_key, engine_id)
    }

    /// Cap the number of snippets consumed per search call.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: String,
    #[serde(default)]
    snippet: String,
}

#[async_trait]
impl WebSearch for GoogleWebSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>> {
        debug!(query, "web search");

        let url = format!(
            "https://www.googleapis.com/customsearch/v1?key={}&cx={}&q={}",
            self.api_key,
            self.engine_id,
            urlencoding::encode(query)
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = %e, "search request failed");
            RagError::SearchError {
                provider: "Google".into(),
                message: format!("request failed: {e}"),
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            error!(%status, "search API error");
            return Err(RagError::SearchError {
                provider: "Google".into(),
                message: format!("API returned {status}"),
            });
        }

        let search_response: SearchResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse search response");
            RagError::SearchError {
                provider: "Google".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(search_response
            .items
            .into_iter()
            .take(self.max_results)
            .filter(|item| !item.snippet.trim().is_empty())
            .map(|item| SearchSnippet { content: item.snippet, link: item.link })
            .collect())
    }
}
