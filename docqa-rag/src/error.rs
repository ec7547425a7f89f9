//! Error types for the `docqa-rag` crate.

use thiserror::Error;

/// Errors that can occur in the answering pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// A document could not be loaded or extracted.
    #[error("Loader error ({file}): {message}")]
    LoaderError {
        /// The file (or directory) that failed to load.
        file: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the web search backend.
    #[error("Search error ({provider}): {message}")]
    SearchError {
        /// The search provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A generation or judge model call failed.
    #[error("Model error ({provider}): {message}")]
    ModelError {
        /// The model that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error. Fatal before any network call.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in pipeline orchestration, naming the failed stage.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

impl From<docqa_model::ModelError> for RagError {
    fn from(e: docqa_model::ModelError) -> Self {
        match e {
            docqa_model::ModelError::Config(message) => RagError::ConfigError(message),
            docqa_model::ModelError::Request { provider, message } => {
                RagError::ModelError { provider, message }
            }
            docqa_model::ModelError::EmptyResponse { provider } => {
                RagError::ModelError { provider, message: "empty response".into() }
            }
        }
    }
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
