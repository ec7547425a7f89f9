//! # docqa-model
//!
//! Language model clients for DocQA.
//!
//! This crate defines the [`Llm`] trait — the seam between the answering
//! pipeline and whatever chat model backs it — plus two implementations:
//!
//! - [`OpenAiChatClient`] — any OpenAI-compatible chat-completions API
//!   (hosted OpenAI, Ollama, vLLM, llama.cpp server, etc.)
//! - [`MockLlm`] — scripted responses for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docqa_model::{Llm, OpenAiChatClient};
//!
//! let model = OpenAiChatClient::from_env("gpt-4o-mini")?;
//! let text = model.generate("Say hello.").await?;
//! ```

use async_trait::async_trait;
use thiserror::Error;

pub mod mock;
pub mod openai;

pub use mock::MockLlm;
pub use openai::OpenAiChatClient;

/// Errors produced by model clients.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model request failed or the service returned an error.
    #[error("Model error ({provider}): {message}")]
    Request {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The model returned a response with no usable text.
    #[error("Model error ({provider}): empty response")]
    EmptyResponse {
        /// The model provider that produced the empty response.
        provider: String,
    },

    /// A client configuration error (missing key, bad URL).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// A text-in, text-out language model.
///
/// Implementations wrap a specific backend behind a uniform async
/// interface so callers can be handed any model as an `Arc<dyn Llm>`.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Return the model name (used in logs and error messages).
    fn name(&self) -> &str;

    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
