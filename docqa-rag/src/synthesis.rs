//! Answer synthesis with citation extraction.

use std::sync::Arc;

use docqa_model::Llm;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::document::Answer;
use crate::error::Result;
use crate::prompts::{self, GENERATE_ANSWER};

/// The synthesis model's structured response shape.
#[derive(Debug, Deserialize)]
struct SynthesisResponse {
    answer: String,
    #[serde(default)]
    references: Vec<String>,
}

/// Produces the final [`Answer`] from a query and its context.
///
/// The model is asked for a JSON object with an answer and an ordered
/// reference list drawn from the context. Models drift from requested
/// shapes, so parsing is tolerant: fences are stripped first, and a
/// response that still fails to parse becomes an `Answer` carrying the
/// raw text with no references — a model that ignores the format must
/// never fail the query.
pub struct Synthesizer {
    model: Arc<dyn Llm>,
}

impl Synthesizer {
    /// Create a new synthesizer around the given generation model.
    pub fn new(model: Arc<dyn Llm>) -> Self {
        Self { model }
    }

    /// Generate an answer for `query` grounded in `context`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ModelError`](crate::RagError::ModelError) only
    /// if the generation call itself fails; malformed output is absorbed
    /// into the fallback answer.
    pub async fn synthesize(&self, query: &str, context: &str) -> Result<Answer> {
        let prompt = prompts::render(GENERATE_ANSWER, query, context);
        let response = self.model.generate(&prompt).await?;

        match serde_json::from_str::<SynthesisResponse>(prompts::strip_code_fences(&response)) {
            Ok(parsed) => {
                debug!(references = parsed.references.len(), "synthesized structured answer");
                Ok(Answer { text: parsed.answer, references: parsed.references })
            }
            Err(e) => {
                warn!(error = %e, "unstructured synthesis response; returning raw text");
                Ok(Answer { text: response, references: Vec::new() })
            }
        }
    }
}
