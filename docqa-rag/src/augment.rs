//! Context-sufficiency loop.
//!
//! A judge model decides whether retrieved context suffices to answer
//! the query; while it says no, a web search fills the gap and the judge
//! re-assesses. The loop is a bounded state machine:
//!
//! ```text
//! ASSESS ──sufficient──▶ done (context returned unchanged)
//!    │
//!    └──insufficient──▶ SEARCH ──append snippets──▶ ASSESS
//! ```
//!
//! A hard ceiling on SEARCH transitions guarantees termination against a
//! judge that never converges, and a failed or unparseable judge call
//! terminates the loop as "sufficient" — failing safe toward answering
//! with what we have rather than looping or erroring.

use std::sync::Arc;

use docqa_model::Llm;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::document::format_snippet;
use crate::error::Result;
use crate::prompts::{self, VALIDATE_CONTEXT};
use crate::websearch::WebSearch;

/// Default ceiling on web-search rounds per query.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Default cap on snippets appended per search round.
pub const DEFAULT_MAX_SNIPPETS: usize = 5;

/// The judge model's verdict on one ASSESS step.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JudgeDecision {
    /// `true` means the context is insufficient and a search is needed.
    pub search_mode: bool,
    /// Rationale. Advisory only; never drives control flow.
    #[serde(default)]
    pub detail: String,
    /// Short search phrase, required when `search_mode` is `true`.
    #[serde(default)]
    pub search_query: Option<String>,
}

/// Runs the bounded assess/search loop over a query's context.
///
/// Context is strictly append-only across iterations: earlier entries
/// never disappear, so citations stay traceable.
pub struct ContextAugmenter {
    judge: Arc<dyn Llm>,
    search: Arc<dyn WebSearch>,
    max_attempts: usize,
    max_snippets: usize,
}

impl ContextAugmenter {
    /// Create a new augmenter with the default attempt and snippet caps.
    pub fn new(judge: Arc<dyn Llm>, search: Arc<dyn WebSearch>) -> Self {
        Self {
            judge,
            search,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_snippets: DEFAULT_MAX_SNIPPETS,
        }
    }

    /// Set the ceiling on web-search rounds. Zero means the judge is
    /// consulted once but no search ever runs.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Cap the snippets appended to context per search round.
    pub fn with_max_snippets(mut self, max_snippets: usize) -> Self {
        self.max_snippets = max_snippets;
        self
    }

    /// Run the loop, returning the (possibly augmented) context.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::SearchError`](crate::RagError::SearchError) if
    /// a web search call fails. Judge failures never surface here; they
    /// terminate the loop with the context accumulated so far.
    pub async fn augment(&self, query: &str, mut context: String) -> Result<String> {
        let mut attempts = 0;

        loop {
            let Some(decision) = self.assess(query, &context).await else {
                break;
            };

            if !decision.search_mode {
                debug!(detail = %decision.detail, "judge deemed context sufficient");
                break;
            }

            if attempts >= self.max_attempts {
                warn!(attempts, "search attempt ceiling reached; answering with current context");
                break;
            }

            let Some(search_query) =
                decision.search_query.filter(|q| !q.trim().is_empty())
            else {
                warn!("judge requested a search without a query; treating context as sufficient");
                break;
            };

            info!(attempt = attempts + 1, query = %search_query, "augmenting context via web search");
            let snippets = self.search.search(&search_query).await?;
            if snippets.is_empty() {
                debug!(query = %search_query, "search returned no snippets");
            }
            for snippet in snippets.iter().take(self.max_snippets) {
                context.push('\n');
                context.push_str(&format_snippet(snippet));
            }

            attempts += 1;
        }

        Ok(context)
    }

    /// One ASSESS step. `None` means "treat as sufficient" — either the
    /// judge call failed or its response had no parseable decision.
    async fn assess(&self, query: &str, context: &str) -> Option<JudgeDecision> {
        let prompt = prompts::render(VALIDATE_CONTEXT, query, context);

        let response = match self.judge.generate(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "judge call failed; treating context as sufficient");
                return None;
            }
        };

        match serde_json::from_str::<JudgeDecision>(prompts::strip_code_fences(&response)) {
            Ok(decision) => Some(decision),
            Err(e) => {
                warn!(error = %e, "unparseable judge response; treating context as sufficient");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use docqa_model::MockLlm;

    use crate::document::SearchSnippet;
    use crate::error::RagError;

    /// Scripted search backend counting its invocations.
    struct StubSearch {
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubSearch {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), fail: false }
        }

        fn failing() -> Self {
            Self { calls: AtomicUsize::new(0), fail: true }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WebSearch for StubSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RagError::SearchError {
                    provider: "stub".into(),
                    message: "unreachable".into(),
                });
            }
            Ok(vec![SearchSnippet {
                content: format!("result {n} for {query}"),
                link: format!("https://example.test/{n}"),
            }])
        }
    }

    const INSUFFICIENT: &str =
        r#"{"search_mode": true, "detail": "missing facts", "search_query": "more facts please"}"#;
    const SUFFICIENT: &str = r#"{"search_mode": false, "detail": "enough context"}"#;

    fn augmenter(
        judge_responses: Vec<&str>,
        search: Arc<StubSearch>,
        max_attempts: usize,
    ) -> (ContextAugmenter, Arc<MockLlm>) {
        let judge = Arc::new(MockLlm::new(judge_responses));
        let aug = ContextAugmenter::new(judge.clone(), search).with_max_attempts(max_attempts);
        (aug, judge)
    }

    #[tokio::test]
    async fn sufficient_verdict_returns_context_unchanged_after_one_call() {
        let search = Arc::new(StubSearch::new());
        let (aug, judge) = augmenter(vec![SUFFICIENT], search.clone(), 5);

        let context = aug.augment("q", "original context".into()).await.unwrap();

        assert_eq!(context, "original context");
        assert_eq!(judge.call_count(), 1);
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn ceiling_bounds_searches_and_judge_calls() {
        // Judge never converges: max_attempts searches, max_attempts + 1
        // judge calls, then the loop exits with the accumulated context.
        let search = Arc::new(StubSearch::new());
        let (aug, judge) = augmenter(vec![INSUFFICIENT; 10], search.clone(), 3);

        let context = aug.augment("q", "base".into()).await.unwrap();

        assert_eq!(search.call_count(), 3);
        assert_eq!(judge.call_count(), 4);
        assert!(context.starts_with("base"));
        assert_eq!(context.matches("[Web: ").count(), 3);
    }

    #[tokio::test]
    async fn zero_ceiling_never_searches() {
        let search = Arc::new(StubSearch::new());
        let (aug, judge) = augmenter(vec![INSUFFICIENT], search.clone(), 0);

        let context = aug.augment("q", "base".into()).await.unwrap();

        assert_eq!(context, "base");
        assert_eq!(judge.call_count(), 1);
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn converging_judge_stops_searching() {
        let search = Arc::new(StubSearch::new());
        let (aug, judge) = augmenter(vec![INSUFFICIENT, SUFFICIENT], search.clone(), 5);

        let context = aug.augment("q", "base".into()).await.unwrap();

        assert_eq!(search.call_count(), 1);
        assert_eq!(judge.call_count(), 2);
        assert_eq!(context, "base\n[Web: https://example.test/0] result 0 for more facts please");
    }

    #[tokio::test]
    async fn fenced_judge_response_is_accepted() {
        let fenced = format!("```json\n{INSUFFICIENT}\n```");
        let search = Arc::new(StubSearch::new());
        let (aug, _) = augmenter(vec![fenced.as_str(), SUFFICIENT], search.clone(), 5);

        aug.augment("q", "base".into()).await.unwrap();

        assert_eq!(search.call_count(), 1);
    }

    #[tokio::test]
    async fn unparseable_judge_response_fails_safe() {
        let search = Arc::new(StubSearch::new());
        let (aug, judge) = augmenter(vec!["I cannot answer in JSON, sorry."], search.clone(), 5);

        let context = aug.augment("q", "base".into()).await.unwrap();

        assert_eq!(context, "base");
        assert_eq!(judge.call_count(), 1);
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn failed_judge_call_fails_safe() {
        let search = Arc::new(StubSearch::new());
        let judge = Arc::new(MockLlm::failing());
        let aug = ContextAugmenter::new(judge, search.clone()).with_max_attempts(5);

        let context = aug.augment("q", "base".into()).await.unwrap();

        assert_eq!(context, "base");
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn search_mode_without_query_fails_safe() {
        let search = Arc::new(StubSearch::new());
        let (aug, _) = augmenter(
            vec![r#"{"search_mode": true, "detail": "missing"}"#],
            search.clone(),
            5,
        );

        let context = aug.augment("q", "base".into()).await.unwrap();

        assert_eq!(context, "base");
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn snippet_cap_bounds_appended_results() {
        struct ManySnippets;

        #[async_trait]
        impl WebSearch for ManySnippets {
            async fn search(&self, _query: &str) -> Result<Vec<SearchSnippet>> {
                Ok((0..10)
                    .map(|n| SearchSnippet {
                        content: format!("snippet {n}"),
                        link: format!("https://example.test/{n}"),
                    })
                    .collect())
            }
        }

        let judge = Arc::new(MockLlm::new([INSUFFICIENT, SUFFICIENT]));
        let aug = ContextAugmenter::new(judge, Arc::new(ManySnippets))
            .with_max_attempts(5)
            .with_max_snippets(2);

        let context = aug.augment("q", "base".into()).await.unwrap();

        assert_eq!(context.matches("[Web: ").count(), 2);
    }

    #[tokio::test]
    async fn search_failure_surfaces_as_error() {
        let search = Arc::new(StubSearch::failing());
        let (aug, _) = augmenter(vec![INSUFFICIENT], search, 5);

        let result = aug.augment("q", "base".into()).await;

        assert!(matches!(result, Err(RagError::SearchError { .. })));
    }
}
