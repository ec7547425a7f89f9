//! Scripted mock model for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{Llm, ModelError, Result};

/// An [`Llm`] that replays a fixed queue of responses.
///
/// Each call to [`generate`](Llm::generate) pops the next scripted
/// response; once the queue is exhausted, calls fail with
/// [`ModelError::Request`], which doubles as a way to script an
/// unreachable model.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_model::{Llm, MockLlm};
///
/// let model = MockLlm::new(["first reply", "second reply"]);
/// assert_eq!(model.generate("x").await?, "first reply");
/// assert_eq!(model.call_count(), 1);
/// ```
pub struct MockLlm {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl MockLlm {
    /// Create a mock that returns the given responses in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock whose every call fails, as if the service were down.
    pub fn failing() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Number of times [`generate`](Llm::generate) has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses.lock().await.pop_front().ok_or_else(|| ModelError::Request {
            provider: "mock".into(),
            message: "no scripted response left".into(),
        })
    }
}
