//! Mock provider for tests and offline front-end work.

use super::{ChatCompletionProvider, ProviderError};
use crate::models::{ChatCompletion, ChatCompletionRequest};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behavior {
    /// Reply with the user message, so callers can tell whose prompt was answered.
    Echo,
    Reply(String),
    Fail(String),
}

/// Scripted provider. Only a call counter is kept by default; request bodies
/// are retained after [`MockChatProvider::recording`], so a long-running
/// `RECIPE_PROVIDER=mock` server does not grow without bound.
pub struct MockChatProvider {
    behavior: Behavior,
    delay: Duration,
    record: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl MockChatProvider {
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    pub fn replying(content: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(content.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            record: false,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Simulate upstream latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Keep every request for later inspection through [`Self::requests`].
    pub fn recording(mut self) -> Self {
        self.record = true;
        self
    }

    /// Requests received so far, in arrival order. Empty unless recording.
    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompletionProvider for MockChatProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.record {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.behavior {
            Behavior::Echo => {
                let content = request.user_content().ok_or_else(|| {
                    ProviderError::MalformedResponse("no user message to echo".to_string())
                })?;
                Ok(ChatCompletion::from_content(format!("# Recipe\n\n{}", content)))
            }
            Behavior::Reply(content) => Ok(ChatCompletion::from_content(content.clone())),
            Behavior::Fail(message) => Err(ProviderError::ApiError {
                status: 500,
                body: message.clone(),
            }),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
