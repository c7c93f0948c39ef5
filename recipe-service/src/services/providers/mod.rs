//! Chat-completion provider abstraction.
//!
//! The handler only sees `dyn ChatCompletionProvider`; the concrete backend
//! (Hugging Face Inference or the mock) is picked once at startup.

pub mod huggingface;
pub mod mock;

pub use huggingface::HuggingFaceProvider;
pub use mock::MockChatProvider;

use crate::models::{ChatCompletion, ChatCompletionRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    /// Short identifier used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Run one chat completion.
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletion, ProviderError>;

    /// Cheap readiness check; does not call the upstream API.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
