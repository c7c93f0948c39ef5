//! Hugging Face Inference provider.
//!
//! Talks to the OpenAI-compatible `/chat/completions` route exposed by the
//! Hugging Face inference router.

use super::{ChatCompletionProvider, ProviderError};
use crate::config::HuggingFaceConfig;
use crate::models::{ChatCompletion, ChatCompletionRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,
    client: Client,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| {
            ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatCompletionProvider for HuggingFaceProvider {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletion, ProviderError> {
        let token = self.config.access_token.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured("HF_ACCESS_TOKEN is not set".to_string())
        })?;

        tracing::debug!(
            model = %request.model,
            message_count = request.messages.len(),
            max_tokens = request.max_tokens,
            "Sending request to Hugging Face chat completion API"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(token.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited(body));
            }

            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.config.access_token {
            Some(_) => Ok(()),
            None => Err(ProviderError::NotConfigured(
                "HF_ACCESS_TOKEN is not set".to_string(),
            )),
        }
    }
}
