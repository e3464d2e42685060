use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    },
    Client as OpenAiClient,
};
use async_trait::async_trait;
use finrag_core::GenerationError;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::model::{Generation, LanguageModel};

/// Configuration for the OpenAI chat model
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub model: String,
    pub temperature: f32,
    pub requests_per_minute: u32,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo".to_string(),
            temperature: 0.1,
            requests_per_minute: 10,
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

/// OpenAI chat completion client with rate limiting and retry logic.
///
/// Retries live here, inside the model boundary; the retrieval pipeline
/// itself never retries.
pub struct OpenAiChatModel {
    client: OpenAiClient<OpenAIConfig>,
    rate_limiter: Arc<governor::DefaultDirectRateLimiter>,
    config: OpenAiConfig,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiConfig, api_key: String) -> Result<Self> {
        tracing::info!(
            "Initializing OpenAI client: model={}, rate_limit={}/min",
            config.model,
            config.requests_per_minute
        );

        let client = OpenAiClient::with_config(OpenAIConfig::new().with_api_key(api_key));

        let requests_per_minute = NonZeroU32::new(config.requests_per_minute)
            .ok_or_else(|| anyhow!("requests_per_minute must be > 0"))?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(requests_per_minute)));

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    async fn call_openai(&self, prompt: &str, max_tokens: u32) -> Result<Generation, GenerationError> {
        let request = CreateChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                    name: None,
                },
            )],
            max_tokens: Some(max_tokens),
            temperature: Some(self.config.temperature),
            ..Default::default()
        };

        let response = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_seconds),
            self.client.chat().create(request),
        )
        .await
        .map_err(|_| GenerationError::Timeout(self.config.timeout_seconds))?
        .map_err(|e| GenerationError::Backend(e.to_string()))?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(GenerationError::EmptyResponse)?;

        let usage = response.usage;

        Ok(Generation {
            text,
            model: response.model,
            input_tokens: usage.as_ref().map(|u| u.prompt_tokens),
            output_tokens: usage.as_ref().map(|u| u.completion_tokens),
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<Generation, GenerationError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!("Sending prompt to OpenAI (length: {} chars)", prompt.len());

        let mut last_error = None;

        for attempt in 0..self.config.max_retries {
            match self.call_openai(prompt, max_tokens).await {
                Ok(generation) => {
                    tracing::info!(
                        "OpenAI response received: model={}, output_tokens={:?}, length={} chars",
                        generation.model,
                        generation.output_tokens,
                        generation.text.len()
                    );
                    return Ok(generation);
                }
                Err(e) => {
                    last_error = Some(e);

                    if attempt + 1 < self.config.max_retries {
                        let backoff_ms = 2_u64.pow(attempt) * 1000; // Exponential backoff
                        tracing::warn!(
                            "OpenAI call failed (attempt {}/{}), retrying in {}ms: {}",
                            attempt + 1,
                            self.config.max_retries,
                            backoff_ms,
                            last_error.as_ref().unwrap()
                        );
                        sleep(Duration::from_millis(backoff_ms)).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| GenerationError::Backend("all retry attempts failed".to_string())))
    }
}
