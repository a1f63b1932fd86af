use crate::config::ProviderConfig;
use crate::error::PipelineError;
use crate::providers::open_ai::http_client;
use crate::providers::{
    read_response, request_failed, ExtractionContent, LlmProvider, DEFAULT_AI_TIMEOUT,
    RECIPE_EXTRACTION_PROMPT,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, PipelineError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                PipelineError::BuilderError(
                    "ANTHROPIC_API_KEY not found in config or environment".to_string(),
                )
            })?;

        Ok(AnthropicProvider {
            client: http_client(timeout)?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        model: String,
    ) -> Result<Self, PipelineError> {
        Ok(AnthropicProvider {
            client: http_client(DEFAULT_AI_TIMEOUT)?,
            api_key,
            base_url,
            model,
            temperature: 0.2,
            max_tokens: 4000,
        })
    }

    fn user_content(content: &ExtractionContent<'_>) -> Value {
        match content {
            ExtractionContent::Text(text) => json!(text),
            ExtractionContent::Image { data, mime_type } => json!([{
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": mime_type,
                    "data": STANDARD.encode(data)
                }
            }, {
                "type": "text",
                "text": "Extract the recipe shown in this image."
            }]),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    async fn extract(&self, content: &ExtractionContent<'_>) -> Result<String, PipelineError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "system": RECIPE_EXTRACTION_PROMPT,
                "messages": [
                    {
                        "role": "user",
                        "content": Self::user_content(content)
                    }
                ]
            }))
            .send()
            .await
            .map_err(|e| request_failed(self.provider_name(), e))?;

        let response_body = read_response(self.provider_name(), response).await?;
        debug!("{:?}", response_body);

        response_body["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                PipelineError::ExtractionError(
                    "Failed to extract content from Anthropic response".to_string(),
                )
            })
    }
}
