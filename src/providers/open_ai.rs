use crate::config::ProviderConfig;
use crate::error::PipelineError;
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

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, PipelineError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                PipelineError::BuilderError(
                    "OPENAI_API_KEY not found in config or environment".to_string(),
                )
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        Ok(OpenAIProvider {
            client: http_client(timeout)?,
            api_key,
            base_url,
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
        Ok(OpenAIProvider {
            client: http_client(DEFAULT_AI_TIMEOUT)?,
            api_key,
            base_url,
            model,
            temperature: 0.2,
            max_tokens: 4000,
        })
    }

    fn user_message(content: &ExtractionContent<'_>) -> Value {
        match content {
            ExtractionContent::Text(text) => json!({"role": "user", "content": text}),
            ExtractionContent::Image { data, mime_type } => json!({
                "role": "user",
                "content": [{
                    "type": "image_url",
                    "image_url": {
                        "url": format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
                    }
                }]
            }),
        }
    }
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, PipelineError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PipelineError::BuilderError(format!("Failed to create HTTP client: {e}")))
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn extract(&self, content: &ExtractionContent<'_>) -> Result<String, PipelineError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": RECIPE_EXTRACTION_PROMPT},
                    Self::user_message(content)
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await
            .map_err(|e| request_failed(self.provider_name(), e))?;

        let response_body = read_response(self.provider_name(), response).await?;
        debug!("{:?}", response_body);

        response_body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                PipelineError::ExtractionError(
                    "Failed to extract content from OpenAI response".to_string(),
                )
            })
    }
}
