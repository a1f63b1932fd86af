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

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, PipelineError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                PipelineError::BuilderError(
                    "GOOGLE_API_KEY not found in config or environment".to_string(),
                )
            })?;

        Ok(GoogleProvider {
            client: http_client(timeout)?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
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
        Ok(GoogleProvider {
            client: http_client(DEFAULT_AI_TIMEOUT)?,
            api_key,
            base_url,
            model,
            temperature: 0.2,
            max_tokens: 4000,
        })
    }

    fn content_part(content: &ExtractionContent<'_>) -> Value {
        match content {
            ExtractionContent::Text(text) => json!({"text": text}),
            ExtractionContent::Image { data, mime_type } => json!({
                "inlineData": {
                    "mimeType": mime_type,
                    "data": STANDARD.encode(data)
                }
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn extract(&self, content: &ExtractionContent<'_>) -> Result<String, PipelineError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "systemInstruction": {
                    "parts": [{"text": RECIPE_EXTRACTION_PROMPT}]
                },
                "contents": [{
                    "role": "user",
                    "parts": [Self::content_part(content)]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens
                }
            }))
            .send()
            .await
            .map_err(|e| request_failed(self.provider_name(), e))?;

        let response_body = read_response(self.provider_name(), response).await?;
        debug!("{:?}", response_body);

        response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                PipelineError::ExtractionError(
                    "Failed to extract content from Google Gemini response".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_gemini_inline_image() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Regex(r#""mimeType":"image/webp""#.into()))
            .with_status(200)
            .with_body(
                r#"{"candidates": [{"content": {"parts": [{"text": "{\"name\": \"Tart\"}"}]}}]}"#,
            )
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url(
            "test-key".to_string(),
            server.url(),
            "gemini-2.5-flash".to_string(),
        )
        .unwrap();
        let result = provider
            .extract(&ExtractionContent::Image {
                data: b"webp",
                mime_type: "image/webp",
            })
            .await
            .unwrap();

        assert_eq!(result, r#"{"name": "Tart"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_missing_candidates() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url(
            "test-key".to_string(),
            server.url(),
            "gemini-2.5-flash".to_string(),
        )
        .unwrap();
        let result = provider.extract(&ExtractionContent::Text("x")).await;
        assert!(matches!(result, Err(PipelineError::ExtractionError(_))));
    }

    #[test]
    fn test_provider_name() {
        let config = ProviderConfig {
            enabled: true,
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.2,
            max_tokens: 2000,
            api_key: Some("test-key".to_string()),
            base_url: None,
        };

        let provider = GoogleProvider::new(&config, Duration::from_secs(60)).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }
}
