mod anthropic;
mod factory;
mod google;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::RECIPE_EXTRACTION_PROMPT;

use crate::error::PipelineError;
use async_trait::async_trait;
use reqwest::Response;
use std::time::Duration;

/// Bound on one AI call when none is configured
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(60);

/// What gets sent to the model alongside the fixed instruction
#[derive(Debug, Clone, Copy)]
pub enum ExtractionContent<'a> {
    Text(&'a str),
    Image { data: &'a [u8], mime_type: &'a str },
}

/// Unified trait for all LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Run the recipe extraction instruction over the content and return the
    /// model's raw text reply
    async fn extract(&self, content: &ExtractionContent<'_>) -> Result<String, PipelineError>;
}

/// Turn a provider reply into its JSON body, or an `ExtractionError` naming the
/// provider, status and body when the call was rejected
pub(crate) async fn read_response(
    provider: &str,
    response: Response,
) -> Result<serde_json::Value, PipelineError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PipelineError::ExtractionError(format!(
            "{provider} returned {status}: {body}"
        )));
    }

    response
        .json()
        .await
        .map_err(|e| PipelineError::ExtractionError(format!("{provider} sent an unreadable body: {e}")))
}

pub(crate) fn request_failed(provider: &str, error: reqwest::Error) -> PipelineError {
    if error.is_timeout() {
        PipelineError::ExtractionError(format!("{provider} request timed out"))
    } else {
        PipelineError::ExtractionError(format!("{provider} request failed: {error}"))
    }
}
