use crate::config::{ProviderConfig, Settings};
use crate::error::PipelineError;
use crate::providers::{AnthropicProvider, GoogleProvider, LlmProvider, OpenAIProvider};
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, PipelineError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(PipelineError::BuilderError(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "openai" => Ok(Box::new(OpenAIProvider::new(config, timeout)?)),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config, timeout)?)),
            "google" => Ok(Box::new(GoogleProvider::new(config, timeout)?)),
            _ => Err(PipelineError::BuilderError(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Configuration for `provider_name`: the `[providers.<name>]` entry when
    /// present, otherwise the built-in defaults for that provider
    pub fn config_for(
        provider_name: &str,
        settings: Option<&Settings>,
    ) -> Result<ProviderConfig, PipelineError> {
        if let Some(config) = settings.and_then(|s| s.providers.get(provider_name)) {
            return Ok(config.clone());
        }

        let model = Self::default_model(provider_name).ok_or_else(|| {
            PipelineError::BuilderError(format!("Unknown provider: {}", provider_name))
        })?;

        Ok(ProviderConfig {
            enabled: true,
            model: model.to_string(),
            temperature: 0.2,
            max_tokens: 4000,
            api_key: None,
            base_url: None,
        })
    }

    /// Model used when the caller names a provider but no model
    pub fn default_model(provider_name: &str) -> Option<&'static str> {
        match provider_name {
            "openai" => Some("gpt-4o-mini"),
            "anthropic" => Some("claude-sonnet-4-5"),
            "google" => Some("gemini-2.5-flash"),
            _ => None,
        }
    }
}
