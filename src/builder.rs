use std::time::Duration;

use crate::config::{FetchConfig, ImageConfig, Settings};
use crate::pipelines::RecipeExtractor;
use crate::providers::{LlmProvider, ProviderFactory, DEFAULT_AI_TIMEOUT};
use crate::PipelineError;

/// AI service to run extraction with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Google,
}

impl ProviderKind {
    /// Convert to provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
        }
    }
}

/// Builder for a configured [`RecipeExtractor`]
#[derive(Default)]
pub struct RecipeExtractorBuilder {
    settings: Option<Settings>,
    provider: Option<ProviderKind>,
    custom_provider: Option<Box<dyn LlmProvider>>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl RecipeExtractorBuilder {
    /// Start from loaded settings; explicit builder calls override them
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Select the AI provider
    ///
    /// # Example
    /// ```
    /// use tandoor_import::{ProviderKind, RecipeExtractor};
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .provider(ProviderKind::Anthropic);
    /// ```
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Use an already constructed provider, e.g. a test double
    pub fn with_provider(mut self, provider: Box<dyn LlmProvider>) -> Self {
        self.custom_provider = Some(provider);
        self
    }

    /// Set the API key instead of relying on environment variables or config files
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Point the provider at a proxy or compatible endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Bound on the AI call
    ///
    /// # Example
    /// ```
    /// use tandoor_import::RecipeExtractor;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .timeout(Duration::from_secs(45));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Build the extractor
    ///
    /// # Errors
    /// `BuilderError` when the provider is unknown, disabled, or has no API key.
    pub fn build(self) -> Result<RecipeExtractor, PipelineError> {
        let (fetch, images) = match &self.settings {
            Some(settings) => (settings.fetch.clone(), settings.images.clone()),
            None => (FetchConfig::default(), ImageConfig::default()),
        };

        let provider = match self.custom_provider {
            Some(provider) => provider,
            None => Self::make_provider(
                self.settings.as_ref(),
                self.provider,
                self.api_key,
                self.model,
                self.base_url,
                self.timeout,
            )?,
        };

        RecipeExtractor::new(provider, &fetch, images)
    }

    fn make_provider(
        settings: Option<&Settings>,
        provider: Option<ProviderKind>,
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn LlmProvider>, PipelineError> {
        let name = provider
            .map(|p| p.as_str().to_string())
            .or_else(|| settings.map(|s| s.default_provider.clone()))
            .unwrap_or_else(|| ProviderKind::Google.as_str().to_string());

        let timeout = timeout
            .or_else(|| settings.map(Settings::ai_timeout))
            .unwrap_or(DEFAULT_AI_TIMEOUT);

        let mut config = ProviderFactory::config_for(&name, settings)?;

        if let Some(key) = api_key {
            config.api_key = Some(key);
        }
        if let Some(model) = model {
            config.model = model;
        }
        if let Some(url) = base_url {
            config.base_url = Some(url);
        }

        ProviderFactory::create(&name, &config, timeout)
    }
}
