//! Extraction Orchestrator.
//!
//! One linear pass per request:
//! Start (fetch page for URLs) → Extracting (AI call) → Normalizing →
//! Enriching (source URL, image) → Done. Nothing is retried automatically;
//! [`ExtractionSession::retry`] re-runs the whole pass with the same input.

pub mod image;
pub mod session;
pub mod text;
pub mod url;

pub use session::{ExtractionSession, SessionOutcome};

use crate::builder::RecipeExtractorBuilder;
use crate::config::{FetchConfig, ImageConfig};
use crate::error::PipelineError;
use crate::images::ImageResolver;
use crate::model::{CandidateRecipe, Recipe};
use crate::normalize::normalize_response;
use crate::providers::{ExtractionContent, LlmProvider};
use crate::url_to_text::RequestFetcher;
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;

/// One extraction request.
///
/// Deserialises from the inbound `{"type": "url" | "text", "content": ...}`
/// body; images arrive as uploaded bytes instead.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ExtractionInput {
    Url(String),
    Text(String),
    #[serde(skip_deserializing)]
    Image { data: Vec<u8>, mime_type: String },
}

impl ExtractionInput {
    /// Read an image file, guessing the MIME type from its extension
    pub async fn image_from_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let (data, mime_type) = image::load(path.as_ref()).await?;
        Ok(ExtractionInput::Image { data, mime_type })
    }

    fn kind(&self) -> &'static str {
        match self {
            ExtractionInput::Url(_) => "url",
            ExtractionInput::Text(_) => "text",
            ExtractionInput::Image { .. } => "image",
        }
    }
}

/// Turns a URL, text or photo into a finished [`Recipe`]
pub struct RecipeExtractor {
    provider: Box<dyn LlmProvider>,
    fetcher: RequestFetcher,
    images: ImageResolver,
}

impl RecipeExtractor {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        fetch: &FetchConfig,
        images: ImageConfig,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            provider,
            fetcher: RequestFetcher::new(fetch)?,
            images: ImageResolver::new(images)?,
        })
    }

    pub fn builder() -> RecipeExtractorBuilder {
        RecipeExtractorBuilder::default()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Run the full extraction pass for one input
    pub async fn extract(&self, input: &ExtractionInput) -> Result<Recipe, PipelineError> {
        info!(
            "Extracting recipe from {} input with {}",
            input.kind(),
            self.provider.provider_name()
        );

        // Start
        let raw = match input {
            ExtractionInput::Url(url) => {
                let page = url::page_text(&self.fetcher, url).await?;
                debug!("Extracting: {} chars of page text", page.len());
                self.provider
                    .extract(&ExtractionContent::Text(&page))
                    .await?
            }
            ExtractionInput::Text(text) => {
                let text = text::validate(text)?;
                debug!("Extracting: {} chars of pasted text", text.len());
                self.provider.extract(&ExtractionContent::Text(text)).await?
            }
            ExtractionInput::Image { data, mime_type } => {
                let mime_type = image::validate(data, mime_type, self.provider.provider_name())?;
                debug!("Extracting: {} byte {} image", data.len(), mime_type);
                self.provider
                    .extract(&ExtractionContent::Image {
                        data,
                        mime_type: &mime_type,
                    })
                    .await?
            }
        };

        debug!("Normalizing {} chars of model output", raw.len());
        let candidate = parse_candidate(&raw)?;

        debug!("Enriching '{}'", candidate.recipe.name);
        let recipe = self.enrich(candidate, input).await;

        info!("Extracted recipe '{}'", recipe.name);
        Ok(recipe)
    }

    async fn enrich(&self, candidate: CandidateRecipe, input: &ExtractionInput) -> Recipe {
        let CandidateRecipe {
            mut recipe,
            image_field,
        } = candidate;

        if let ExtractionInput::Url(source) = input {
            if recipe.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
                recipe.url = Some(source.trim().to_string());
            }
        }

        let image = self
            .images
            .resolve(image_field.as_ref(), &recipe.name, &recipe.recipe_ingredient)
            .await;
        recipe.image = Some(image);
        recipe
    }
}

/// Normalize the model output and check it describes a recipe
fn parse_candidate(raw: &str) -> Result<CandidateRecipe, PipelineError> {
    let value = normalize_response(raw)?;

    if let Some(reason) = value.get("error").and_then(|e| e.as_str()) {
        if !reason.trim().is_empty() {
            return Err(PipelineError::ExtractionError(format!(
                "not a recipe: {}",
                reason.trim()
            )));
        }
    }

    let candidate: CandidateRecipe = serde_json::from_value(value)
        .map_err(|e| PipelineError::parse(format!("unexpected recipe shape: {e}"), raw))?;

    if candidate.recipe.name.trim().is_empty() {
        return Err(PipelineError::parse("recipe has no name", raw));
    }

    Ok(candidate)
}
