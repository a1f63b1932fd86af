//! Turn a recipe web page, a block of pasted text or a photo into a
//! schema.org-style recipe record with an AI model, and push it into a
//! Tandoor recipe manager.
//!
//! ```no_run
//! use tandoor_import::{export_recipe, ExtractionInput, RecipeExtractor, TandoorClient};
//!
//! # async fn run() -> Result<(), tandoor_import::PipelineError> {
//! let extractor = RecipeExtractor::builder().build()?;
//! let recipe = extractor
//!     .extract(&ExtractionInput::Url("https://example.com/pancakes".into()))
//!     .await?;
//!
//! let fetch = tandoor_import::config::FetchConfig::default();
//! let client = TandoorClient::new("https://recipes.example.com", "my-token", &fetch)?;
//! let outcome = export_recipe(&client, &recipe).await?;
//! println!("created recipe {}", outcome.recipe.id);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod images;
pub mod model;
pub mod normalize;
pub mod pipelines;
pub mod providers;
pub mod tandoor;
pub mod url_to_text;

pub use builder::{ProviderKind, RecipeExtractorBuilder};
pub use config::Settings;
pub use error::PipelineError;
pub use model::{Ingredient, Instruction, Recipe, RecipeYield};
pub use pipelines::{ExtractionInput, ExtractionSession, RecipeExtractor, SessionOutcome};
pub use tandoor::{
    export_recipe, import_from_url, AuthScheme, CreatedRecipe, ExportOutcome, TandoorClient,
};

/// Extract a recipe with the provider configured in `settings`
pub async fn extract_recipe(
    input: &ExtractionInput,
    settings: &Settings,
) -> Result<Recipe, PipelineError> {
    RecipeExtractor::builder()
        .settings(settings.clone())
        .build()?
        .extract(input)
        .await
}

/// Tandoor client for the `[tandoor]` config section
///
/// Fails with `BuilderError` when the base URL or token is missing.
pub fn tandoor_client(settings: &Settings) -> Result<TandoorClient, PipelineError> {
    let section = &settings.tandoor;
    let base_url = section
        .base_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| PipelineError::BuilderError("Tandoor base URL is not set".to_string()))?;
    let token = section
        .token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| PipelineError::BuilderError("Tandoor API token is not set".to_string()))?;

    Ok(TandoorClient::new(base_url, token, &settings.fetch)?.with_scheme(section.auth_scheme))
}
