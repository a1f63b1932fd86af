use thiserror::Error;

/// Errors that can occur while extracting, adapting or exporting a recipe
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Failed to retrieve page content (network, timeout or non-success status)
    #[error("Failed to fetch URL: {0}")]
    FetchError(String),

    /// The AI service call failed, was rejected, or reported that the input is not a recipe
    #[error("Extraction failed: {0}")]
    ExtractionError(String),

    /// The AI response could not be coerced into a recipe record
    #[error("Failed to parse AI response: {message}")]
    ParseError {
        message: String,
        /// Raw model output, kept for diagnostics
        raw: String,
    },

    /// The recipe manager's own URL importer returned no usable record
    #[error("Native import failed ({status}): {message}")]
    ImportError {
        status: u16,
        message: String,
        body: String,
    },

    /// Both authorization schemes were rejected
    #[error("Authentication rejected by recipe manager ({status}) with both Bearer and Token schemes")]
    AuthError { status: u16, body: String },

    /// The recipe manager refused to persist the record
    #[error("Recipe creation failed ({status}): {body}")]
    CreateError {
        status: u16,
        body: String,
        /// The parsed record that was sent, so the caller keeps the work
        candidate: Box<serde_json::Value>,
    },

    /// Attaching the image failed after the recipe itself was created
    #[error("Image upload for recipe {recipe_id} failed: {message}")]
    UploadError { recipe_id: i64, message: String },

    /// Input rejected before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Error building an HTTP header (e.g. a token with control characters)
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl PipelineError {
    /// Build a `ParseError` from any message and the raw text it was produced from
    pub(crate) fn parse(message: impl Into<String>, raw: impl Into<String>) -> Self {
        PipelineError::ParseError {
            message: message.into(),
            raw: raw.into(),
        }
    }
}
