//! Tandoor recipe-manager integration: schema adapter, HTTP client and the
//! two export flows (AI-extracted record, native URL import).

pub mod adapter;
pub mod client;
pub mod export;
pub mod schema;

pub use adapter::{parse_duration, parse_servings, split_collapsed_steps, to_tandoor, Servings};
pub use client::TandoorClient;
pub use export::{export_recipe, import_from_url, ExportOutcome};
pub use schema::{CreatedRecipe, ImportedRecipe, ImportedStep, TandoorRecipe};

use serde::Deserialize;
use std::fmt;

/// `Authorization` header conventions accepted by Tandoor deployments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Bearer,
    Token,
}

impl AuthScheme {
    pub fn other(self) -> Self {
        match self {
            AuthScheme::Bearer => AuthScheme::Token,
            AuthScheme::Token => AuthScheme::Bearer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Token => "Token",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
