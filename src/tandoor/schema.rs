use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body for `POST /api/recipe/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TandoorRecipe {
    pub name: String,
    pub description: String,
    pub steps: Vec<TandoorStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Minutes
    pub working_time: u32,
    /// Minutes
    pub waiting_time: u32,
    pub servings: u32,
    pub servings_text: String,
    pub internal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TandoorStep {
    pub instruction: String,
    pub ingredients: Vec<TandoorIngredient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_ingredients_table: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TandoorIngredient {
    pub food: NamedRef,
    pub unit: Option<NamedRef>,
    pub amount: f64,
    pub note: String,
}

/// Foods and units are referenced by name; Tandoor creates missing ones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Response of `POST /api/recipe-from-source/`
#[derive(Debug, Clone, Deserialize)]
pub struct SourceImport {
    #[serde(default)]
    pub recipe_json: Option<ImportedRecipe>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Tandoor's own parse of a page. Unknown fields are carried through
/// untouched so the record can be posted back for creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedRecipe {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<ImportedStep>,
    /// Image URL suggested by the importer; uploaded separately
    #[serde(default, skip_serializing)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedStep {
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub ingredients: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_ingredients_table: Option<bool>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Response of `POST /api/recipe/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecipe {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}
