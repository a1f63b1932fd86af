use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A finished recipe record.
///
/// Field names follow schema.org `Recipe` so the record can be handed to a
/// display layer unchanged. Once produced by the extraction pipeline, `image`
/// is always a single URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_yield: Option<RecipeYield>,
    #[serde(default, alias = "ingredients", deserialize_with = "one_or_many")]
    pub recipe_ingredient: Vec<Ingredient>,
    #[serde(
        default,
        alias = "steps",
        alias = "instructions",
        deserialize_with = "one_or_many"
    )]
    pub recipe_instructions: Vec<Instruction>,
}

/// Accept a list, a single value, or null
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}

/// Serving count or serving description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeYield {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredient {
    Text(String),
    Structured(StructuredIngredient),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredIngredient {
    pub food: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Quantity {
    /// Numeric amount. Text contributes its leading number ("250g" is 250,
    /// "1 1/2" is 1); 0 when it does not start with one.
    pub fn amount(&self) -> f64 {
        match self {
            Quantity::Number(n) => *n,
            Quantity::Text(s) => leading_number(s.trim()).unwrap_or(0.0),
        }
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_point = false;
    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    text[..end].trim_end_matches('.').parse().ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instruction {
    Text(String),
    Step(StructuredStep),
}

/// A step object. Two historical shapes exist: `{"text": ..}` and
/// `{"instruction": ..}`; anything else is kept so it can be rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instruction {
    /// Step body: `text`, then `instruction`, then the whole step rendered as JSON
    pub fn body(&self) -> String {
        match self {
            Instruction::Text(s) => s.clone(),
            Instruction::Step(step) => step
                .text
                .clone()
                .or_else(|| step.instruction.clone())
                .unwrap_or_else(|| serde_json::to_string(step).unwrap_or_default()),
        }
    }
}

/// The image field as the model (or a JSON-LD block) may emit it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageField {
    Url(String),
    List(Vec<ImageEntry>),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageEntry {
    Url(String),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageObject {
    pub url: Option<String>,
}

impl ImageField {
    /// Collapse any shape to at most one candidate URL
    pub fn candidate(&self) -> Option<String> {
        let url = match self {
            ImageField::Url(url) => Some(url.clone()),
            ImageField::List(entries) => entries.first().and_then(|entry| match entry {
                ImageEntry::Url(url) => Some(url.clone()),
                ImageEntry::Object(obj) => obj.url.clone(),
                ImageEntry::Other(_) => None,
            }),
            ImageField::Object(obj) => obj.url.clone(),
            ImageField::Other(_) => None,
        };
        url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
    }
}

/// A parsed but not yet enriched model response
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Raw image field, replaced by the resolved URL during enrichment
    #[serde(default, rename = "image")]
    pub image_field: Option<ImageField>,
}
