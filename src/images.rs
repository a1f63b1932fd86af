use crate::config::ImageConfig;
use crate::error::PipelineError;
use crate::model::{ImageField, Ingredient};
use html_escape::decode_html_entities;
use log::{debug, warn};
use reqwest::Client;

/// Ingredients mentioned in the generated-image prompt
const PROMPT_INGREDIENTS: usize = 3;

/// Resolves whatever the model put in `image` to exactly one URL.
///
/// A candidate is kept only when a HEAD request succeeds within the
/// configured bound; otherwise an image-generation URL is built from the
/// recipe name and leading ingredients. Resolution never fails.
pub struct ImageResolver {
    client: Client,
    config: ImageConfig,
}

impl ImageResolver {
    pub fn new(config: ImageConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(config.check_timeout())
            .build()
            .map_err(|e| PipelineError::BuilderError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub async fn resolve(
        &self,
        field: Option<&ImageField>,
        name: &str,
        ingredients: &[Ingredient],
    ) -> String {
        let candidate = field
            .and_then(ImageField::candidate)
            .map(|url| decode_html_entities(&url).into_owned())
            .filter(|url| url.starts_with("http"));

        if let Some(url) = candidate {
            if self.is_reachable(&url).await {
                return url;
            }
        }

        self.fallback_url(name, ingredients)
    }

    async fn is_reachable(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Image candidate {} is reachable", url);
                true
            }
            Ok(response) => {
                warn!(
                    "Image candidate {} rejected: status {}",
                    url,
                    response.status()
                );
                false
            }
            Err(e) => {
                warn!("Image candidate {} rejected: {}", url, e);
                false
            }
        }
    }

    /// Image-generation URL describing the dish
    pub fn fallback_url(&self, name: &str, ingredients: &[Ingredient]) -> String {
        let prompt = image_prompt(name, ingredients);
        format!(
            "{}/{}?width={}&height={}&model={}&nologo=true",
            self.config.fallback_base_url.trim_end_matches('/'),
            urlencoding::encode(&prompt),
            self.config.width,
            self.config.height,
            self.config.fallback_model,
        )
    }
}

fn image_prompt(name: &str, ingredients: &[Ingredient]) -> String {
    let name = match name.trim() {
        "" => "a homemade dish",
        trimmed => trimmed,
    };

    let leading: Vec<&str> = ingredients
        .iter()
        .take(PROMPT_INGREDIENTS)
        .map(|ingredient| match ingredient {
            Ingredient::Text(text) => text.as_str(),
            Ingredient::Structured(structured) => structured.food.as_str(),
        })
        .filter(|s| !s.trim().is_empty())
        .collect();

    if leading.is_empty() {
        format!("Professional food photography of {name}, appetizing, natural light")
    } else {
        format!(
            "Professional food photography of {name} made with {}, appetizing, natural light",
            leading.join(", ")
        )
    }
}
