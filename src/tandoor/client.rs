use crate::config::FetchConfig;
use crate::error::PipelineError;
use crate::tandoor::schema::{CreatedRecipe, ImportedRecipe, SourceImport};
use crate::tandoor::AuthScheme;
use log::{debug, info, warn};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE, ORIGIN, REFERER};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::sync::Mutex;

const IMPORT_ENDPOINT: &str = "/api/recipe-from-source/";
const RECIPE_ENDPOINT: &str = "/api/recipe/";

/// Why a request never produced a usable response
enum SendFailure {
    Transport(String),
    Auth { status: u16, body: String },
    Header(reqwest::header::InvalidHeaderValue),
}

impl SendFailure {
    fn into_error(self, transport: impl FnOnce(String) -> PipelineError) -> PipelineError {
        match self {
            SendFailure::Transport(message) => transport(message),
            SendFailure::Auth { status, body } => PipelineError::AuthError { status, body },
            SendFailure::Header(e) => PipelineError::HeaderError(e),
        }
    }
}

/// Session-scoped client for one Tandoor instance and one API token.
///
/// Tandoor deployments accept either `Bearer <token>` or `Token <token>`.
/// Every request is tried with the currently assumed scheme and, on 401/403,
/// once more with the other one. The scheme that works is remembered for the
/// lifetime of this client only.
pub struct TandoorClient {
    client: Client,
    base_url: String,
    token: String,
    scheme: Mutex<AuthScheme>,
}

impl TandoorClient {
    /// Requests, including image downloads, use the fetch timeout and browser
    /// user agent from `fetch`
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        fetch: &FetchConfig,
    ) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(fetch.timeout())
            .user_agent(fetch.user_agent.as_str())
            .build()
            .map_err(|e| PipelineError::BuilderError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            token: token.into().trim().to_string(),
            scheme: Mutex::new(AuthScheme::default()),
        })
    }

    /// Start the session with a different scheme
    pub fn with_scheme(self, scheme: AuthScheme) -> Self {
        self.remember(scheme);
        self
    }

    /// Scheme the next request will try first
    pub fn auth_scheme(&self) -> AuthScheme {
        *self
            .scheme
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn remember(&self, scheme: AuthScheme) {
        *self
            .scheme
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = scheme;
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_with<F>(&self, scheme: AuthScheme, build: &F) -> Result<Response, SendFailure>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut header = HeaderValue::from_str(&format!("{} {}", scheme, self.token))
            .map_err(SendFailure::Header)?;
        header.set_sensitive(true);

        build(&self.client)
            .header(AUTHORIZATION, header)
            .send()
            .await
            .map_err(|e| SendFailure::Transport(e.to_string()))
    }

    /// Send a request, falling back to the other auth scheme once on 401/403
    async fn send_authorized<F>(&self, build: F) -> Result<Response, SendFailure>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let first = self.auth_scheme();
        let response = self.send_with(first, &build).await?;
        if !is_auth_rejection(response.status()) {
            return Ok(response);
        }

        let second = first.other();
        warn!(
            "Tandoor rejected {} auth ({}), retrying with {}",
            first,
            response.status(),
            second
        );

        let response = self.send_with(second, &build).await?;
        let status = response.status();
        if is_auth_rejection(status) {
            let body = response.text().await.unwrap_or_default();
            return Err(SendFailure::Auth {
                status: status.as_u16(),
                body,
            });
        }

        info!("Tandoor accepted {} auth; using it for this session", second);
        self.remember(second);
        Ok(response)
    }

    /// Ask Tandoor to scrape and parse a recipe page itself.
    ///
    /// The endpoint checks Origin/Referer like a same-site browser request.
    pub async fn parse_from_url(&self, url: &str) -> Result<ImportedRecipe, PipelineError> {
        let endpoint = self.endpoint(IMPORT_ENDPOINT);
        let origin = self.base_url.clone();
        let referer = format!("{}/", self.base_url);
        let body = serde_json::json!({"url": url, "data": ""});

        let import_failed = |message: String| PipelineError::ImportError {
            status: 0,
            message,
            body: String::new(),
        };

        let response = self
            .send_authorized(|client| {
                client
                    .post(&endpoint)
                    .header(ORIGIN, origin.as_str())
                    .header(REFERER, referer.as_str())
                    .json(&body)
            })
            .await
            .map_err(|e| e.into_error(import_failed))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(PipelineError::ImportError {
                status: status.as_u16(),
                message: "Tandoor's internal parser likely could not handle this page. Try AI extraction instead.".to_string(),
                body: text,
            });
        }
        if !status.is_success() {
            return Err(PipelineError::ImportError {
                status: status.as_u16(),
                message: "Tandoor rejected the import request".to_string(),
                body: text,
            });
        }

        let parsed: SourceImport =
            serde_json::from_str(&text).map_err(|e| PipelineError::ImportError {
                status: status.as_u16(),
                message: format!("Unreadable import response: {e}"),
                body: text.clone(),
            })?;

        if parsed.error {
            return Err(PipelineError::ImportError {
                status: status.as_u16(),
                message: parsed
                    .msg
                    .unwrap_or_else(|| "Tandoor could not import this page".to_string()),
                body: text,
            });
        }

        let mut recipe = parsed.recipe_json.ok_or_else(|| PipelineError::ImportError {
            status: status.as_u16(),
            message: "Tandoor found no recipe on this page. Try AI extraction instead."
                .to_string(),
            body: text.clone(),
        })?;

        if recipe.image.as_deref().map_or(true, str::is_empty) {
            recipe.image = parsed.images.into_iter().find(|i| !i.is_empty());
        }

        debug!(
            "Tandoor parsed '{}' with {} steps",
            recipe.name,
            recipe.steps.len()
        );
        Ok(recipe)
    }

    /// Persist a recipe. On refusal the sent payload travels back in the error.
    pub async fn create_recipe<P: Serialize>(
        &self,
        payload: &P,
    ) -> Result<CreatedRecipe, PipelineError> {
        let endpoint = self.endpoint(RECIPE_ENDPOINT);
        let body = serde_json::to_value(payload).map_err(|e| PipelineError::CreateError {
            status: 0,
            body: format!("Failed to serialise recipe: {e}"),
            candidate: Box::new(serde_json::Value::Null),
        })?;

        let response = self
            .send_authorized(|client| client.post(&endpoint).json(&body))
            .await
            .map_err(|e| {
                e.into_error(|message| PipelineError::CreateError {
                    status: 0,
                    body: message,
                    candidate: Box::new(body.clone()),
                })
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(PipelineError::CreateError {
                status: status.as_u16(),
                body: text,
                candidate: Box::new(body),
            });
        }

        let created: CreatedRecipe =
            serde_json::from_str(&text).map_err(|e| PipelineError::CreateError {
                status: status.as_u16(),
                body: format!("Unreadable create response ({e}): {text}"),
                candidate: Box::new(body.clone()),
            })?;

        info!("Created Tandoor recipe {} '{}'", created.id, created.name);
        Ok(created)
    }

    /// Download `image_url` and attach it to an existing recipe
    pub async fn upload_image(&self, recipe_id: i64, image_url: &str) -> Result<(), PipelineError> {
        let upload_failed = |message: String| PipelineError::UploadError { recipe_id, message };

        let image = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|e| upload_failed(format!("could not download {image_url}: {e}")))?;
        if !image.status().is_success() {
            return Err(upload_failed(format!(
                "could not download {image_url}: status {}",
                image.status()
            )));
        }

        let mime = image_mime(
            image
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );
        let data = image
            .bytes()
            .await
            .map_err(|e| upload_failed(format!("could not read {image_url}: {e}")))?;
        let file_name = format!("image.{}", extension(mime));

        let endpoint = self.endpoint(&format!("{RECIPE_ENDPOINT}{recipe_id}/image/"));
        let response = self
            .send_authorized(|client| {
                client
                    .put(&endpoint)
                    .multipart(Form::new().part("image", image_part(&data, mime, &file_name)))
            })
            .await
            .map_err(|e| e.into_error(upload_failed))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upload_failed(format!("Tandoor returned {status}: {body}")));
        }

        debug!("Attached {} byte image to recipe {}", data.len(), recipe_id);
        Ok(())
    }
}

fn is_auth_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn image_mime(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());
    match essence.as_deref() {
        Some("image/png") => "image/png",
        Some("image/webp") => "image/webp",
        Some("image/gif") => "image/gif",
        _ => "image/jpeg",
    }
}

fn extension(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

fn image_part(data: &[u8], mime: &str, file_name: &str) -> Part {
    let part = Part::bytes(data.to_vec()).file_name(file_name.to_string());
    match part.mime_str(mime) {
        Ok(part) => part,
        Err(_) => Part::bytes(data.to_vec()).file_name(file_name.to_string()),
    }
}
