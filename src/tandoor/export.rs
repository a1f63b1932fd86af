use crate::error::PipelineError;
use crate::model::Recipe;
use crate::tandoor::adapter::{split_collapsed_steps, to_tandoor};
use crate::tandoor::client::TandoorClient;
use crate::tandoor::schema::CreatedRecipe;
use log::{info, warn};
use serde_json::Value;

/// A created recipe, plus the image upload error if attaching the image failed
#[derive(Debug)]
pub struct ExportOutcome {
    pub recipe: CreatedRecipe,
    pub image_error: Option<PipelineError>,
}

/// Push an extracted recipe into Tandoor: create it, then attach its image.
///
/// Strictly sequential; the image can only be attached once the recipe exists.
pub async fn export_recipe(
    client: &TandoorClient,
    recipe: &Recipe,
) -> Result<ExportOutcome, PipelineError> {
    let payload = to_tandoor(recipe);
    info!(
        "Exporting '{}' with {} steps to Tandoor",
        payload.name,
        payload.steps.len()
    );

    let created = client.create_recipe(&payload).await?;
    let image_error = attach_image(client, created.id, recipe.image.as_deref()).await;

    Ok(ExportOutcome {
        recipe: created,
        image_error,
    })
}

/// Let Tandoor parse the page itself, repair the steps, then create the recipe.
///
/// No AI call is involved.
pub async fn import_from_url(
    client: &TandoorClient,
    url: &str,
) -> Result<ExportOutcome, PipelineError> {
    let mut imported = client.parse_from_url(url).await?;
    imported.steps = split_collapsed_steps(std::mem::take(&mut imported.steps));
    imported
        .rest
        .insert("internal".to_string(), Value::Bool(true));

    let created = client
        .create_recipe(&imported)
        .await
        .map_err(|e| restore_image(e, imported.image.as_deref()))?;
    let image_error = attach_image(client, created.id, imported.image.as_deref()).await;

    Ok(ExportOutcome {
        recipe: created,
        image_error,
    })
}

/// The image is never part of the create body, so put it back on a refused
/// candidate before handing it to the caller
fn restore_image(error: PipelineError, image: Option<&str>) -> PipelineError {
    match (error, image) {
        (
            PipelineError::CreateError {
                status,
                body,
                mut candidate,
            },
            Some(image),
        ) => {
            if let Value::Object(fields) = candidate.as_mut() {
                fields.insert("image".to_string(), Value::String(image.to_string()));
            }
            PipelineError::CreateError {
                status,
                body,
                candidate,
            }
        }
        (error, _) => error,
    }
}

async fn attach_image(
    client: &TandoorClient,
    recipe_id: i64,
    image_url: Option<&str>,
) -> Option<PipelineError> {
    let image_url = image_url.filter(|u| u.starts_with("http"))?;
    match client.upload_image(recipe_id, image_url).await {
        Ok(()) => None,
        Err(e) => {
            warn!("Recipe {} created without image: {}", recipe_id, e);
            Some(e)
        }
    }
}
