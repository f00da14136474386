//! Recipe generation with a guaranteed answer.
//!
//! `generate_recipe` asks the AI collaborator and reports every failure as a
//! `GenerationError`; `generate_or_fallback` turns any such failure into a
//! static recipe for the current time of day, so the user always gets a recipe.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::models::recipe::Recipe;
use crate::recipes::fallback::fallback_recipe;
use crate::recipes::prompts::{
    recipe_prompt, recipe_system, RECIPE_OPTIONS, VISION_OPTIONS, VISION_PROMPT, VISION_SYSTEM,
};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("AI quota exceeded: {0}")]
    Quota(#[source] LlmError),

    #[error("AI request failed: {0}")]
    Request(#[source] LlmError),

    #[error("AI response was malformed: {0}")]
    Malformed(String),

    #[error("no ingredients could be recognized")]
    NoIngredients,
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => GenerationError::Malformed(e.to_string()),
            e @ LlmError::EmptyContent => GenerationError::Malformed(e.to_string()),
            e if e.is_quota() => GenerationError::Quota(e),
            e => GenerationError::Request(e),
        }
    }
}

impl GenerationError {
    /// Text shown next to a fallback recipe.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::Quota(_) => {
                "Cota da IA excedida. Mostrando uma receita sugerida para este horário."
            }
            _ => "IA indisponível no momento. Mostrando uma receita sugerida para este horário.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedRecipe {
    pub recipe: Recipe,
    pub source: RecipeSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn generate_recipe(
    llm: Option<&LlmClient>,
    ingredients: &str,
    preferences: &str,
) -> Result<Recipe, GenerationError> {
    let llm = llm.ok_or(GenerationError::NotConfigured)?;
    if ingredients.trim().is_empty() {
        return Err(GenerationError::NoIngredients);
    }

    let recipe: Recipe = llm
        .call_json(&recipe_prompt(ingredients, preferences), &recipe_system(), RECIPE_OPTIONS)
        .await?;

    if recipe.name.trim().is_empty() || recipe.ingredients.is_empty() || recipe.steps.is_empty() {
        return Err(GenerationError::Malformed(
            "recipe is missing a name, ingredients or steps".to_string(),
        ));
    }
    Ok(recipe)
}

pub async fn generate_or_fallback(
    llm: Option<&LlmClient>,
    ingredients: &str,
    preferences: &str,
) -> GeneratedRecipe {
    match generate_recipe(llm, ingredients, preferences).await {
        Ok(recipe) => {
            info!("Generated recipe '{}'", recipe.name);
            GeneratedRecipe {
                recipe,
                source: RecipeSource::Ai,
                message: None,
            }
        }
        Err(e) => {
            warn!("Recipe generation failed, serving fallback: {e}");
            GeneratedRecipe {
                recipe: fallback_recipe(),
                source: RecipeSource::Fallback,
                message: Some(e.user_message().to_string()),
            }
        }
    }
}

/// Accepts a full `data:` URL or bare base64, which is assumed to be JPEG.
pub fn image_data_url(image: &str) -> String {
    let image = image.trim();
    if image.starts_with("data:") {
        image.to_string()
    } else {
        format!("data:image/jpeg;base64,{image}")
    }
}

/// Lists the ingredients visible in a photo as a comma-separated string.
pub async fn recognize_ingredients(llm: &LlmClient, image: &str) -> Result<String, LlmError> {
    llm.describe_image(&image_data_url(image), VISION_PROMPT, VISION_SYSTEM, VISION_OPTIONS)
        .await
}
