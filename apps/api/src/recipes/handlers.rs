use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::types::Json as SqlJson;
use tracing::warn;

use crate::auth::AuthUser;
use crate::errors::{conflict_on_unique, AppError};
use crate::models::profile::Goal;
use crate::models::recipe::{Recipe, SavedRecipeRow};
use crate::profile::current_profile;
use crate::recipes::generator::{generate_or_fallback, recognize_ingredients, GeneratedRecipe};
use crate::recipes::preferences::{compile, PreferenceOverrides};
use crate::recipes::suggestions::{suggestions_for, Suggestion};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRecipeRequest {
    #[serde(default)]
    pub ingredients: String,
    pub meal_type: Option<String>,
    pub cook_time: Option<String>,
    pub preferences: Option<String>,
    pub image_base64: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageRequest {
    #[serde(default)]
    pub image_base64: String,
}

#[derive(Serialize)]
pub struct AnalyzeImageResponse {
    pub ingredients: String,
}

#[derive(Deserialize)]
pub struct SaveRecipeRequest {
    pub recipe: Recipe,
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub goal: Goal,
    pub suggestions: [Suggestion; 3],
}

/// POST /api/recipes/generate
///
/// Always answers with a recipe: AI failures are served from the static table.
pub async fn handle_generate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<GenerateRecipeRequest>,
) -> Result<Json<GeneratedRecipe>, AppError> {
    let image = req
        .image_base64
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty());
    let mut ingredients = req.ingredients.trim().to_string();
    if ingredients.is_empty() && image.is_none() {
        return Err(AppError::Validation(
            "Please provide the available ingredients".to_string(),
        ));
    }

    // Image recognition only adds ingredients; its failure is not fatal.
    if let (Some(image), Some(llm)) = (image, state.llm.as_ref()) {
        match recognize_ingredients(llm, image).await {
            Ok(found) if !found.trim().is_empty() => {
                if ingredients.is_empty() {
                    ingredients = found;
                } else {
                    ingredients = format!("{ingredients}, {found}");
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Ingredient recognition failed, continuing with text only: {e}"),
        }
    }

    let profile = current_profile(&state, auth.id).await?;
    let overrides = PreferenceOverrides {
        meal_type: req.meal_type,
        cook_time: req.cook_time,
    };
    let mut preferences = compile(profile.as_ref(), &overrides);
    if let Some(extra) = req.preferences.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        preferences.push_str(extra);
    }

    let generated = generate_or_fallback(state.llm.as_ref(), &ingredients, &preferences).await;
    Ok(Json(generated))
}

/// POST /api/recipes/analyze-image
pub async fn handle_analyze_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<AnalyzeImageRequest>,
) -> Result<Json<AnalyzeImageResponse>, AppError> {
    let llm = state
        .llm
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("AI service is not configured".to_string()))?;

    let image = req.image_base64.trim();
    if image.is_empty() {
        return Err(AppError::Validation("No image provided".to_string()));
    }

    let ingredients = recognize_ingredients(llm, image)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    Ok(Json(AnalyzeImageResponse { ingredients }))
}

/// POST /api/recipes/save
pub async fn handle_save(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SaveRecipeRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let recipe = req.recipe;
    let name = recipe.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Recipe must have a name".to_string()));
    }

    let id = sqlx::query(
        r#"
        INSERT INTO recipes (user_id, name, time, calories, protein, ingredients, steps, tip, meal_type, saved_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.id)
    .bind(name)
    .bind(&recipe.time)
    .bind(&recipe.calories)
    .bind(&recipe.protein)
    .bind(SqlJson(&recipe.ingredients))
    .bind(SqlJson(&recipe.steps))
    .bind(&recipe.tip)
    .bind(recipe.meal_type.map(|m| m.key()))
    .bind(Utc::now())
    .execute(&state.db)
    .await
    .map_err(|e| conflict_on_unique(e, "Recipe already saved"))?
    .last_insert_rowid();

    Ok((StatusCode::CREATED, Json(json!({ "recipeId": id }))))
}

/// GET /api/recipes
pub async fn handle_list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SavedRecipeRow>>, AppError> {
    let recipes: Vec<SavedRecipeRow> = sqlx::query_as(
        r#"
        SELECT id, name, time, calories, protein, ingredients, steps, tip, meal_type, saved_at
        FROM recipes
        WHERE user_id = ?
        ORDER BY saved_at DESC, id DESC
        "#,
    )
    .bind(auth.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(recipes))
}

/// DELETE /api/recipes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(auth.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Recipe {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let goal = current_profile(&state, auth.id)
        .await?
        .and_then(|p| p.goal)
        .unwrap_or(Goal::LoseWeight);
    Ok(Json(SuggestionsResponse {
        goal,
        suggestions: suggestions_for(Some(goal)),
    }))
}
